//! Alvin place (`place` METADATA) conversion.

use roxmltree::Node;

use crate::data::{DataAtomic, DataGroup};
use crate::error::Result;

use super::converter::{FedoraConverter, convert_document};
use super::xml;

const RECORD_TYPE: &str = "place";
const DATA_DIVIDER: &str = "alvin";

/// Converts `place` documents into `authority` groups.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceConverter;

impl FedoraConverter for PlaceConverter {
    fn name(&self) -> &'static str {
        RECORD_TYPE
    }

    fn from_xml(&self, xml: &str) -> Result<DataGroup> {
        convert_document(RECORD_TYPE, xml, create_place)
    }
}

fn create_place(root: Node<'_, '_>, pid: &str) -> DataGroup {
    let mut place = DataGroup::with_name_in_data("authority");
    place.add_attribute_by_id_with_value("type", RECORD_TYPE);
    place.add_child(xml::create_record_info(root, pid, RECORD_TYPE, DATA_DIVIDER));

    if let Some(default_name) = xml::child(root, "defaultPlaceName") {
        let mut name = DataGroup::with_name_in_data("name");
        xml::possibly_add_atomic(&mut name, default_name, "name", "value");
        place.add_child(name);
    }
    possibly_add_coordinates(&mut place, root);
    xml::possibly_add_atomic(&mut place, root, "country", "countryCode");
    xml::possibly_add_atomic(&mut place, root, "geonamesId", "geonamesId");
    place
}

fn possibly_add_coordinates(place: &mut DataGroup, root: Node<'_, '_>) {
    let Some(coordinates) = xml::child(root, "coordinates") else {
        return;
    };
    let latitude = xml::child_text(coordinates, "latitude");
    let longitude = xml::child_text(coordinates, "longitude");
    if let (Some(latitude), Some(longitude)) = (latitude, longitude) {
        let mut group = DataGroup::with_name_in_data("coordinates");
        group.add_child(DataAtomic::with_name_in_data_and_value("latitude", latitude));
        group.add_child(DataAtomic::with_name_in_data_and_value("longitude", longitude));
        place.add_child(group);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_place_with_coordinates() {
        let place = PlaceConverter
            .from_xml(
                "<place><pid>alvin-place:22</pid>\
                 <defaultPlaceName><name>Linköping</name></defaultPlaceName>\
                 <coordinates><latitude>58.4167</latitude><longitude>15.6167</longitude></coordinates>\
                 <country>SE</country><geonamesId>2694762</geonamesId></place>",
            )
            .unwrap();

        assert_eq!(place.attributes.get("type").map(String::as_str), Some("place"));
        let name = place.first_group_with_name_in_data("name").unwrap();
        assert_eq!(name.first_atomic_value_with_name_in_data("value"), Some("Linköping"));
        let coordinates = place.first_group_with_name_in_data("coordinates").unwrap();
        assert_eq!(
            coordinates.first_atomic_value_with_name_in_data("latitude"),
            Some("58.4167")
        );
        assert_eq!(place.first_atomic_value_with_name_in_data("countryCode"), Some("SE"));
        assert_eq!(
            place.first_atomic_value_with_name_in_data("geonamesId"),
            Some("2694762")
        );
    }

    #[test]
    fn test_convert_place_incomplete_coordinates_are_omitted() {
        let place = PlaceConverter
            .from_xml(
                "<place><pid>alvin-place:24</pid>\
                 <coordinates><latitude>58.4</latitude></coordinates></place>",
            )
            .unwrap();
        assert!(!place.contains_child_with_name_in_data("coordinates"));
        assert!(!place.contains_child_with_name_in_data("name"));
    }

    #[test]
    fn test_convert_place_data_divider_is_alvin() {
        let place = PlaceConverter
            .from_xml("<place><pid>alvin-place:1</pid></place>")
            .unwrap();
        let record_info = place.first_group_with_name_in_data("recordInfo").unwrap();
        let data_divider = record_info.first_group_with_name_in_data("dataDivider").unwrap();
        assert_eq!(
            data_divider.first_atomic_value_with_name_in_data("linkedRecordId"),
            Some("alvin")
        );
    }

    #[test]
    fn test_convert_place_broken_xml_fails() {
        let err = PlaceConverter.from_xml("Dummy response text").unwrap_err();
        assert!(
            err.to_string()
                .starts_with("Error converting place to Cora place: Can not read xml: ")
        );
    }
}
