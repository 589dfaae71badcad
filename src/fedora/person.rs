//! DiVA authority person (`authorityPerson` METADATA) conversion.

use roxmltree::Node;

use crate::data::{DataAtomic, DataGroup};
use crate::error::Result;

use super::converter::{FedoraConverter, convert_document};
use super::xml;

const RECORD_TYPE: &str = "person";
const DATA_DIVIDER: &str = "diva";

/// Converts `authorityPerson` documents into `authority` groups.
#[derive(Debug, Clone, Copy, Default)]
pub struct PersonConverter;

impl FedoraConverter for PersonConverter {
    fn name(&self) -> &'static str {
        RECORD_TYPE
    }

    fn from_xml(&self, xml: &str) -> Result<DataGroup> {
        convert_document(RECORD_TYPE, xml, create_person)
    }
}

fn create_person(root: Node<'_, '_>, pid: &str) -> DataGroup {
    let mut person = DataGroup::with_name_in_data("authority");
    person.add_attribute_by_id_with_value("type", RECORD_TYPE);
    person.add_child(xml::create_record_info(root, pid, RECORD_TYPE, DATA_DIVIDER));

    if let Some(default_name) = xml::child(root, "defaultName") {
        person.add_child(create_name("name", default_name));
    }
    if let Some(alternative_names) = xml::child(root, "alternativeNames") {
        for name in xml::children(alternative_names, "name") {
            person.add_child(create_name("alternativeName", name));
        }
    }
    xml::possibly_add_atomic(&mut person, root, "email", "email");
    xml::possibly_add_atomic(&mut person, root, "yearOfBirth", "yearOfBirth");
    xml::possibly_add_atomic(&mut person, root, "yearOfDeath", "yearOfDeath");
    person
}

fn create_name(name_in_data: &str, name: Node<'_, '_>) -> DataGroup {
    let mut group = DataGroup::with_name_in_data(name_in_data);
    if let Some(family_name) = xml::child_text(name, "familyName") {
        group.add_child(DataAtomic::with_name_in_data_and_value("familyName", family_name));
    }
    if let Some(given_names) = xml::child_text(name, "givenNames") {
        group.add_child(DataAtomic::with_name_in_data_and_value("givenName", given_names));
    }
    group
}
