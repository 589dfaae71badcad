//! Small navigation helpers over `roxmltree` documents.
//!
//! Fedora responses carry a default namespace on some documents and none on
//! others, so lookups match on local element names only.

use roxmltree::Node;

use crate::data::{DataAtomic, DataGroup};

/// Returns the first child element with the given local name.
pub(crate) fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|candidate| candidate.is_element() && candidate.tag_name().name() == name)
}

/// Returns every child element with the given local name, in document order.
pub(crate) fn children<'a, 'input>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children()
        .filter(move |candidate| candidate.is_element() && candidate.tag_name().name() == name)
}

/// Returns the trimmed text of a child element, or `None` when the element
/// is missing or blank.
pub(crate) fn child_text<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    child(node, name)
        .and_then(|element| element.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
}

/// Adds an atomic named `name_in_data` when `element_name` has text.
pub(crate) fn possibly_add_atomic(
    group: &mut DataGroup,
    node: Node<'_, '_>,
    element_name: &str,
    name_in_data: &str,
) {
    if let Some(value) = child_text(node, element_name) {
        group.add_child(DataAtomic::with_name_in_data_and_value(name_in_data, value));
    }
}

/// Builds the `recordInfo` group shared by every Fedora-backed record.
pub(crate) fn create_record_info(
    root: Node<'_, '_>,
    pid: &str,
    record_type: &str,
    data_divider: &str,
) -> DataGroup {
    let mut record_info = DataGroup::with_name_in_data("recordInfo");
    record_info.add_child(DataAtomic::with_name_in_data_and_value("id", pid));
    record_info.add_child(DataGroup::as_link_with_name_in_data_and_type_and_id(
        "type",
        "recordType",
        record_type,
    ));
    record_info.add_child(DataGroup::as_link_with_name_in_data_and_type_and_id(
        "dataDivider",
        "system",
        data_divider,
    ));
    if let Some(created_by) = child_text(root, "createdBy") {
        record_info.add_child(DataGroup::as_link_with_name_in_data_and_type_and_id(
            "createdBy",
            "user",
            created_by,
        ));
    }
    possibly_add_atomic(&mut record_info, root, "created", "tsCreated");
    if let Some(last_updated) = child_text(root, "lastUpdated") {
        let mut updated = DataGroup::with_name_in_data("updated");
        if let Some(updated_by) = child_text(root, "lastUpdatedBy") {
            updated.add_child(DataGroup::as_link_with_name_in_data_and_type_and_id(
                "updatedBy",
                "user",
                updated_by,
            ));
        }
        updated.add_child(DataAtomic::with_name_in_data_and_value(
            "tsUpdated",
            last_updated,
        ));
        record_info.add_child(updated);
    }
    record_info
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_child_text_ignores_namespace_and_whitespace() {
        let doc = roxmltree::Document::parse(
            r#"<result xmlns="http://www.fedora.info/definitions/1/0/types/"><pid>  a:1 </pid></result>"#,
        )
        .unwrap();
        assert_eq!(child_text(doc.root_element(), "pid"), Some("a:1"));
    }

    #[test]
    fn test_child_text_blank_is_none() {
        let doc = roxmltree::Document::parse("<r><pid>   </pid><empty/></r>").unwrap();
        assert_eq!(child_text(doc.root_element(), "pid"), None);
        assert_eq!(child_text(doc.root_element(), "empty"), None);
        assert_eq!(child_text(doc.root_element(), "missing"), None);
    }

    #[test]
    fn test_children_in_document_order() {
        let doc = roxmltree::Document::parse("<r><n>1</n><x/><n>2</n></r>").unwrap();
        let values: Vec<&str> = children(doc.root_element(), "n")
            .filter_map(|node| node.text())
            .collect();
        assert_eq!(values, ["1", "2"]);
    }

    #[test]
    fn test_record_info_without_optional_elements() {
        let doc = roxmltree::Document::parse("<place><pid>alvin-place:1</pid></place>").unwrap();
        let record_info = create_record_info(doc.root_element(), "alvin-place:1", "place", "alvin");

        assert_eq!(
            record_info.first_atomic_value_with_name_in_data("id"),
            Some("alvin-place:1")
        );
        assert!(!record_info.contains_child_with_name_in_data("createdBy"));
        assert!(!record_info.contains_child_with_name_in_data("updated"));
    }

    #[test]
    fn test_record_info_with_created_and_updated() {
        let doc = roxmltree::Document::parse(
            "<place><pid>p:1</pid><createdBy>12</createdBy><created>2014-12-18 20:20:38.346</created>\
             <lastUpdatedBy>13</lastUpdatedBy><lastUpdated>2016-02-12 10:29:46.339</lastUpdated></place>",
        )
        .unwrap();
        let record_info = create_record_info(doc.root_element(), "p:1", "place", "alvin");

        let created_by = record_info.first_group_with_name_in_data("createdBy").unwrap();
        assert_eq!(
            created_by.first_atomic_value_with_name_in_data("linkedRecordId"),
            Some("12")
        );
        assert_eq!(
            record_info.first_atomic_value_with_name_in_data("tsCreated"),
            Some("2014-12-18 20:20:38.346")
        );
        let updated = record_info.first_group_with_name_in_data("updated").unwrap();
        assert_eq!(
            updated.first_atomic_value_with_name_in_data("tsUpdated"),
            Some("2016-02-12 10:29:46.339")
        );
        assert!(updated.contains_child_with_name_in_data("updatedBy"));
    }
}
