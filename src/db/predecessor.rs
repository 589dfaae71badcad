//! Organisation predecessor rows to `formerName` groups.

use crate::data::{DataAtomic, DataGroup};
use crate::error::{Result, StorageError};

use super::converter::{DbConverter, non_empty};
use super::reader::DbRow;

const ORGANISATION_ID: &str = "id";
const PREDECESSOR_ID: &str = "predecessorid";
const DESCRIPTION: &str = "description";

/// Message returned when `id` or `predecessorid` is missing. The wording is
/// matched by clients and must not change.
pub const MISSING_MANDATORY_VALUES: &str = "Error converting organisation predecessor to Cora organisation predecessor: Map does not \
     contain mandatory values for organisation id and prdecessor id";

/// Converts a `divaOrganisationPredecessor` row into a `formerName` group
/// linking to the predecessor organisation.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrganisationPredecessorConverter;

impl DbConverter for OrganisationPredecessorConverter {
    fn name(&self) -> &'static str {
        "divaOrganisationPredecessor"
    }

    fn from_map(&self, row: &DbRow) -> Result<DataGroup> {
        if non_empty(row, ORGANISATION_ID).is_none() {
            return Err(StorageError::conversion(MISSING_MANDATORY_VALUES));
        }
        let Some(predecessor_id) = non_empty(row, PREDECESSOR_ID) else {
            return Err(StorageError::conversion(MISSING_MANDATORY_VALUES));
        };

        let mut former_name = DataGroup::with_name_in_data("formerName");
        former_name.add_child(DataGroup::as_link_with_name_in_data_and_type_and_id(
            "organisationLink",
            "divaOrganisation",
            predecessor_id,
        ));
        if let Some(description) = non_empty(row, DESCRIPTION) {
            former_name.add_child(DataAtomic::with_name_in_data_and_value(
                "organisationComment",
                description,
            ));
        }
        Ok(former_name)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::data::DataElement;

    fn row(pairs: &[(&str, &str)]) -> DbRow {
        pairs
            .iter()
            .map(|(column, value)| ((*column).to_string(), (*value).to_string()))
            .collect()
    }

    fn assert_missing_mandatory(row: &DbRow) {
        let err = OrganisationPredecessorConverter.from_map(row).unwrap_err();
        assert_eq!(err, StorageError::Conversion(MISSING_MANDATORY_VALUES.to_string()));
    }

    #[test]
    fn test_message_wording() {
        assert_eq!(
            MISSING_MANDATORY_VALUES,
            "Error converting organisation predecessor to Cora organisation predecessor: \
             Map does not contain mandatory values for organisation id and prdecessor id"
        );
    }

    #[test]
    fn test_empty_map_fails() {
        assert_missing_mandatory(&DbRow::new());
    }

    #[test]
    fn test_missing_organisation_id_fails() {
        assert_missing_mandatory(&row(&[("predecessorid", "7788")]));
    }

    #[test]
    fn test_empty_organisation_id_fails() {
        assert_missing_mandatory(&row(&[("id", ""), ("predecessorid", "7788")]));
    }

    #[test]
    fn test_missing_predecessor_id_fails() {
        assert_missing_mandatory(&row(&[("id", "someOrgId")]));
    }

    #[test]
    fn test_empty_predecessor_id_fails() {
        assert_missing_mandatory(&row(&[("id", "someOrgId"), ("predecessorid", "")]));
    }

    #[test]
    fn test_minimal_values_builds_link_only() {
        let former_name = OrganisationPredecessorConverter
            .from_map(&row(&[("id", "someOrgId"), ("predecessorid", "somePredecessorId")]))
            .unwrap();

        assert_eq!(former_name.name_in_data, "formerName");
        assert_eq!(former_name.children.len(), 1);
        let link = former_name.first_group_with_name_in_data("organisationLink").unwrap();
        assert_eq!(
            link.first_atomic_value_with_name_in_data("linkedRecordType"),
            Some("divaOrganisation")
        );
        assert_eq!(
            link.first_atomic_value_with_name_in_data("linkedRecordId"),
            Some("somePredecessorId")
        );
        assert!(!former_name.contains_child_with_name_in_data("organisationComment"));
    }

    #[test]
    fn test_empty_description_is_omitted() {
        let former_name = OrganisationPredecessorConverter
            .from_map(&row(&[
                ("id", "someOrgId"),
                ("predecessorid", "somePredecessorId"),
                ("description", ""),
            ]))
            .unwrap();
        assert!(!former_name.contains_child_with_name_in_data("organisationComment"));
    }

    #[test]
    fn test_description_is_added_after_link() {
        let former_name = OrganisationPredecessorConverter
            .from_map(&row(&[
                ("id", "someOrgId"),
                ("predecessorid", "somePredecessorId"),
                ("description", "some description text"),
            ]))
            .unwrap();

        assert_eq!(former_name.children.len(), 2);
        assert!(matches!(&former_name.children[1], DataElement::Atomic(atomic)
            if atomic.name_in_data == "organisationComment"
                && atomic.value == "some description text"));
    }
}
