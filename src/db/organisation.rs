//! Organisation rows to `organisation` groups.

use crate::data::{DataAtomic, DataGroup};
use crate::error::{Result, StorageError};

use super::converter::{DbConverter, non_empty};
use super::reader::DbRow;

const RECORD_TYPE: &str = "divaOrganisation";
const DATA_DIVIDER: &str = "diva";

/// Optional columns copied verbatim, with their output names.
const OPTIONAL_COLUMNS: [(&str, &str); 4] = [
    ("closeddate", "closedDate"),
    ("organisation_code", "organisationCode"),
    ("orgnumber", "organisationNumber"),
    ("organisation_homepage", "URL"),
];

/// Converts an `organisation` row into an `organisation` group. `id` and
/// `defaultname` are mandatory; empty optional columns are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrganisationConverter;

impl DbConverter for OrganisationConverter {
    fn name(&self) -> &'static str {
        "organisation"
    }

    fn from_map(&self, row: &DbRow) -> Result<DataGroup> {
        let id = mandatory(row, "id")?;
        let name = mandatory(row, "defaultname")?;

        let mut organisation = DataGroup::with_name_in_data("organisation");
        organisation.add_child(create_record_info(row, id));
        organisation.add_child(DataAtomic::with_name_in_data_and_value("organisationName", name));
        for (column, name_in_data) in OPTIONAL_COLUMNS {
            if let Some(value) = non_empty(row, column) {
                organisation.add_child(DataAtomic::with_name_in_data_and_value(name_in_data, value));
            }
        }
        organisation.add_child(DataAtomic::with_name_in_data_and_value(
            "eligible",
            eligibility(row),
        ));
        Ok(organisation)
    }
}

fn mandatory<'a>(row: &'a DbRow, column: &str) -> Result<&'a str> {
    non_empty(row, column).ok_or_else(|| {
        StorageError::conversion(format!(
            "Error converting organisation to Cora organisation: Map does not contain value for {column}"
        ))
    })
}

fn create_record_info(row: &DbRow, id: &str) -> DataGroup {
    let mut record_info = DataGroup::with_name_in_data("recordInfo");
    record_info.add_child(DataAtomic::with_name_in_data_and_value("id", id));
    record_info.add_child(DataGroup::as_link_with_name_in_data_and_type_and_id(
        "type",
        "recordType",
        RECORD_TYPE,
    ));
    record_info.add_child(DataGroup::as_link_with_name_in_data_and_type_and_id(
        "dataDivider",
        "system",
        DATA_DIVIDER,
    ));
    if let Some(created) = non_empty(row, "tscreated") {
        record_info.add_child(DataAtomic::with_name_in_data_and_value("tsCreated", created));
    }
    if let Some(last_updated) = non_empty(row, "lastupdated") {
        let mut updated = DataGroup::with_name_in_data("updated");
        updated.add_child(DataAtomic::with_name_in_data_and_value("tsUpdated", last_updated));
        record_info.add_child(updated);
    }
    record_info
}

fn eligibility(row: &DbRow) -> &'static str {
    match non_empty(row, "not_eligible") {
        Some("true" | "t" | "1") => "no",
        _ => "yes",
    }
}
