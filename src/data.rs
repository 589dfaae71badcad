//! Generic record containers shared with the host framework.
//!
//! A record is an ordered tree: [`DataGroup`] nodes hold attributes and an
//! ordered list of children, [`DataAtomic`] leaves hold a single string value.
//! Sibling names are not unique; a group may carry several children with the
//! same `name_in_data` (repeated link groups, alternative names, ...).

use std::collections::BTreeMap;

use serde::Serialize;

/// A leaf node holding one string value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataAtomic {
    pub name_in_data: String,
    pub value: String,
}

impl DataAtomic {
    #[must_use]
    pub fn with_name_in_data_and_value(
        name_in_data: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name_in_data: name_in_data.into(),
            value: value.into(),
        }
    }
}

/// A child of a [`DataGroup`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DataElement {
    Atomic(DataAtomic),
    Group(DataGroup),
}

impl DataElement {
    /// Returns the element's name in data regardless of variant.
    #[must_use]
    pub fn name_in_data(&self) -> &str {
        match self {
            Self::Atomic(atomic) => &atomic.name_in_data,
            Self::Group(group) => &group.name_in_data,
        }
    }
}

impl From<DataAtomic> for DataElement {
    fn from(atomic: DataAtomic) -> Self {
        Self::Atomic(atomic)
    }
}

impl From<DataGroup> for DataElement {
    fn from(group: DataGroup) -> Self {
        Self::Group(group)
    }
}

/// A named group of ordered children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataGroup {
    pub name_in_data: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    pub children: Vec<DataElement>,
}

impl DataGroup {
    /// Creates an empty group.
    #[must_use]
    pub fn with_name_in_data(name_in_data: impl Into<String>) -> Self {
        Self {
            name_in_data: name_in_data.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Creates a link group (`linkedRecordType` + `linkedRecordId`).
    #[must_use]
    pub fn as_link_with_name_in_data_and_type_and_id(
        name_in_data: impl Into<String>,
        linked_record_type: impl Into<String>,
        linked_record_id: impl Into<String>,
    ) -> Self {
        let mut link = Self::with_name_in_data(name_in_data);
        link.add_child(DataAtomic::with_name_in_data_and_value(
            "linkedRecordType",
            linked_record_type,
        ));
        link.add_child(DataAtomic::with_name_in_data_and_value(
            "linkedRecordId",
            linked_record_id,
        ));
        link
    }

    pub fn add_attribute_by_id_with_value(
        &mut self,
        name_in_data: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.attributes.insert(name_in_data.into(), value.into());
    }

    pub fn add_child(&mut self, child: impl Into<DataElement>) {
        self.children.push(child.into());
    }

    /// Returns true if any direct child has the given name.
    #[must_use]
    pub fn contains_child_with_name_in_data(&self, name_in_data: &str) -> bool {
        self.children
            .iter()
            .any(|child| child.name_in_data() == name_in_data)
    }

    /// Returns the value of the first atomic child with the given name.
    #[must_use]
    pub fn first_atomic_value_with_name_in_data(&self, name_in_data: &str) -> Option<&str> {
        self.children.iter().find_map(|child| match child {
            DataElement::Atomic(atomic) if atomic.name_in_data == name_in_data => {
                Some(atomic.value.as_str())
            }
            _ => None,
        })
    }

    /// Returns the first group child with the given name.
    #[must_use]
    pub fn first_group_with_name_in_data(&self, name_in_data: &str) -> Option<&DataGroup> {
        self.children.iter().find_map(|child| match child {
            DataElement::Group(group) if group.name_in_data == name_in_data => Some(group),
            _ => None,
        })
    }

    /// Returns every group child with the given name, in order.
    #[must_use]
    pub fn all_groups_with_name_in_data(&self, name_in_data: &str) -> Vec<&DataGroup> {
        self.children
            .iter()
            .filter_map(|child| match child {
                DataElement::Group(group) if group.name_in_data == name_in_data => Some(group),
                _ => None,
            })
            .collect()
    }
}

/// Result of a list read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReadResult {
    pub list_of_data_groups: Vec<DataGroup>,
    pub total_number_of_matches: usize,
}

impl ReadResult {
    /// Wraps a fully converted list; the match count is the list length.
    #[must_use]
    pub fn from_data_groups(list_of_data_groups: Vec<DataGroup>) -> Self {
        let total_number_of_matches = list_of_data_groups.len();
        Self {
            list_of_data_groups,
            total_number_of_matches,
        }
    }
}
