use super::db::{Key, KeyId};
use crate::{Error, Result};

/// The pair of keys joining a parent table to a related (child) table.
///
/// Exactly one side is a primary or unique key and the other is a foreign
/// key; [`LinkInfo::new`] rejects anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkInfo {
    /// Key on the parent (containing) table.
    pub parent_key: KeyId,

    /// Key on the child (related or property) table.
    pub child_key: KeyId,

    parent_key_is_unique: bool,
}

impl LinkInfo {
    pub fn new(parent_key: &Key, child_key: &Key) -> Result<LinkInfo> {
        let parent_key_is_unique = match (parent_key.is_unique(), child_key.is_unique()) {
            (true, false) => true,
            (false, true) => false,
            (true, true) => {
                return Err(Error::invalid_mapping(format!(
                    "link between keys `{}` and `{}` has no foreign key",
                    parent_key.name, child_key.name
                )))
            }
            (false, false) => {
                return Err(Error::invalid_mapping(format!(
                    "link between keys `{}` and `{}` has no unique key",
                    parent_key.name, child_key.name
                )))
            }
        };

        if parent_key.columns.len() != child_key.columns.len() {
            return Err(Error::invalid_mapping(format!(
                "linked keys `{}` ({} columns) and `{}` ({} columns) differ in width",
                parent_key.name,
                parent_key.columns.len(),
                child_key.name,
                child_key.columns.len()
            )));
        }

        Ok(LinkInfo {
            parent_key: parent_key.id,
            child_key: child_key.id,
            parent_key_is_unique,
        })
    }

    /// True when the parent side holds the unique key, i.e. the child side
    /// is the foreign key.
    pub fn parent_key_is_unique(&self) -> bool {
        self.parent_key_is_unique
    }

    /// The key whose values identify a row.
    pub fn unique_key(&self) -> KeyId {
        if self.parent_key_is_unique {
            self.parent_key
        } else {
            self.child_key
        }
    }

    /// The key whose values are copied from the unique side.
    pub fn foreign_key(&self) -> KeyId {
        if self.parent_key_is_unique {
            self.child_key
        } else {
            self.parent_key
        }
    }
}
