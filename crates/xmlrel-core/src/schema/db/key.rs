use super::{ColumnId, TableId};

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named set of columns used to link two tables.
#[derive(Debug, Clone, PartialEq)]
pub struct Key {
    pub id: KeyId,

    /// Name of the key, unique within its table.
    pub name: String,

    pub kind: KeyKind,

    /// Key columns, in key order.
    pub columns: Vec<ColumnId>,

    /// Where the key's values come from.
    pub generation: KeyGeneration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyKind {
    Primary,
    Unique,
    Foreign,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyGeneration {
    /// Values are supplied by the document (natural key) or copied from the
    /// linked row (foreign key).
    #[default]
    Supplied,

    /// Values are produced by the configured key generator.
    Generated,
}

#[derive(PartialEq, Eq, Clone, Copy, Hash)]
pub struct KeyId {
    pub table: TableId,
    pub index: usize,
}

impl Key {
    pub fn is_unique(&self) -> bool {
        self.kind.is_unique()
    }

    pub fn is_generated(&self) -> bool {
        matches!(self.generation, KeyGeneration::Generated)
    }
}

impl KeyKind {
    /// Primary and unique keys identify a single row.
    pub fn is_unique(self) -> bool {
        matches!(self, Self::Primary | Self::Unique)
    }
}

impl fmt::Debug for KeyId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "KeyId({}/{})", self.table.0, self.index)
    }
}
