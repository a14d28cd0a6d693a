use super::Content;
use crate::schema::{db::TableId, XmlName};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maps an element type to a table: each element instance is a row.
#[derive(Debug, Clone)]
pub struct ClassMap {
    pub id: ClassMapId,

    /// The element type this class map was declared for.
    pub element: XmlName,

    pub kind: ClassMapKind,

    /// Table holding one row per element instance. `None` for ignored roots
    /// and pass-through elements.
    pub table: Option<TableId>,

    /// Class map this one inherits attribute, PCDATA and child maps from.
    /// Base and derived class share a table.
    pub base: Option<ClassMapId>,

    /// Attribute, PCDATA and child element maps, base class maps included.
    pub content: Content,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassMapKind {
    /// Rows of the table may be document roots.
    RootTable,

    /// Rows of the table are always nested under another class.
    ClassTable,

    /// A wrapper element that is not stored. Its mapped children are each
    /// treated as a document root.
    IgnoredRoot,

    /// The element is skipped and its children promoted. Not supported by
    /// the transformers.
    PassThrough,
}

#[derive(PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct ClassMapId(pub usize);

impl ClassMap {
    /// Table of a class map that is mapped to one.
    ///
    /// # Panics
    ///
    /// Panics for ignored roots and pass-through elements.
    pub fn expect_table(&self) -> TableId {
        match self.table {
            Some(table) => table,
            None => panic!("class map `{}` is not mapped to a table", self.element),
        }
    }

    pub fn is_ignored_root(&self) -> bool {
        matches!(self.kind, ClassMapKind::IgnoredRoot)
    }
}

impl ClassMapKind {
    /// Whether class maps of this kind must name a table.
    pub fn has_table(self) -> bool {
        matches!(self, Self::RootTable | Self::ClassTable)
    }
}

impl fmt::Debug for ClassMapId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "ClassMapId({})", self.0)
    }
}
