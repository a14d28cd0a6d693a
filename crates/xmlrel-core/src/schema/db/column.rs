use super::{TableId, Type};
use crate::convert::ValueFormatter;

use std::{fmt, sync::Arc};

#[derive(Debug, Clone)]
pub struct Column {
    /// Uniquely identifies the column in the schema.
    pub id: ColumnId,

    /// The name of the column in the database.
    pub name: String,

    /// The database storage type of the column, including any length,
    /// precision or scale.
    pub ty: Type,

    /// Whether or not the column is nullable
    pub nullable: bool,

    /// Converts between column values and XML text. When `None`, the
    /// default conversion for `ty` is used.
    pub formatter: Option<Arc<dyn ValueFormatter>>,
}

#[derive(PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct ColumnId {
    pub table: TableId,
    pub index: usize,
}

impl From<&Column> for ColumnId {
    fn from(value: &Column) -> Self {
        value.id
    }
}

impl fmt::Debug for ColumnId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "ColumnId({}/{})", self.table.0, self.index)
    }
}
