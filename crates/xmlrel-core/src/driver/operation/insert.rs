use super::Operation;
use crate::{schema::db::TableId, stmt::ValueRecord};

#[derive(Debug, Clone)]
pub struct Insert {
    pub table: TableId,

    /// One value per column, in table column order.
    pub values: ValueRecord,
}

impl From<Insert> for Operation {
    fn from(value: Insert) -> Self {
        Self::Insert(value)
    }
}
