use super::Operation;
use crate::{
    schema::db::{ColumnId, TableId},
    stmt::Value,
};

/// Selects all columns of `table`. Returned records hold one value per
/// column, in table column order.
#[derive(Debug, Clone)]
pub struct Select {
    pub table: TableId,

    /// `column = value` conditions, joined with `AND`. An empty filter
    /// selects every row.
    pub filter: Vec<(ColumnId, Value)>,

    pub order_by: Option<OrderBy>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub column: ColumnId,
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Select {
    pub fn new(table: TableId) -> Self {
        Self {
            table,
            filter: vec![],
            order_by: None,
        }
    }

    pub fn filter(mut self, column: ColumnId, value: impl Into<Value>) -> Self {
        self.filter.push((column, value.into()));
        self
    }

    pub fn order_by(mut self, column: ColumnId, direction: Direction) -> Self {
        self.order_by = Some(OrderBy { column, direction });
        self
    }
}

impl From<Select> for Operation {
    fn from(value: Select) -> Self {
        Self::Select(value)
    }
}
