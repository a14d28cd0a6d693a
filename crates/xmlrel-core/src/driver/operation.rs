mod insert;
pub use insert::Insert;

mod select;
pub use select::{Direction, OrderBy, Select};

mod transaction;
pub use transaction::Transaction;

#[derive(Debug, Clone)]
pub enum Operation {
    /// Insert one row.
    Insert(Insert),

    /// Select every column of a table, filtered by column equality.
    Select(Select),

    /// Execute a transaction lifecycle op
    Transaction(Transaction),
}

impl Operation {
    pub fn is_insert(&self) -> bool {
        matches!(self, Self::Insert(_))
    }

    pub fn is_select(&self) -> bool {
        matches!(self, Self::Select(_))
    }
}
