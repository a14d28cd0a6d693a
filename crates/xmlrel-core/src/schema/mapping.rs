mod class_table;
pub use class_table::{ClassTableMap, ColumnMap, InlineStep, PropertyTableMap, RelatedClassTableMap};

mod invert;
pub use invert::invert;

use super::db::TableId;
use indexmap::IndexMap;

/// The table-centric (DB-centric) view of a map.
///
/// Derived once from the class-centric view by [`invert`] and immutable
/// afterwards. Rows→tree traversal walks this view: starting from a class
/// table it finds every column, property table and related class table that
/// feeds the element built for a row.
#[derive(Debug, Clone, Default)]
pub struct Mapping {
    /// Class table maps, keyed by the table holding the class rows.
    pub tables: IndexMap<TableId, ClassTableMap>,
}

impl Mapping {
    /// Returns the class table map for `table`, if the table holds class rows.
    pub fn class_table(&self, table: TableId) -> Option<&ClassTableMap> {
        self.tables.get(&table)
    }

    pub fn class_tables(&self) -> impl Iterator<Item = &ClassTableMap> {
        self.tables.values()
    }
}
