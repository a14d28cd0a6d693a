use super::{Column, ColumnId, Key, KeyId};

use serde::{Deserialize, Serialize};
use std::fmt;

/// A database table
#[derive(Debug, Clone)]
pub struct Table {
    /// Uniquely identifies a table
    pub id: TableId,

    /// Qualified name of the table
    pub name: TableName,

    /// The table's columns, in row order
    pub columns: Vec<Column>,

    /// Primary, unique and foreign keys declared on the table
    pub keys: Vec<Key>,

    pub primary_key: Option<KeyId>,
}

/// Uniquely identifies a table
#[derive(PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct TableId(pub usize);

/// Catalog, schema and table name. Identity is the full triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TableName {
    #[serde(default)]
    pub catalog: Option<String>,

    #[serde(default)]
    pub schema: Option<String>,

    pub name: String,
}

impl Table {
    pub fn column(&self, id: impl Into<ColumnId>) -> &Column {
        &self.columns[id.into().index]
    }

    pub fn column_by_name(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn key(&self, id: KeyId) -> &Key {
        &self.keys[id.index]
    }

    pub fn key_by_name(&self, name: &str) -> Option<&Key> {
        self.keys.iter().find(|key| key.name == name)
    }

    pub fn primary_key(&self) -> Option<&Key> {
        self.primary_key.map(|id| self.key(id))
    }

    /// Columns of the given key, in key order.
    pub fn key_columns(&self, id: KeyId) -> impl ExactSizeIterator<Item = &Column> + '_ {
        self.key(id)
            .columns
            .iter()
            .map(|column_id| &self.columns[column_id.index])
    }
}

impl TableName {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            catalog: None,
            schema: None,
            name: name.into(),
        }
    }

    /// Name parts from outermost to innermost, skipping absent ones.
    pub fn parts(&self) -> impl Iterator<Item = &str> + '_ {
        self.catalog
            .as_deref()
            .into_iter()
            .chain(self.schema.as_deref())
            .chain(Some(self.name.as_str()))
    }

    /// Matches either the bare table name or the fully qualified name.
    pub fn matches(&self, qualified: &str) -> bool {
        qualified == self.name || qualified == self.to_string()
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = "";
        for part in self.parts() {
            write!(f, "{s}{part}")?;
            s = ".";
        }
        Ok(())
    }
}

impl From<&str> for TableName {
    fn from(src: &str) -> Self {
        let mut parts: Vec<&str> = src.split('.').collect();
        let name = parts.pop().unwrap_or_default().to_string();
        let schema = parts.pop().map(String::from);
        let catalog = parts.pop().map(String::from);
        Self {
            catalog,
            schema,
            name,
        }
    }
}

impl fmt::Debug for TableId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "TableId({})", self.0)
    }
}
