use xmlrel_core::{
    schema::db::{Column, ColumnId, Key, Table, TableId},
    stmt::{Value, ValueRecord},
    Error, Result,
};

/// A row being assembled for one table, one value per column.
#[derive(Debug, Clone)]
pub(crate) struct Row {
    pub(crate) table: TableId,
    values: ValueRecord,

    /// Columns that received a property value.
    written: Vec<bool>,
}

impl Row {
    pub(crate) fn new(table: &Table) -> Row {
        Row {
            table: table.id,
            values: ValueRecord::nulls(table.columns.len()),
            written: vec![false; table.columns.len()],
        }
    }

    pub(crate) fn get(&self, column: ColumnId) -> &Value {
        debug_assert_eq!(column.table, self.table);
        &self.values[column.index]
    }

    /// Stores a property value. A column holds a single property value per
    /// row, so a second write is a structural violation.
    pub(crate) fn set(&mut self, column: &Column, value: Value) -> Result<()> {
        let index = column.id.index;
        debug_assert_eq!(column.id.table, self.table);

        if self.written[index] {
            return Err(Error::structural_violation(format!(
                "column `{}` receives more than one value for a single row",
                column.name
            )));
        }

        self.written[index] = true;
        self.values[index] = value;
        Ok(())
    }

    /// Stores a key or order value, replacing whatever is there.
    pub(crate) fn assign(&mut self, column: ColumnId, value: Value) {
        debug_assert_eq!(column.table, self.table);
        self.values[column.index] = value;
    }

    pub(crate) fn key_values(&self, key: &Key) -> ValueRecord {
        key.columns
            .iter()
            .map(|column| self.get(*column).clone())
            .collect()
    }

    /// Keys are only ever generated or copied as a whole, so a key whose
    /// columns are all `NULL` has not been assigned yet.
    pub(crate) fn key_is_null(&self, key: &Key) -> bool {
        key.columns.iter().all(|column| self.get(*column).is_null())
    }

    pub(crate) fn assign_key(&mut self, key: &Key, values: ValueRecord) {
        debug_assert_eq!(key.columns.len(), values.len());

        for (column, value) in key.columns.iter().zip(values) {
            self.assign(*column, value);
        }
    }

    pub(crate) fn values(&self) -> &ValueRecord {
        &self.values
    }
}
