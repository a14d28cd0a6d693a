use crate::{
    async_trait,
    schema::db::{Key, Table},
    stmt::{Value, ValueRecord},
    Error, Result,
};

use std::{collections::HashMap, fmt::Debug};

/// Produces values for generated keys.
#[async_trait]
pub trait KeyGenerator: Debug + Send {
    /// Returns a fresh value for every column of `key`, in key column order.
    async fn next_key(&mut self, table: &Table, key: &Key) -> Result<ValueRecord>;
}

/// Hands out 1, 2, 3, ... per key. Supports single-column keys only.
#[derive(Debug, Default)]
pub struct SequenceKeyGenerator {
    next: HashMap<String, i64>,
}

impl SequenceKeyGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyGenerator for SequenceKeyGenerator {
    async fn next_key(&mut self, table: &Table, key: &Key) -> Result<ValueRecord> {
        if key.columns.len() != 1 {
            return Err(Error::invalid_mapping(format!(
                "sequence key generator cannot generate {}-column key `{}` of table `{}`",
                key.columns.len(),
                key.name,
                table.name
            )));
        }

        let next = self
            .next
            .entry(format!("{}.{}", table.name, key.name))
            .or_insert(1);
        let value = *next;
        *next += 1;

        Ok(ValueRecord::from_vec(vec![Value::I64(value)]))
    }
}
