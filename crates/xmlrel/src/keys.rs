use crate::row::Row;

use tracing::debug;
use xmlrel_core::{
    driver::KeyGenerator,
    schema::db::{Key, KeyId, Table},
    Error, Result,
};

/// Gives rows their key values before they are written.
///
/// Values are generated lazily: a key is generated the first time a row is
/// about to be inserted with the key still unassigned, and never again for
/// that row. Key values themselves always come from the configured
/// [`KeyGenerator`].
#[derive(Debug)]
pub(crate) struct KeyResolver<'a> {
    generator: Option<&'a mut Box<dyn KeyGenerator>>,
}

impl<'a> KeyResolver<'a> {
    pub(crate) fn new(generator: Option<&'a mut Box<dyn KeyGenerator>>) -> KeyResolver<'a> {
        KeyResolver { generator }
    }

    /// Assigns the row's generated primary key, if it has none yet, and
    /// makes sure every key in `needed` holds a value.
    ///
    /// `needed` lists keys whose values are about to be copied into linked
    /// rows. A supplied key that is still unassigned at this point cannot be
    /// linked.
    pub(crate) async fn prepare(
        &mut self,
        table: &Table,
        row: &mut Row,
        needed: &[KeyId],
    ) -> Result<()> {
        if let Some(primary_key) = table.primary_key() {
            if primary_key.is_generated() && row.key_is_null(primary_key) {
                self.generate(table, primary_key, row).await?;
            }
        }

        for id in needed {
            let key = table.key(*id);

            if !row.key_is_null(key) {
                continue;
            }

            if !key.is_generated() {
                return Err(Error::structural_violation(format!(
                    "key `{}` of table `{}` links related rows but has no value",
                    key.name, table.name
                )));
            }

            self.generate(table, key, row).await?;
        }

        Ok(())
    }

    async fn generate(&mut self, table: &Table, key: &Key, row: &mut Row) -> Result<()> {
        let Some(generator) = self.generator.as_mut() else {
            return Err(Error::invalid_mapping(format!(
                "key `{}` of table `{}` is generated but no key generator is configured",
                key.name, table.name
            )));
        };

        let values = generator.next_key(table, key).await?;

        if values.len() != key.columns.len() {
            return Err(Error::invalid_mapping(format!(
                "key generator returned {} values for key `{}` of table `{}`, which has {} columns",
                values.len(),
                key.name,
                table.name,
                key.columns.len()
            )));
        }

        debug!(table = %table.name, key = %key.name, ?values, "generated key");
        row.assign_key(key, values);
        Ok(())
    }
}

/// Copies the values of `from_key` in `from` into `to_key` in `to`.
pub(crate) fn copy_key(from: &Row, from_key: &Key, to: &mut Row, to_key: &Key) {
    to.assign_key(to_key, from.key_values(from_key));
}
