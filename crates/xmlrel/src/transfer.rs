use crate::{retrieve::Retrieve, store::Store};

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use xmlrel_core::{
    driver::{Connection, Driver, KeyGenerator},
    schema::{
        db::{ColumnId, TableId},
        XmlName,
    },
    stmt::{Value, ValueRecord},
    Document, Error, Result, Schema, XmlDocument,
};

/// When stored rows are committed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitMode {
    /// Every row insert runs in its own transaction.
    AfterInsert,

    /// The whole document is stored in one transaction, rolled back if
    /// storing fails.
    #[default]
    AfterDocument,

    /// No transaction control is issued; the caller manages transactions.
    Never,
}

/// Transfer settings.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    pub commit_mode: CommitMode,

    /// Store empty attribute values and empty element text as `NULL`.
    pub empty_string_is_null: bool,
}

/// Where a stored document's root rows live.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentLocationInfo {
    pub roots: Vec<RootLocation>,

    /// The wrapper element the roots were stored from, when the document
    /// element is an ignored root.
    pub ignored_root: Option<XmlName>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RootLocation {
    /// Element the row was stored from.
    pub element: XmlName,
    pub table: TableId,

    /// Primary key values of the root row.
    pub key: ValueRecord,
}

/// Rows a document is retrieved from.
#[derive(Debug, Clone)]
pub enum Seed {
    /// The row of `table` with the given primary key values.
    Key { table: TableId, key: ValueRecord },

    /// Every row of `table` matching all `column = value` conditions.
    Filter {
        table: TableId,
        filter: Vec<(ColumnId, Value)>,
    },

    /// Rows supplied by the caller, one value per column of `table`.
    Rows {
        table: TableId,
        rows: Vec<ValueRecord>,
    },
}

/// Moves documents between a document tree and a relational store, as
/// described by a compiled mapping.
#[derive(Debug)]
pub struct Transfer {
    schema: Arc<Schema>,
    connection: Box<dyn Connection>,
    key_generator: Option<Box<dyn KeyGenerator>>,
    options: Options,
}

#[derive(Debug, Default)]
pub struct Builder {
    options: Options,
    key_generator: Option<Box<dyn KeyGenerator>>,
}

impl Seed {
    pub fn table(&self) -> TableId {
        match self {
            Seed::Key { table, .. } | Seed::Filter { table, .. } | Seed::Rows { table, .. } => {
                *table
            }
        }
    }
}

impl Transfer {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The underlying connection, for callers managing transactions
    /// themselves.
    pub fn connection(&mut self) -> &mut dyn Connection {
        self.connection.as_mut()
    }

    /// Creates every table of the mapping.
    pub async fn push_schema(&mut self) -> Result<()> {
        self.connection.push_schema(&self.schema.db).await
    }

    /// Stores a document and returns the location of its root rows.
    pub async fn store_document(
        &mut self,
        doc: &(impl Document + Sync),
    ) -> Result<DocumentLocationInfo> {
        if self.key_generator.is_none() && self.schema.requires_key_generator() {
            return Err(Error::invalid_mapping(
                "the mapping generates keys but no key generator is configured",
            ));
        }

        let location = Store::new(
            &self.schema,
            doc,
            self.connection.as_mut(),
            self.key_generator.as_mut(),
            &self.options,
        )
        .apply()
        .await?;

        debug!(roots = location.roots.len(), "stored document");
        Ok(location)
    }

    /// Retrieves a document stored by [`Transfer::store_document`].
    pub async fn retrieve_document(
        &mut self,
        location: &DocumentLocationInfo,
    ) -> Result<XmlDocument> {
        let seeds = location
            .roots
            .iter()
            .map(|root| {
                let seed = Seed::Key {
                    table: root.table,
                    key: root.key.clone(),
                };
                (seed, Some(root.element.clone()))
            })
            .collect();

        Retrieve::new(&self.schema, self.connection.as_mut())
            .apply(seeds, location.ignored_root.clone())
            .await
    }

    /// Retrieves the document rooted at the seed rows. When the mapping has
    /// an ignored root, every seed row becomes a child of the wrapper
    /// element; otherwise the seeds must produce exactly one row.
    pub async fn retrieve(&mut self, seeds: &[Seed]) -> Result<XmlDocument> {
        let wrapper = self
            .schema
            .xml
            .ignored_root()
            .map(|class| class.element.clone());

        let seeds = seeds.iter().map(|seed| (seed.clone(), None)).collect();

        Retrieve::new(&self.schema, self.connection.as_mut())
            .apply(seeds, wrapper)
            .await
    }
}

impl Builder {
    pub fn options(&mut self, options: Options) -> &mut Self {
        self.options = options;
        self
    }

    pub fn commit_mode(&mut self, commit_mode: CommitMode) -> &mut Self {
        self.options.commit_mode = commit_mode;
        self
    }

    pub fn empty_string_is_null(&mut self, value: bool) -> &mut Self {
        self.options.empty_string_is_null = value;
        self
    }

    pub fn key_generator(&mut self, key_generator: impl KeyGenerator + 'static) -> &mut Self {
        self.key_generator = Some(Box::new(key_generator));
        self
    }

    pub fn build(&mut self, schema: Arc<Schema>, connection: Box<dyn Connection>) -> Transfer {
        Transfer {
            schema,
            connection,
            key_generator: self.key_generator.take(),
            options: self.options.clone(),
        }
    }

    /// Opens a connection with `driver` and builds the transfer on it.
    pub async fn connect(&mut self, schema: Arc<Schema>, driver: &dyn Driver) -> Result<Transfer> {
        let connection = driver.connect().await?;
        Ok(self.build(schema, connection))
    }
}
