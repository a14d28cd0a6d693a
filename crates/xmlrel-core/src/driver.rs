mod capability;
pub use capability::Capability;

mod key_generator;
pub use key_generator::{KeyGenerator, SequenceKeyGenerator};

mod response;
pub use response::{Response, Rows};

pub mod operation;
pub use operation::Operation;

use crate::{async_trait, schema::db::Schema};

use std::{fmt::Debug, sync::Arc};

/// The relational store collaborator: a factory for connections.
#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// Describes the driver's capability, which informs SQL generation.
    fn capability(&self) -> &'static Capability;

    /// Opens a new connection.
    async fn connect(&self) -> crate::Result<Box<dyn Connection>>;
}

/// One session with the store. Operations are executed one at a time, in
/// the order they are issued.
#[async_trait]
pub trait Connection: Debug + Send + 'static {
    fn capability(&self) -> &'static Capability;

    /// Execute a database operation
    async fn exec(&mut self, schema: &Arc<Schema>, op: Operation) -> crate::Result<Response>;

    /// Creates every table in the schema.
    async fn push_schema(&mut self, schema: &Schema) -> crate::Result<()>;
}
