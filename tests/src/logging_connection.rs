use std::sync::{Arc, Mutex};
use async_trait::async_trait;
use xmlrel_core::{
    driver::{Capability, Connection, Operation, Response, Rows},
    schema::db::Schema,
    Result,
};

#[derive(Debug)]
pub struct DriverOp {
    pub operation: Operation,
    pub response: Response,
}

/// A connection wrapper that logs all operations for testing purposes
#[derive(Debug)]
pub struct LoggingConnection {
    /// The underlying connection that actually executes operations
    inner: Box<dyn Connection>,

    /// Log of all operations executed through this connection
    ops_log: Arc<Mutex<Vec<DriverOp>>>,
}

impl LoggingConnection {
    pub fn new(inner: Box<dyn Connection>, ops_log: Arc<Mutex<Vec<DriverOp>>>) -> Self {
        Self { inner, ops_log }
    }
}

#[async_trait]
impl Connection for LoggingConnection {
    fn capability(&self) -> &'static Capability {
        self.inner.capability()
    }

    async fn exec(&mut self, schema: &Arc<Schema>, operation: Operation) -> Result<Response> {
        let operation_clone = operation.clone();

        let response = self.inner.exec(schema, operation).await?;

        let duplicated = Response {
            rows: match &response.rows {
                Rows::Count(count) => Rows::Count(*count),
                Rows::Values(values) => Rows::Values(values.clone()),
            },
        };

        self.ops_log
            .lock()
            .expect("Failed to acquire ops log lock")
            .push(DriverOp {
                operation: operation_clone,
                response: duplicated,
            });

        Ok(response)
    }

    async fn push_schema(&mut self, schema: &Schema) -> Result<()> {
        self.inner.push_schema(schema).await
    }
}
