mod macros;

pub use exec_log::ExecLog;

pub mod fixtures;

mod logging_connection;
pub use logging_connection::{DriverOp, LoggingConnection};

pub use pretty_assertions;

use std::sync::{Arc, Mutex};
use xmlrel::{Schema, Transfer};
use xmlrel_core::driver::Driver;
use xmlrel_driver_sqlite::Sqlite;

/// Installs a `tracing` subscriber honoring `RUST_LOG`. Safe to call from
/// every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Opens a fresh in-memory SQLite database with every table of `schema`
/// created and builds a transfer on it. Every operation the transfer issues
/// is recorded in the returned log.
pub async fn setup(schema: Arc<Schema>, builder: &mut xmlrel::Builder) -> (Transfer, ExecLog) {
    init_tracing();

    let mut connection = Sqlite::in_memory().connect().await.unwrap();
    connection.push_schema(&schema.db).await.unwrap();

    let ops = Arc::new(Mutex::new(vec![]));
    let connection = LoggingConnection::new(connection, ops.clone());

    (
        builder.build(schema, Box::new(connection)),
        ExecLog::new(ops),
    )
}
