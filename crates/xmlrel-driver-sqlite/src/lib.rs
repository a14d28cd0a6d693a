mod value;
pub(crate) use value::Value;

use rusqlite::Connection as RusqliteConnection;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::trace;
use url::Url;
use xmlrel_core::{
    async_trait,
    driver::{operation::Operation, Capability, Driver, Response},
    err,
    schema::db::{Schema, Table},
    stmt, Error, Result,
};
use xmlrel_sql as sql;

#[derive(Debug)]
pub enum Sqlite {
    File(PathBuf),
    InMemory,
}

impl Sqlite {
    /// Create a new SQLite driver with an arbitrary connection URL
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str).map_err(Error::driver_operation_failed)?;

        if url.scheme() != "sqlite" {
            return Err(err!(
                "connection URL does not have a `sqlite` scheme; url={}",
                url_str
            ));
        }

        if url.path() == ":memory:" {
            Ok(Self::InMemory)
        } else {
            Ok(Self::File(PathBuf::from(url.path())))
        }
    }

    /// Create an in-memory SQLite database
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    /// Open a SQLite database at the specified file path
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self::File(path.as_ref().to_path_buf())
    }
}

#[async_trait]
impl Driver for Sqlite {
    fn capability(&self) -> &'static Capability {
        &Capability::SQLITE
    }

    async fn connect(&self) -> Result<Box<dyn xmlrel_core::Connection>> {
        let connection = match self {
            Sqlite::File(path) => Connection::open(path)?,
            Sqlite::InMemory => Connection::in_memory()?,
        };
        Ok(Box::new(connection))
    }
}

#[derive(Debug)]
pub struct Connection {
    connection: RusqliteConnection,
}

impl Connection {
    pub fn in_memory() -> Result<Self> {
        let connection =
            RusqliteConnection::open_in_memory().map_err(Error::driver_operation_failed)?;
        Ok(Self { connection })
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = RusqliteConnection::open(path).map_err(Error::driver_operation_failed)?;
        Ok(Self { connection })
    }

    fn serializer<'a>(&self, schema: &'a Schema) -> sql::Serializer<'a> {
        sql::Serializer::sqlite(schema).with_capability(&Capability::SQLITE)
    }

    fn execute(&mut self, sql_str: &str, params: Vec<stmt::Value>) -> Result<u64> {
        trace!(sql = sql_str, params = params.len(), "execute");

        let params = params.into_iter().map(Value::from).collect::<Vec<_>>();

        let mut stmt = self
            .connection
            .prepare_cached(sql_str)
            .map_err(Error::driver_operation_failed)?;

        let count = stmt
            .execute(rusqlite::params_from_iter(params.iter()))
            .map_err(Error::driver_operation_failed)?;

        Ok(count as u64)
    }

    fn query(
        &mut self,
        sql_str: &str,
        params: Vec<stmt::Value>,
        table: &Table,
    ) -> Result<Vec<stmt::ValueRecord>> {
        trace!(sql = sql_str, params = params.len(), "query");

        let params = params.into_iter().map(Value::from).collect::<Vec<_>>();

        let mut stmt = self
            .connection
            .prepare_cached(sql_str)
            .map_err(Error::driver_operation_failed)?;

        let mut rows = stmt
            .query(rusqlite::params_from_iter(params.iter()))
            .map_err(Error::driver_operation_failed)?;

        let mut ret = vec![];

        // The statement and its rows are dropped on every exit path, so a
        // cached statement never carries an open result set.
        while let Some(row) = rows.next().map_err(Error::driver_operation_failed)? {
            let mut items = Vec::with_capacity(table.columns.len());

            for (index, column) in table.columns.iter().enumerate() {
                items.push(Value::from_sql(row, index, &column.ty)?.into_inner());
            }

            ret.push(stmt::ValueRecord::from_vec(items));
        }

        Ok(ret)
    }
}

#[async_trait]
impl xmlrel_core::driver::Connection for Connection {
    fn capability(&self) -> &'static Capability {
        &Capability::SQLITE
    }

    async fn exec(&mut self, schema: &Arc<Schema>, op: Operation) -> Result<Response> {
        let serializer = self.serializer(schema);

        match &op {
            Operation::Transaction(transaction) => {
                let sql_str = serializer.serialize_transaction(transaction);
                self.execute(&sql_str, vec![])?;
                Ok(Response::count(0))
            }
            Operation::Insert(insert) => {
                let mut params: Vec<stmt::Value> = vec![];
                let sql_str = serializer.serialize_insert(insert, &mut params);
                let count = self.execute(&sql_str, params)?;
                Ok(Response::count(count))
            }
            Operation::Select(select) => {
                let mut params: Vec<stmt::Value> = vec![];
                let sql_str = serializer.serialize_select(select, &mut params);
                let rows = self.query(&sql_str, params, schema.table(select.table))?;
                Ok(Response::values(rows))
            }
        }
    }

    async fn push_schema(&mut self, schema: &Schema) -> Result<()> {
        for table in &schema.tables {
            let sql_str = self.serializer(schema).serialize_create_table(table);
            self.execute(&sql_str, vec![])?;
        }

        Ok(())
    }
}
