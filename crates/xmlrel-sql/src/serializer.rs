#[macro_use]
mod fmt;
use fmt::ToSql;

mod create_table;

mod delim;
use delim::{Comma, Period};

mod flavor;
use flavor::Flavor;

mod ident;
use ident::Ident;

mod insert;

mod params;
pub use params::{Params, Placeholder};

mod select;

mod ty;

use xmlrel_core::{
    driver::{
        operation::{Insert, Select, Transaction},
        Capability, Operation,
    },
    schema::db::{self, Table},
    stmt::Value,
};

/// Serialize a driver operation to a SQL string
#[derive(Debug)]
pub struct Serializer<'a> {
    /// Schema against which the operation is to be serialized
    schema: &'a db::Schema,

    /// The database flavor handles the differences between SQL dialects and
    /// supported features.
    flavor: Flavor,

    /// Character quoting table and column names.
    quote: char,
}

struct Formatter<'a, T> {
    /// Handle to the serializer
    serializer: &'a Serializer<'a>,

    /// Where to write the serialized SQL
    dst: &'a mut String,

    /// Where to store parameters
    params: &'a mut T,
}

impl<'a> Serializer<'a> {
    /// Uses the identifier quote a connection reported in its capability.
    pub fn with_capability(mut self, capability: &Capability) -> Self {
        self.quote = capability.identifier_quote;
        self
    }

    /// Serializes a row operation. Values are pushed to `params` and
    /// referenced by placeholder.
    ///
    /// # Panics
    ///
    /// Panics on transaction operations, which take no parameters; use
    /// [`Serializer::serialize_transaction`].
    pub fn serialize(&self, op: &Operation, params: &mut impl Params) -> String {
        match op {
            Operation::Insert(insert) => self.serialize_insert(insert, params),
            Operation::Select(select) => self.serialize_select(select, params),
            Operation::Transaction(transaction) => {
                panic!("transaction op {transaction:?} is not a row operation")
            }
        }
    }

    pub fn serialize_insert(&self, insert: &Insert, params: &mut impl Params) -> String {
        self.write(params, |f| insert.to_sql(f))
    }

    pub fn serialize_select(&self, select: &Select, params: &mut impl Params) -> String {
        self.write(params, |f| select.to_sql(f))
    }

    pub fn serialize_create_table(&self, table: &Table) -> String {
        self.write(&mut Vec::<Value>::new(), |f| table.to_sql(f))
    }

    /// Serialize a transaction control operation to a SQL string.
    pub fn serialize_transaction(&self, op: &Transaction) -> String {
        match op {
            Transaction::Start => match self.flavor {
                Flavor::Mysql => "START TRANSACTION".to_string(),
                Flavor::Postgresql | Flavor::Sqlite => "BEGIN".to_string(),
            },
            Transaction::Commit => "COMMIT".to_string(),
            Transaction::Rollback => "ROLLBACK".to_string(),
        }
    }

    fn write<P: Params>(&self, params: &mut P, f: impl FnOnce(&mut Formatter<'_, P>)) -> String {
        let mut ret = String::new();

        let mut fmt = Formatter {
            serializer: self,
            dst: &mut ret,
            params,
        };

        f(&mut fmt);

        ret.push(';');
        ret
    }

    fn table(&self, id: db::TableId) -> &'a Table {
        self.schema.table(id)
    }

    fn column_name(&self, id: db::ColumnId) -> Ident<&'a str> {
        Ident(&self.schema.column(id).name)
    }
}
