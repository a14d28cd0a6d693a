use serde::{Deserialize, Serialize};

/// Database-level storage types.
///
/// `db::Type` is the SQL type a column is declared with. It also carries the
/// column's length (`VarChar`, `Char`) or precision and scale (`Numeric`),
/// which the value conversion layer enforces when text from a document is
/// written to the column.
///
/// Values read from and written to columns use [`stmt::Value`]; the mapping
/// between the two is:
///
/// ```text
/// Boolean              ↔  Value::Bool
/// Integer(n), n bytes  ↔  Value::I64 (range checked against n)
/// Float(n)             ↔  Value::F64
/// Numeric(p, s)        ↔  Value::Decimal (textual, digit counts checked)
/// Text, VarChar, Char  ↔  Value::String (length checked)
/// Date, Time, Timestamp ↔ Value::Date, Value::Time, Value::Timestamp
/// ```
///
/// [`stmt::Value`]: crate::stmt::Value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Type {
    /// A boolean value
    Boolean,

    /// A signed integer of `n` bytes
    Integer(u8),

    /// A floating point number of `n` bytes
    Float(u8),

    /// Decimal number with optional precision and scale.
    /// - `None`: Arbitrary-precision decimal
    /// - `Some((precision, scale))`: Fixed precision and scale
    Numeric(Option<(u32, u32)>),

    /// Unconstrained text type
    Text,

    /// Text type with an explicit maximum length
    VarChar(u64),

    /// Fixed length text type
    Char(u64),

    /// A civil date in the Gregorian calendar.
    Date,

    /// Civil "wall clock" time.
    Time,

    /// Civil date and time.
    Timestamp,
}

impl Type {
    /// Maximum number of characters a value of this type may hold.
    pub fn max_length(&self) -> Option<u64> {
        match *self {
            Type::VarChar(len) | Type::Char(len) => Some(len),
            _ => None,
        }
    }

    pub fn is_textual(&self) -> bool {
        matches!(self, Type::Text | Type::VarChar(_) | Type::Char(_))
    }

    /// SQL spelling of the type, used in error messages and DDL.
    pub fn sql_name(&self) -> String {
        match *self {
            Type::Boolean => "BOOLEAN".to_string(),
            Type::Integer(1) | Type::Integer(2) => "SMALLINT".to_string(),
            Type::Integer(n) if n <= 4 => "INTEGER".to_string(),
            Type::Integer(_) => "BIGINT".to_string(),
            Type::Float(n) if n <= 4 => "REAL".to_string(),
            Type::Float(_) => "DOUBLE PRECISION".to_string(),
            Type::Numeric(None) => "NUMERIC".to_string(),
            Type::Numeric(Some((precision, scale))) => format!("NUMERIC({precision}, {scale})"),
            Type::Text => "TEXT".to_string(),
            Type::VarChar(len) => format!("VARCHAR({len})"),
            Type::Char(len) => format!("CHAR({len})"),
            Type::Date => "DATE".to_string(),
            Type::Time => "TIME".to_string(),
            Type::Timestamp => "TIMESTAMP".to_string(),
        }
    }
}
