use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rusqlite::{
    types::{ToSql, ToSqlOutput, Value as SqlValue, ValueRef},
    Row,
};
use xmlrel_core::{
    schema::db::Type,
    stmt::Value as CoreValue,
    Error, Result,
};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S%.f";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

#[derive(Debug)]
pub struct Value(CoreValue);

impl From<CoreValue> for Value {
    fn from(value: CoreValue) -> Self {
        Self(value)
    }
}

impl Value {
    /// Converts this SQLite driver value into the core value.
    pub fn into_inner(self) -> CoreValue {
        self.0
    }

    /// Converts a SQLite value within a row to a core value of the column's
    /// declared type.
    pub fn from_sql(row: &Row, index: usize, ty: &Type) -> Result<Self> {
        let value: SqlValue = row.get(index).map_err(Error::driver_operation_failed)?;

        let core_value = match (value, ty) {
            (SqlValue::Null, _) => CoreValue::Null,
            (SqlValue::Integer(value), Type::Boolean) => CoreValue::Bool(value != 0),
            (SqlValue::Integer(value), Type::Float(_)) => CoreValue::F64(value as f64),
            (SqlValue::Integer(value), Type::Numeric(_)) => CoreValue::Decimal(value.to_string()),
            (SqlValue::Integer(value), ty) if ty.is_textual() => {
                CoreValue::String(value.to_string())
            }
            (SqlValue::Integer(value), _) => CoreValue::I64(value),
            (SqlValue::Real(value), Type::Numeric(_)) => CoreValue::Decimal(value.to_string()),
            (SqlValue::Real(value), ty) if ty.is_textual() => CoreValue::String(value.to_string()),
            (SqlValue::Real(value), _) => CoreValue::F64(value),
            (SqlValue::Text(value), Type::Date) => CoreValue::Date(
                NaiveDate::parse_from_str(&value, DATE_FORMAT)
                    .map_err(|_| Error::conversion(&value, "DATE"))?,
            ),
            (SqlValue::Text(value), Type::Time) => CoreValue::Time(
                NaiveTime::parse_from_str(&value, TIME_FORMAT)
                    .map_err(|_| Error::conversion(&value, "TIME"))?,
            ),
            (SqlValue::Text(value), Type::Timestamp) => CoreValue::Timestamp(
                NaiveDateTime::parse_from_str(&value, TIMESTAMP_FORMAT)
                    .map_err(|_| Error::conversion(&value, "TIMESTAMP"))?,
            ),
            (SqlValue::Text(value), Type::Numeric(_)) => CoreValue::Decimal(value),
            (SqlValue::Text(value), _) => CoreValue::String(value),
            (SqlValue::Blob(_), ty) => {
                return Err(Error::conversion("BLOB", ty.sql_name()));
            }
        };

        Ok(Value(core_value))
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        use CoreValue as Value;

        match &self.0 {
            Value::Bool(true) => Ok(ToSqlOutput::Owned(SqlValue::Integer(1))),
            Value::Bool(false) => Ok(ToSqlOutput::Owned(SqlValue::Integer(0))),
            Value::I64(v) => Ok(ToSqlOutput::Owned(SqlValue::Integer(*v))),
            Value::F64(v) => Ok(ToSqlOutput::Owned(SqlValue::Real(*v))),
            Value::Decimal(v) | Value::String(v) => {
                Ok(ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes())))
            }
            Value::Date(v) => Ok(ToSqlOutput::Owned(SqlValue::Text(
                v.format(DATE_FORMAT).to_string(),
            ))),
            Value::Time(v) => Ok(ToSqlOutput::Owned(SqlValue::Text(
                v.format(TIME_FORMAT).to_string(),
            ))),
            Value::Timestamp(v) => Ok(ToSqlOutput::Owned(SqlValue::Text(
                v.format(TIMESTAMP_FORMAT).to_string(),
            ))),
            Value::Null => Ok(ToSqlOutput::Owned(SqlValue::Null)),
        }
    }
}
