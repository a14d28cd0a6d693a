//! Conversion between column values and XML text.

use crate::{
    schema::db::{Column, Type},
    stmt::Value,
    Error, Result,
};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S%.f";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Converts between a column's values and their text form.
///
/// Columns without a formatter use [`DefaultFormatter`].
pub trait ValueFormatter: fmt::Debug + Send + Sync {
    fn parse(&self, text: &str, ty: &Type) -> Result<Value>;

    fn format(&self, value: &Value, ty: &Type) -> Result<String>;
}

/// Canonical lexical forms: `true`/`false`, decimal numbers, ISO 8601 dates
/// and times.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultFormatter;

/// Formats date, time and timestamp columns with a `chrono` pattern.
/// Other types fall back to [`DefaultFormatter`].
#[derive(Debug, Clone)]
pub struct DateTimeFormatter {
    pattern: String,
}

/// Converts document text to a value of `column`'s type.
///
/// Text longer than the column allows, integers outside the column's range
/// and decimals with too many digits are conversion errors.
pub fn to_value(column: &Column, text: &str) -> Result<Value> {
    let value = match &column.formatter {
        Some(formatter) => formatter.parse(text, &column.ty)?,
        None => DefaultFormatter.parse(text, &column.ty)?,
    };

    if let (Some(max), Value::String(value)) = (column.ty.max_length(), &value) {
        if value.chars().count() as u64 > max {
            return Err(Error::conversion(text, column.ty.sql_name()));
        }
    }

    Ok(value)
}

/// Converts a column value to document text. `NULL` has no text form.
pub fn to_text(column: &Column, value: &Value) -> Result<Option<String>> {
    if value.is_null() {
        return Ok(None);
    }

    let text = match &column.formatter {
        Some(formatter) => formatter.format(value, &column.ty)?,
        None => DefaultFormatter.format(value, &column.ty)?,
    };

    Ok(Some(text))
}

impl ValueFormatter for DefaultFormatter {
    fn parse(&self, text: &str, ty: &Type) -> Result<Value> {
        let fail = || Error::conversion(text, ty.sql_name());
        let trimmed = text.trim();

        Ok(match *ty {
            Type::Boolean => match trimmed {
                "true" | "1" => Value::Bool(true),
                "false" | "0" => Value::Bool(false),
                _ => return Err(fail()),
            },
            Type::Integer(bytes) => {
                let value: i64 = trimmed.parse().map_err(|_| fail())?;
                if !integer_fits(value, bytes) {
                    return Err(fail());
                }
                Value::I64(value)
            }
            Type::Float(bytes) => {
                let value: f64 = trimmed.parse().map_err(|_| fail())?;
                if bytes <= 4 && value.is_finite() && value.abs() > f32::MAX as f64 {
                    return Err(fail());
                }
                Value::F64(value)
            }
            Type::Numeric(precision) => {
                if !decimal_fits(trimmed, precision) {
                    return Err(fail());
                }
                Value::Decimal(trimmed.to_string())
            }
            Type::Text | Type::VarChar(_) | Type::Char(_) => Value::String(text.to_string()),
            Type::Date => Value::Date(
                NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| fail())?,
            ),
            Type::Time => Value::Time(
                NaiveTime::parse_from_str(trimmed, TIME_FORMAT).map_err(|_| fail())?,
            ),
            Type::Timestamp => Value::Timestamp(
                NaiveDateTime::parse_from_str(trimmed, TIMESTAMP_FORMAT).map_err(|_| fail())?,
            ),
        })
    }

    fn format(&self, value: &Value, _ty: &Type) -> Result<String> {
        Ok(match value {
            Value::Bool(value) => value.to_string(),
            Value::I64(value) => value.to_string(),
            Value::F64(value) => value.to_string(),
            Value::Decimal(value) | Value::String(value) => value.clone(),
            Value::Date(value) => value.format(DATE_FORMAT).to_string(),
            Value::Time(value) => value.format(TIME_FORMAT).to_string(),
            Value::Timestamp(value) => value.format(TIMESTAMP_FORMAT).to_string(),
            Value::Null => return Err(Error::conversion("NULL", "text")),
        })
    }
}

impl DateTimeFormatter {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl ValueFormatter for DateTimeFormatter {
    fn parse(&self, text: &str, ty: &Type) -> Result<Value> {
        let fail = || Error::conversion(text, ty.sql_name());
        let trimmed = text.trim();

        Ok(match ty {
            Type::Date => Value::Date(
                NaiveDate::parse_from_str(trimmed, &self.pattern).map_err(|_| fail())?,
            ),
            Type::Time => Value::Time(
                NaiveTime::parse_from_str(trimmed, &self.pattern).map_err(|_| fail())?,
            ),
            Type::Timestamp => Value::Timestamp(
                NaiveDateTime::parse_from_str(trimmed, &self.pattern).map_err(|_| fail())?,
            ),
            _ => DefaultFormatter.parse(text, ty)?,
        })
    }

    fn format(&self, value: &Value, ty: &Type) -> Result<String> {
        Ok(match value {
            Value::Date(value) => value.format(&self.pattern).to_string(),
            Value::Time(value) => value.format(&self.pattern).to_string(),
            Value::Timestamp(value) => value.format(&self.pattern).to_string(),
            _ => DefaultFormatter.format(value, ty)?,
        })
    }
}

fn integer_fits(value: i64, bytes: u8) -> bool {
    match bytes {
        1 => i8::try_from(value).is_ok(),
        2 => i16::try_from(value).is_ok(),
        3 | 4 => i32::try_from(value).is_ok(),
        _ => true,
    }
}

/// Checks the lexical form of a decimal and, when the column has them, its
/// precision and scale.
fn decimal_fits(text: &str, precision: Option<(u32, u32)>) -> bool {
    let unsigned = text.strip_prefix(['-', '+']).unwrap_or(text);
    let (int, frac) = unsigned.split_once('.').unwrap_or((unsigned, ""));

    let digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());

    if (int.is_empty() && frac.is_empty()) || !digits(int) || !digits(frac) {
        return false;
    }

    match precision {
        None => true,
        Some((precision, scale)) => {
            let int_digits = int.trim_start_matches('0').len() as u32;
            let frac_digits = frac.trim_end_matches('0').len() as u32;
            frac_digits <= scale && int_digits <= precision.saturating_sub(scale)
        }
    }
}
