use super::Error;

/// Error when a column value cannot be converted to or from its XML text
/// representation.
///
/// This occurs when:
/// - Text does not parse as the column type (unparsable date, non-numeric text)
/// - A number does not fit the column (overflow when narrowing)
/// - Text is longer than a `VARCHAR`/`CHAR` column allows
#[derive(Debug)]
pub(super) struct Conversion {
    value: Box<str>,
    to_type: Box<str>,
}

impl std::error::Error for Conversion {}

impl core::fmt::Display for Conversion {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "cannot convert `{}` to {}", self.value, self.to_type)
    }
}

impl Error {
    /// Creates a conversion error.
    pub fn conversion(value: impl Into<String>, to_type: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Conversion(Conversion {
            value: value.into().into(),
            to_type: to_type.into().into(),
        }))
    }

    /// Returns `true` if this error is a conversion error.
    pub fn is_conversion(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::Conversion(_)))
    }
}
