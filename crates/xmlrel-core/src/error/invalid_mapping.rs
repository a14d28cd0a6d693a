use super::Error;

/// Error when the mapping graph is invalid.
///
/// This occurs when:
/// - A "use class map" delegation or a base class chain forms a cycle
/// - A link does not pair exactly one unique key with one foreign key
/// - A name (table, column, key, element type) cannot be resolved
/// - The document root is mapped to neither a root table nor an ignored root
/// - A generated key is reachable but no key generator is configured
///
/// These errors are raised before any row is read or written.
#[derive(Debug)]
pub(super) struct InvalidMapping {
    message: Box<str>,
}

impl std::error::Error for InvalidMapping {}

impl core::fmt::Display for InvalidMapping {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid mapping: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid mapping error.
    pub fn invalid_mapping(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidMapping(InvalidMapping {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid mapping error.
    pub fn is_invalid_mapping(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::InvalidMapping(_)))
    }
}
