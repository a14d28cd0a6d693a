use super::Error;

/// Error when a document or result set does not fit the mapping mid-traversal.
///
/// This occurs when:
/// - A non-root element is mapped as an ignored root
/// - A pass-through mapping is encountered
/// - A repeated element is mapped to a single class-table column
/// - A supplied (non-generated) key is still NULL when a child needs it
/// - A retrieval produces no root row
#[derive(Debug)]
pub(super) struct StructuralViolation {
    message: Box<str>,
}

impl std::error::Error for StructuralViolation {}

impl core::fmt::Display for StructuralViolation {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "structural violation: {}", self.message)
    }
}

impl Error {
    /// Creates a structural violation error.
    pub fn structural_violation(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::StructuralViolation(StructuralViolation {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is a structural violation.
    pub fn is_structural_violation(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::StructuralViolation(_)))
    }
}
