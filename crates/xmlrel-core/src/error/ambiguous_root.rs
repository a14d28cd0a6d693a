use super::Error;

/// Error when a retrieval produces more than one top-level row and the map
/// has no ignored root to hold them.
///
/// A document has exactly one root element, so several root rows can only
/// be returned underneath an ignored (pseudo) root wrapper.
#[derive(Debug)]
pub(super) struct AmbiguousRoot {
    rows: usize,
}

impl std::error::Error for AmbiguousRoot {}

impl core::fmt::Display for AmbiguousRoot {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "ambiguous root: {} root rows found and no ignored root is mapped",
            self.rows
        )
    }
}

impl Error {
    /// Creates an ambiguous root error for the given number of root rows.
    pub fn ambiguous_root(rows: usize) -> Error {
        Error::from(super::ErrorKind::AmbiguousRoot(AmbiguousRoot { rows }))
    }

    /// Returns `true` if this error is an ambiguous root error.
    pub fn is_ambiguous_root(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::AmbiguousRoot(_)))
    }
}
