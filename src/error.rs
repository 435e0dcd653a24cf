use thiserror::Error;

/// Unified error type for the skip list.
///
/// A missing key is not an error: lookups and removals report absence
/// through `Option`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Configuration rejected by `Options::validate`.
    #[error("Invalid options: {0}")]
    InvalidOptions(String),
    /// Structural invariant violation found by `SkipList::validate`.
    #[error("Corruption: {0}")]
    Corruption(String),
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
