//! Error types shared by catalog loading and plural rule evaluation.
use thiserror::Error;

/// Result type for catalog and plural rule operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the catalog loaders and the plural rule engine.
///
/// Every failure is a distinct, catchable value; a failed load never returns
/// a partially populated catalog and a failed evaluation never returns an
/// out-of-range variant index.
#[derive(Debug, Error)]
pub enum Error {
  /// A catalog source could not be used: missing or unreadable file, bad
  /// magic number, unsupported revision, or a resource of the wrong shape.
  #[error("{0}")]
  InvalidArgument(String),

  /// A plural-forms declaration or selector expression could not be parsed.
  #[error("{0}")]
  Parse(String),

  /// A plural rule evaluated to an index outside its declared range.
  #[error("calculated result {result} is not between 0 and {}", .num_plurals - 1)]
  Range {
    /// The value the selector expression produced.
    result: i64,
    /// The number of plural forms the rule declared.
    num_plurals: usize,
  },
}
