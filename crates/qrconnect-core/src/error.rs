//! Error types for `qrconnect-core`.

use thiserror::Error;

/// A type-erased backend error, as carried by [`HistoryError`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown record kind: {0:?}")]
  UnknownKind(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failure of a [`History`](crate::History) operation.
///
/// Only produced once the async store *and* the blocking retry have both
/// failed; a successful retry is reported as success.
#[derive(Debug, Error)]
pub enum HistoryError {
  #[error("history {op} failed: {primary}; blocking retry failed: {fallback}")]
  Unavailable {
    op:       &'static str,
    primary:  BoxError,
    fallback: BoxError,
  },
}

impl HistoryError {
  /// Name of the operation that failed (`insert`, `list_all`, ...).
  pub fn op(&self) -> &'static str {
    match self {
      Self::Unavailable { op, .. } => *op,
    }
  }
}
