//! The `HistoryStore` and `BlockingHistoryStore` traits.
//!
//! Storage backends (e.g. `qrconnect-store-sqlite`) implement both; higher
//! layers talk to them through [`History`](crate::History), which pairs an
//! async store with a blocking one for retries.

use std::future::Future;

use crate::record::{HistoryRecord, NewRecord};

// ─── Async ───────────────────────────────────────────────────────────────────

/// Async access to the history table.
///
/// All methods return `Send` futures so the trait can be used from
/// multi-threaded tokio runtimes and spawned tasks.
pub trait HistoryStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Append a record and return it with its assigned id. Duplicate content
  /// is allowed.
  fn insert(
    &self,
    record: NewRecord,
  ) -> impl Future<Output = Result<HistoryRecord, Self::Error>> + Send + '_;

  /// Snapshot of every record, most recent (highest id) first.
  fn list_all(
    &self,
  ) -> impl Future<Output = Result<Vec<HistoryRecord>, Self::Error>> + Send + '_;

  /// Remove the record with `id`. Absent ids are not an error.
  fn delete_one(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Remove every record.
  fn clear_all(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

// ─── Blocking ────────────────────────────────────────────────────────────────

/// Synchronous counterpart of [`HistoryStore`], with identical semantics.
///
/// Calls block the current thread; async callers must run them via
/// `tokio::task::spawn_blocking`.
pub trait BlockingHistoryStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn insert(&self, record: NewRecord) -> Result<HistoryRecord, Self::Error>;

  fn list_all(&self) -> Result<Vec<HistoryRecord>, Self::Error>;

  fn delete_one(&self, id: i64) -> Result<(), Self::Error>;

  fn clear_all(&self) -> Result<(), Self::Error>;
}
