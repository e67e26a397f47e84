//! [`History`]: the async-first, blocking-retry access policy.
//!
//! Every operation runs on the async store first. If that fails it is retried
//! exactly once on the blocking store inside `spawn_blocking`. When both fail
//! the caller gets a [`HistoryError`] carrying the two causes; the helpers
//! suffixed `_or_empty` / `_or_log` degrade instead, for callers that must
//! never fail.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::{
  error::{BoxError, HistoryError},
  record::{HistoryRecord, NewRecord},
  store::{BlockingHistoryStore, HistoryStore},
};

/// The result of a write followed by a dependent refresh.
///
/// `records` is always read *after* the write finished, whether or not the
/// write succeeded.
#[derive(Debug)]
pub struct Refreshed<T> {
  pub write:   Result<T, HistoryError>,
  pub records: Vec<HistoryRecord>,
}

/// An async history store paired with a blocking fallback.
///
/// Cloning is cheap when `A` is (both backends are shared, not copied).
pub struct History<A, B> {
  primary:  A,
  fallback: Arc<B>,
}

impl<A: Clone, B> Clone for History<A, B> {
  fn clone(&self) -> Self {
    Self { primary: self.primary.clone(), fallback: Arc::clone(&self.fallback) }
  }
}

impl<A, B> History<A, B>
where
  A: HistoryStore,
  B: BlockingHistoryStore + 'static,
{
  pub fn new(primary: A, fallback: B) -> Self {
    Self { primary, fallback: Arc::new(fallback) }
  }

  pub fn primary(&self) -> &A { &self.primary }

  pub fn fallback(&self) -> &B { &self.fallback }

  // ── Checked operations ────────────────────────────────────────────────────

  pub async fn insert(
    &self,
    record: NewRecord,
  ) -> Result<HistoryRecord, HistoryError> {
    match self.primary.insert(record.clone()).await {
      Ok(inserted) => {
        tracing::debug!(id = inserted.id, kind = %inserted.kind, "history record inserted");
        Ok(inserted)
      }
      Err(e) => self.retry_blocking("insert", e, move |s| s.insert(record)).await,
    }
  }

  pub async fn list_all(&self) -> Result<Vec<HistoryRecord>, HistoryError> {
    match self.primary.list_all().await {
      Ok(records) => Ok(records),
      Err(e) => self.retry_blocking("list_all", e, |s| s.list_all()).await,
    }
  }

  pub async fn delete_one(&self, id: i64) -> Result<(), HistoryError> {
    match self.primary.delete_one(id).await {
      Ok(()) => {
        tracing::debug!(id, "history record deleted");
        Ok(())
      }
      Err(e) => {
        self.retry_blocking("delete_one", e, move |s| s.delete_one(id)).await
      }
    }
  }

  pub async fn clear_all(&self) -> Result<(), HistoryError> {
    match self.primary.clear_all().await {
      Ok(()) => {
        tracing::debug!("history cleared");
        Ok(())
      }
      Err(e) => self.retry_blocking("clear_all", e, |s| s.clear_all()).await,
    }
  }

  // ── Degrading operations ──────────────────────────────────────────────────

  /// Like [`list_all`](Self::list_all), but an unreadable store lists as
  /// empty. The failure is still logged.
  pub async fn list_or_empty(&self) -> Vec<HistoryRecord> {
    self.list_all().await.unwrap_or_default()
  }

  /// Insert, logging instead of returning a failure.
  pub async fn insert_or_log(&self, record: NewRecord) -> Option<HistoryRecord> {
    self.insert(record).await.ok()
  }

  // ── Chained write + refresh ───────────────────────────────────────────────

  pub async fn insert_then_list(&self, record: NewRecord) -> Refreshed<HistoryRecord> {
    let write = self.insert(record).await;
    Refreshed { write, records: self.list_or_empty().await }
  }

  pub async fn delete_then_list(&self, id: i64) -> Refreshed<()> {
    let write = self.delete_one(id).await;
    Refreshed { write, records: self.list_or_empty().await }
  }

  pub async fn clear_then_list(&self) -> Refreshed<()> {
    let write = self.clear_all().await;
    Refreshed { write, records: self.list_or_empty().await }
  }

  // ── Internals ─────────────────────────────────────────────────────────────

  async fn retry_blocking<T, E, F>(
    &self,
    op: &'static str,
    primary: E,
    call: F,
  ) -> Result<T, HistoryError>
  where
    T: Send + 'static,
    E: std::error::Error + Send + Sync + 'static,
    F: FnOnce(&B) -> Result<T, B::Error> + Send + 'static,
  {
    tracing::warn!(op, error = %primary, "async history store failed, retrying blocking");

    let store = Arc::clone(&self.fallback);
    let fallback: BoxError =
      match tokio::task::spawn_blocking(move || call(&store)).await {
        Ok(Ok(value)) => return Ok(value),
        Ok(Err(e)) => Box::new(e),
        Err(join) => Box::new(join),
      };

    tracing::error!(op, primary = %primary, fallback = %fallback, "history operation failed on both stores");
    Err(HistoryError::Unavailable { op, primary: Box::new(primary), fallback })
  }
}

impl<A, B> History<A, B>
where
  A: HistoryStore + Clone + 'static,
  B: BlockingHistoryStore + 'static,
{
  /// Insert on a background task. Dropping the handle detaches the write.
  pub fn spawn_insert(
    &self,
    record: NewRecord,
  ) -> JoinHandle<Result<HistoryRecord, HistoryError>> {
    let history = self.clone();
    tokio::spawn(async move { history.insert(record).await })
  }
}
