//! [`SharedHistory`]: one lazily opened history per database.

use std::sync::Arc;

use qrconnect_core::History;
use tokio::sync::OnceCell;

use crate::{BlockingSqliteStore, Result, SqliteStore, StoreLocation};

/// The async store with its blocking fallback, both on one database.
pub type SqliteHistory = History<SqliteStore, BlockingSqliteStore>;

/// Open both backends on `location`.
pub async fn open_history(location: &StoreLocation) -> Result<SqliteHistory> {
  let primary = SqliteStore::open(location).await?;

  let blocking_location = location.clone();
  let fallback =
    tokio::task::spawn_blocking(move || BlockingSqliteStore::open(&blocking_location))
      .await??;

  Ok(History::new(primary, fallback))
}

/// A cloneable handle that opens the history on first use.
///
/// Concurrent first calls to [`get`](Self::get) open the database once; every
/// clone then shares that instance. It is never explicitly closed.
#[derive(Clone)]
pub struct SharedHistory {
  location: StoreLocation,
  cell:     Arc<OnceCell<SqliteHistory>>,
}

impl SharedHistory {
  pub fn new(location: StoreLocation) -> Self {
    Self { location, cell: Arc::new(OnceCell::new()) }
  }

  pub fn location(&self) -> &StoreLocation { &self.location }

  /// Whether the database has been opened yet.
  pub fn is_open(&self) -> bool { self.cell.initialized() }

  /// The shared history, opening it if this is the first call. A failed open
  /// is retried by the next call.
  pub async fn get(&self) -> Result<&SqliteHistory> {
    self.cell.get_or_try_init(|| open_history(&self.location)).await
  }
}
