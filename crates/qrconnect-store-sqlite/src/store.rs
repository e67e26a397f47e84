//! [`SqliteStore`]: the async SQLite implementation of [`HistoryStore`].

use qrconnect_core::{HistoryRecord, NewRecord, store::HistoryStore};

use crate::{
  Result,
  encode::{RawRecord, decode_all},
  location::{StoreLocation, prepare_connection},
  queries,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A history store backed by a single SQLite database.
///
/// Cloning is cheap: every clone talks to the same background connection.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `location` and run schema initialisation.
  pub async fn open(location: &StoreLocation) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(location.target()).await?;
    let store = Self { conn };
    store.init_schema(location).await?;
    tracing::debug!(?location, "opened async history store");
    Ok(store)
  }

  /// Open a private in-memory store; useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    Self::open(&StoreLocation::memory()).await
  }

  async fn init_schema(&self, location: &StoreLocation) -> Result<()> {
    let location = location.clone();
    self
      .conn
      .call(move |conn| {
        prepare_connection(conn, &location)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Shut down the background connection. Every clone of this store fails
  /// from then on.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    Ok(())
  }
}

// ─── HistoryStore impl ───────────────────────────────────────────────────────

impl HistoryStore for SqliteStore {
  type Error = crate::Error;

  async fn insert(&self, record: NewRecord) -> Result<HistoryRecord> {
    let inserted = self
      .conn
      .call(move |conn| {
        let id = queries::insert(conn, &record)?;
        Ok(record.into_record(id))
      })
      .await?;
    Ok(inserted)
  }

  async fn list_all(&self) -> Result<Vec<HistoryRecord>> {
    let raws: Vec<RawRecord> = self
      .conn
      .call(|conn| Ok(queries::list_all(conn)?))
      .await?;
    Ok(decode_all(raws))
  }

  async fn delete_one(&self, id: i64) -> Result<()> {
    self
      .conn
      .call(move |conn| Ok(queries::delete_one(conn, id)?))
      .await?;
    Ok(())
  }

  async fn clear_all(&self) -> Result<()> {
    self
      .conn
      .call(|conn| Ok(queries::clear_all(conn)?))
      .await?;
    Ok(())
  }
}
