//! [`BlockingSqliteStore`]: the synchronous SQLite implementation of
//! [`BlockingHistoryStore`].

use std::sync::Mutex;

use rusqlite::Connection;

use qrconnect_core::{HistoryRecord, NewRecord, store::BlockingHistoryStore};

use crate::{
  Error, Result,
  encode::decode_all,
  location::{StoreLocation, prepare_connection},
  queries,
};

/// A history store on a plain `rusqlite` connection. Every call blocks the
/// current thread.
pub struct BlockingSqliteStore {
  conn: Mutex<Connection>,
}

impl BlockingSqliteStore {
  pub fn open(location: &StoreLocation) -> Result<Self> {
    let conn = Connection::open(location.target())?;
    prepare_connection(&conn, location)?;
    tracing::debug!(?location, "opened blocking history store");
    Ok(Self { conn: Mutex::new(conn) })
  }

  fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> rusqlite::Result<T>) -> Result<T> {
    let conn = self.conn.lock().map_err(|_| Error::Poisoned)?;
    Ok(f(&conn)?)
  }
}

impl BlockingHistoryStore for BlockingSqliteStore {
  type Error = Error;

  fn insert(&self, record: NewRecord) -> Result<HistoryRecord> {
    let id = self.with_conn(|conn| queries::insert(conn, &record))?;
    Ok(record.into_record(id))
  }

  fn list_all(&self) -> Result<Vec<HistoryRecord>> {
    Ok(decode_all(self.with_conn(queries::list_all)?))
  }

  fn delete_one(&self, id: i64) -> Result<()> {
    self.with_conn(|conn| queries::delete_one(conn, id))?;
    Ok(())
  }

  fn clear_all(&self) -> Result<()> {
    self.with_conn(queries::clear_all)?;
    Ok(())
  }
}
