//! Where a history database lives.

use std::{path::PathBuf, time::Duration};

use rusqlite::Connection;
use uuid::Uuid;

use crate::schema;

/// How long a connection waits on a lock held by the other backend.
pub(crate) const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// A database file, or a named in-memory database.
///
/// In-memory databases use SQLite's shared cache so the async and blocking
/// backends opened on the same location see the same rows. The database
/// lives as long as at least one connection to it is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
  File(PathBuf),
  Memory(String),
}

impl StoreLocation {
  pub fn file(path: impl Into<PathBuf>) -> Self { Self::File(path.into()) }

  /// A fresh, uniquely named in-memory database.
  pub fn memory() -> Self {
    Self::Memory(format!("qrconnect-{}", Uuid::new_v4().simple()))
  }

  /// The name handed to `sqlite3_open_v2`: a path, or a URI for memory.
  pub(crate) fn target(&self) -> PathBuf {
    match self {
      Self::File(path) => path.clone(),
      Self::Memory(name) => PathBuf::from(format!("file:{name}?mode=memory&cache=shared")),
    }
  }
}

/// Per-connection setup shared by both backends. File databases run in WAL
/// mode so the async and blocking connections do not block each other's
/// reads.
pub(crate) fn prepare_connection(
  conn: &Connection,
  location: &StoreLocation,
) -> rusqlite::Result<()> {
  conn.busy_timeout(BUSY_TIMEOUT)?;
  if let StoreLocation::File(_) = location {
    let mode: String =
      conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
    tracing::debug!(journal_mode = %mode, "journal mode set");
  }
  schema::migrate(conn)
}
