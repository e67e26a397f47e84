//! SQL schema for the history store.
//!
//! The layout version lives in `PRAGMA user_version`. A database carrying any
//! other non-zero version has its history table dropped and recreated.

use rusqlite::Connection;

/// Current layout version.
pub const SCHEMA_VERSION: i64 = 1;

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
-- AUTOINCREMENT keeps ids of deleted rows from being handed out again.
CREATE TABLE IF NOT EXISTS qr_history (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    kind        TEXT NOT NULL,   -- 'Scan' | 'Generate'
    content     TEXT NOT NULL,
    created_at  TEXT NOT NULL    -- epoch milliseconds, set by the caller
);
";

const DROP: &str = "DROP TABLE IF EXISTS qr_history;";

/// Bring `conn` to [`SCHEMA_VERSION`].
pub fn migrate(conn: &Connection) -> rusqlite::Result<()> {
  let version: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

  if version != 0 && version != SCHEMA_VERSION {
    tracing::warn!(
      found = version,
      expected = SCHEMA_VERSION,
      "unrecognised history schema, recreating table"
    );
    conn.execute_batch(DROP)?;
  }

  conn.execute_batch(SCHEMA)?;
  conn.pragma_update(None, "user_version", SCHEMA_VERSION)
}
