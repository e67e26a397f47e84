//! The four statements behind both backends, run on a borrowed connection.

use rusqlite::{Connection, params};

use qrconnect_core::NewRecord;

use crate::encode::{RawRecord, encode_kind};

/// Insert `record` and return its assigned id.
pub fn insert(conn: &Connection, record: &NewRecord) -> rusqlite::Result<i64> {
  conn.execute(
    "INSERT INTO qr_history (kind, content, created_at) VALUES (?1, ?2, ?3)",
    params![encode_kind(record.kind), record.content, record.created_at],
  )?;
  Ok(conn.last_insert_rowid())
}

/// Every row, highest id first.
pub fn list_all(conn: &Connection) -> rusqlite::Result<Vec<RawRecord>> {
  let mut stmt = conn.prepare(
    "SELECT id, kind, content, created_at FROM qr_history ORDER BY id DESC",
  )?;
  stmt
    .query_map([], RawRecord::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()
}

/// Returns the number of rows removed (0 or 1).
pub fn delete_one(conn: &Connection, id: i64) -> rusqlite::Result<usize> {
  conn.execute("DELETE FROM qr_history WHERE id = ?1", params![id])
}

pub fn clear_all(conn: &Connection) -> rusqlite::Result<usize> {
  conn.execute("DELETE FROM qr_history", [])
}
