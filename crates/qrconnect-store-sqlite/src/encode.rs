//! Conversion between [`HistoryRecord`] and the plain-text columns of
//! `qr_history`.

use qrconnect_core::{HistoryRecord, RecordKind};

use crate::Result;

pub fn encode_kind(kind: RecordKind) -> &'static str { kind.as_str() }

pub fn decode_kind(s: &str) -> Result<RecordKind> { Ok(s.parse()?) }

/// Raw values read directly from a `qr_history` row.
pub struct RawRecord {
  pub id:         i64,
  pub kind:       String,
  pub content:    String,
  pub created_at: String,
}

impl RawRecord {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      kind:       row.get(1)?,
      content:    row.get(2)?,
      created_at: row.get(3)?,
    })
  }

  pub fn into_record(self) -> Result<HistoryRecord> {
    Ok(HistoryRecord {
      id:         self.id,
      kind:       decode_kind(&self.kind)?,
      content:    self.content,
      created_at: self.created_at,
    })
  }
}

/// Decode every row that can be decoded. A row with an unknown `kind` is
/// skipped with a warning so it cannot hide the rest of the history.
pub fn decode_all(raws: Vec<RawRecord>) -> Vec<HistoryRecord> {
  raws
    .into_iter()
    .filter_map(|raw| {
      let (id, kind) = (raw.id, raw.kind.clone());
      match raw.into_record() {
        Ok(record) => Some(record),
        Err(e) => {
          tracing::warn!(id, kind = %kind, error = %e, "skipping unreadable history row");
          None
        }
      }
    })
    .collect()
}
