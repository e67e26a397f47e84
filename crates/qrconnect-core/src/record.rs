//! History records: one persisted scan or generate event.
//!
//! Records are immutable once written. The only mutations a store supports
//! are insertion and deletion.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, timestamp};

/// Which action produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
  Scan,
  Generate,
}

impl RecordKind {
  /// The text stored in the `kind` column.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Scan => "Scan",
      Self::Generate => "Generate",
    }
  }
}

impl fmt::Display for RecordKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for RecordKind {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "Scan" => Ok(Self::Scan),
      "Generate" => Ok(Self::Generate),
      other => Err(Error::UnknownKind(other.to_owned())),
    }
  }
}

/// A record as persisted, with its store-assigned id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
  /// Assigned on insert; unique and increasing over the store's lifetime.
  pub id:         i64,
  pub kind:       RecordKind,
  /// The decoded or encoded payload.
  pub content:    String,
  /// Milliseconds since the Unix epoch, as decimal text.
  pub created_at: String,
}

/// Input to an insert. The timestamp is fixed by the caller, not the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
  pub kind:       RecordKind,
  pub content:    String,
  pub created_at: String,
}

impl NewRecord {
  /// Stamp a new record with the current time.
  pub fn new(kind: RecordKind, content: impl Into<String>) -> Self {
    Self::at(kind, content, timestamp::now_millis())
  }

  pub fn at(
    kind: RecordKind,
    content: impl Into<String>,
    created_at: impl Into<String>,
  ) -> Self {
    Self { kind, content: content.into(), created_at: created_at.into() }
  }

  pub fn scan(content: impl Into<String>) -> Self {
    Self::new(RecordKind::Scan, content)
  }

  pub fn generate(content: impl Into<String>) -> Self {
    Self::new(RecordKind::Generate, content)
  }

  /// Attach the id a store assigned to this record.
  pub fn into_record(self, id: i64) -> HistoryRecord {
    HistoryRecord {
      id,
      kind: self.kind,
      content: self.content,
      created_at: self.created_at,
    }
  }
}
