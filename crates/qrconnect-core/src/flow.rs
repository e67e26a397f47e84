//! The flows that produce and consume history records.
//!
//! - [`ScanFlow`] records the first decoded result of a scanning session.
//! - [`generate`] runs the external encoder and records the input text.
//! - [`HistoryView`] holds the most-recent-first listing and its mutations.
//!
//! Decoding, encoding and the camera are external services. Only the
//! encoder appears here, as the [`QrEncoder`] trait.

use crate::{
  error::HistoryError,
  history::History,
  record::{HistoryRecord, NewRecord},
  store::{BlockingHistoryStore, HistoryStore},
};

/// Side length, in pixels, of generated QR images.
pub const QR_SIZE: u32 = 400;

/// Shown by a history listing with no records.
pub const EMPTY_HISTORY_MESSAGE: &str = "No history items found";

// ─── Scan ────────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum ScanOutcome {
  /// First result of the session; the write result is attached.
  Recorded(Result<HistoryRecord, HistoryError>),
  /// The session already produced a result; nothing was written.
  AlreadyScanned,
  /// Blank decoded text; nothing was written and the session stays open.
  Empty,
}

/// One scanning session. The decoder delivers results continuously; only the
/// first is kept until [`reset`](Self::reset).
pub struct ScanFlow<A, B> {
  history: History<A, B>,
  result:  Option<String>,
}

impl<A, B> ScanFlow<A, B>
where
  A: HistoryStore,
  B: BlockingHistoryStore + 'static,
{
  pub fn new(history: History<A, B>) -> Self { Self { history, result: None } }

  /// Handle one decoded string from the external decoder.
  pub async fn on_decoded(&mut self, text: &str) -> ScanOutcome {
    if text.trim().is_empty() {
      return ScanOutcome::Empty;
    }
    if self.result.is_some() {
      return ScanOutcome::AlreadyScanned;
    }
    self.result = Some(text.to_owned());
    ScanOutcome::Recorded(self.history.insert(NewRecord::scan(text)).await)
  }

  /// The decoded text of this session, if any.
  pub fn result(&self) -> Option<&str> { self.result.as_deref() }

  /// Start a new session (e.g. when the scanner resumes).
  pub fn reset(&mut self) { self.result = None; }
}

// ─── Generate ────────────────────────────────────────────────────────────────

/// External QR encoder.
pub trait QrEncoder {
  type Image;
  type Error: std::error::Error;

  fn encode(&self, text: &str, width: u32, height: u32) -> Result<Self::Image, Self::Error>;
}

#[derive(Debug)]
pub struct GenerateOutcome<I> {
  /// `None` when the encoder failed.
  pub image:  Option<I>,
  /// The record is written even when `image` is `None`.
  pub record: Result<HistoryRecord, HistoryError>,
}

impl<I> GenerateOutcome<I> {
  /// An image is available and its history entry was stored.
  pub fn succeeded(&self) -> bool { self.image.is_some() && self.record.is_ok() }
}

/// Encode `text` and record it as a `Generate` event.
///
/// Returns `None` without encoding or writing anything when `text` is blank.
pub async fn generate<A, B, E>(
  history: &History<A, B>,
  encoder: &E,
  text: &str,
) -> Option<GenerateOutcome<E::Image>>
where
  A: HistoryStore,
  B: BlockingHistoryStore + 'static,
  E: QrEncoder,
{
  if text.trim().is_empty() {
    return None;
  }

  let image = match encoder.encode(text, QR_SIZE, QR_SIZE) {
    Ok(image) => Some(image),
    Err(e) => {
      tracing::warn!(error = %e, "QR encoding failed");
      None
    }
  };

  let record = history.insert(NewRecord::generate(text)).await;
  Some(GenerateOutcome { image, record })
}

// ─── History view ────────────────────────────────────────────────────────────

/// The listing shown to the user, refreshed after every mutation.
pub struct HistoryView<A, B> {
  history: History<A, B>,
  records: Vec<HistoryRecord>,
}

impl<A, B> HistoryView<A, B>
where
  A: HistoryStore,
  B: BlockingHistoryStore + 'static,
{
  pub fn new(history: History<A, B>) -> Self { Self { history, records: Vec::new() } }

  /// Reload from the store. An unreadable store shows as empty.
  pub async fn load(&mut self) -> &[HistoryRecord] {
    self.records = self.history.list_or_empty().await;
    &self.records
  }

  pub fn records(&self) -> &[HistoryRecord] { &self.records }

  pub fn is_empty(&self) -> bool { self.records.is_empty() }

  /// Delete one record, then reload.
  pub async fn delete(&mut self, id: i64) -> Result<(), HistoryError> {
    let refreshed = self.history.delete_then_list(id).await;
    self.records = refreshed.records;
    refreshed.write
  }

  /// Delete every record, then reload.
  pub async fn clear(&mut self) -> Result<(), HistoryError> {
    let refreshed = self.history.clear_then_list().await;
    self.records = refreshed.records;
    refreshed.write
  }
}
