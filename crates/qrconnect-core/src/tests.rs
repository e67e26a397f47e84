//! Tests for the fallback policy and flows against in-process fake stores.

use std::sync::{
  Arc, Mutex,
  atomic::{AtomicBool, Ordering},
};

use chrono::Utc;

use crate::{
  History, HistoryError, HistoryRecord, NewRecord, RecordKind,
  flow::{self, EMPTY_HISTORY_MESSAGE, HistoryView, QrEncoder, ScanFlow, ScanOutcome},
  store::{BlockingHistoryStore, HistoryStore},
  timestamp,
};

// ─── Fakes ───────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
#[error("injected failure")]
struct Injected;

#[derive(Default)]
struct Table {
  next_id: i64,
  rows:    Vec<HistoryRecord>,
}

/// Shared table plus a failure switch; the async and blocking fakes below
/// both operate on it, like two connections to one database.
#[derive(Clone, Default)]
struct Mem {
  table: Arc<Mutex<Table>>,
  fail:  Arc<AtomicBool>,
}

impl Mem {
  fn check(&self) -> Result<(), Injected> {
    if self.fail.load(Ordering::SeqCst) { Err(Injected) } else { Ok(()) }
  }

  fn insert(&self, record: NewRecord) -> Result<HistoryRecord, Injected> {
    self.check()?;
    let mut t = self.table.lock().unwrap();
    t.next_id += 1;
    let record = record.into_record(t.next_id);
    t.rows.push(record.clone());
    Ok(record)
  }

  fn list_all(&self) -> Result<Vec<HistoryRecord>, Injected> {
    self.check()?;
    let mut rows = self.table.lock().unwrap().rows.clone();
    rows.sort_by(|a, b| b.id.cmp(&a.id));
    Ok(rows)
  }

  fn delete_one(&self, id: i64) -> Result<(), Injected> {
    self.check()?;
    self.table.lock().unwrap().rows.retain(|r| r.id != id);
    Ok(())
  }

  fn clear_all(&self) -> Result<(), Injected> {
    self.check()?;
    self.table.lock().unwrap().rows.clear();
    Ok(())
  }
}

#[derive(Clone)]
struct AsyncMem(Mem);

impl HistoryStore for AsyncMem {
  type Error = Injected;

  async fn insert(&self, record: NewRecord) -> Result<HistoryRecord, Injected> {
    self.0.insert(record)
  }

  async fn list_all(&self) -> Result<Vec<HistoryRecord>, Injected> { self.0.list_all() }

  async fn delete_one(&self, id: i64) -> Result<(), Injected> { self.0.delete_one(id) }

  async fn clear_all(&self) -> Result<(), Injected> { self.0.clear_all() }
}

struct BlockingMem(Mem);

impl BlockingHistoryStore for BlockingMem {
  type Error = Injected;

  fn insert(&self, record: NewRecord) -> Result<HistoryRecord, Injected> {
    self.0.insert(record)
  }

  fn list_all(&self) -> Result<Vec<HistoryRecord>, Injected> { self.0.list_all() }

  fn delete_one(&self, id: i64) -> Result<(), Injected> { self.0.delete_one(id) }

  fn clear_all(&self) -> Result<(), Injected> { self.0.clear_all() }
}

/// A history whose async and blocking sides share one table. The returned
/// switches make either side fail.
fn history() -> (History<AsyncMem, BlockingMem>, Arc<AtomicBool>, Arc<AtomicBool>) {
  let table = Arc::new(Mutex::new(Table::default()));
  let primary = Mem { table: Arc::clone(&table), fail: Arc::default() };
  let fallback = Mem { table, fail: Arc::default() };
  let switches = (Arc::clone(&primary.fail), Arc::clone(&fallback.fail));
  (History::new(AsyncMem(primary), BlockingMem(fallback)), switches.0, switches.1)
}

fn scan_at(content: &str, at: &str) -> NewRecord {
  NewRecord::at(RecordKind::Scan, content, at)
}

// ─── Records ─────────────────────────────────────────────────────────────────

#[test]
fn record_kind_text_roundtrip() {
  assert_eq!("Scan".parse::<RecordKind>().unwrap(), RecordKind::Scan);
  assert_eq!("Generate".parse::<RecordKind>().unwrap(), RecordKind::Generate);
  assert_eq!(RecordKind::Generate.to_string(), "Generate");
}

#[test]
fn record_kind_rejects_unknown_text() {
  let err = "scan".parse::<RecordKind>().unwrap_err();
  assert!(matches!(err, crate::Error::UnknownKind(ref s) if s == "scan"));
}

#[test]
fn record_serializes_kind_as_stored_text() {
  let record = scan_at("hello", "1700000000000").into_record(7);
  let json = serde_json::to_value(&record).unwrap();
  assert_eq!(json["kind"], "Scan");
  assert_eq!(json["id"], 7);
  assert_eq!(json["created_at"], "1700000000000");
}

#[test]
fn new_record_is_stamped_by_caller() {
  let before = Utc::now().timestamp_millis();
  let record = NewRecord::generate("text");
  let after = Utc::now().timestamp_millis();

  let stamped: i64 = record.created_at.parse().unwrap();
  assert!((before..=after).contains(&stamped));
  assert_eq!(record.kind, RecordKind::Generate);
}

// ─── Timestamps ──────────────────────────────────────────────────────────────

#[test]
fn format_display_renders_epoch_millis() {
  assert_eq!(timestamp::format_display_in("0", &Utc), "Jan 01, 1970 00:00");
  assert_eq!(
    timestamp::format_display_in("1700000000000", &Utc),
    "Nov 14, 2023 22:13"
  );
}

#[test]
fn format_display_returns_unparseable_values_verbatim() {
  assert_eq!(timestamp::format_display_in("yesterday", &Utc), "yesterday");
  assert_eq!(timestamp::format_display(""), "");
}

// ─── Fallback policy ─────────────────────────────────────────────────────────

#[tokio::test]
async fn healthy_primary_serves_all_operations() {
  let (h, _, fallback_fail) = history();
  // A broken fallback must not matter while the primary works.
  fallback_fail.store(true, Ordering::SeqCst);

  let a = h.insert(scan_at("a", "1")).await.unwrap();
  let b = h.insert(scan_at("b", "2")).await.unwrap();
  assert!(b.id > a.id);

  let listed = h.list_all().await.unwrap();
  assert_eq!(listed, vec![b.clone(), a.clone()]);

  h.delete_one(a.id).await.unwrap();
  assert_eq!(h.list_all().await.unwrap(), vec![b]);

  h.clear_all().await.unwrap();
  assert!(h.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn failed_primary_retries_on_blocking_store() {
  let (h, primary_fail, _) = history();
  primary_fail.store(true, Ordering::SeqCst);

  let inserted = h.insert(scan_at("via fallback", "5")).await.unwrap();
  assert_eq!(inserted.content, "via fallback");

  let listed = h.list_all().await.unwrap();
  assert_eq!(listed, vec![inserted.clone()]);

  h.delete_one(inserted.id).await.unwrap();
  h.clear_all().await.unwrap();
  assert!(h.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn both_failing_reports_unavailable() {
  let (h, primary_fail, fallback_fail) = history();
  primary_fail.store(true, Ordering::SeqCst);
  fallback_fail.store(true, Ordering::SeqCst);

  let err = h.insert(scan_at("lost", "1")).await.unwrap_err();
  assert_eq!(err.op(), "insert");
  assert!(matches!(err, HistoryError::Unavailable { .. }));
  assert!(err.to_string().contains("injected failure"));

  assert_eq!(h.delete_one(1).await.unwrap_err().op(), "delete_one");
  assert_eq!(h.clear_all().await.unwrap_err().op(), "clear_all");
  assert_eq!(h.list_all().await.unwrap_err().op(), "list_all");
}

#[tokio::test]
async fn degrading_helpers_never_fail() {
  let (h, primary_fail, fallback_fail) = history();
  h.insert(scan_at("kept", "1")).await.unwrap();

  primary_fail.store(true, Ordering::SeqCst);
  fallback_fail.store(true, Ordering::SeqCst);

  assert!(h.list_or_empty().await.is_empty());
  assert!(h.insert_or_log(scan_at("dropped", "2")).await.is_none());

  primary_fail.store(false, Ordering::SeqCst);
  let listed = h.list_or_empty().await;
  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0].content, "kept");
}

#[tokio::test]
async fn chained_refresh_observes_its_own_write() {
  let (h, _, _) = history();

  let first = h.insert_then_list(scan_at("a", "1")).await;
  let a = first.write.unwrap();
  assert_eq!(first.records, vec![a.clone()]);

  let second = h.insert_then_list(scan_at("b", "2")).await;
  let b = second.write.unwrap();
  assert_eq!(second.records, vec![b.clone(), a.clone()]);

  let deleted = h.delete_then_list(a.id).await;
  assert!(deleted.write.is_ok());
  assert_eq!(deleted.records, vec![b]);

  let cleared = h.clear_then_list().await;
  assert!(cleared.write.is_ok());
  assert!(cleared.records.is_empty());
}

#[tokio::test]
async fn chained_refresh_runs_even_when_write_fails() {
  let (h, primary_fail, fallback_fail) = history();
  h.insert(scan_at("a", "1")).await.unwrap();

  // Writes fail on both sides; the refresh still happens (and also fails,
  // degrading to empty).
  primary_fail.store(true, Ordering::SeqCst);
  fallback_fail.store(true, Ordering::SeqCst);
  let refreshed = h.delete_then_list(1).await;
  assert!(refreshed.write.is_err());
  assert!(refreshed.records.is_empty());
}

#[tokio::test]
async fn spawned_insert_completes_in_background() {
  let (h, _, _) = history();

  let handle = h.spawn_insert(scan_at("bg", "1"));
  let inserted = handle.await.unwrap().unwrap();

  assert_eq!(h.list_all().await.unwrap(), vec![inserted]);
}

// ─── Scan flow ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn scan_flow_records_only_first_result() {
  let (h, _, _) = history();
  let mut scan = ScanFlow::new(h.clone());

  let outcome = scan.on_decoded("https://example.com").await;
  let ScanOutcome::Recorded(Ok(record)) = outcome else {
    panic!("expected a recorded scan, got {outcome:?}");
  };
  assert_eq!(record.kind, RecordKind::Scan);
  assert_eq!(record.content, "https://example.com");

  assert!(matches!(
    scan.on_decoded("https://other.example").await,
    ScanOutcome::AlreadyScanned
  ));
  assert_eq!(scan.result(), Some("https://example.com"));
  assert_eq!(h.list_all().await.unwrap().len(), 1);

  scan.reset();
  assert!(scan.result().is_none());
  assert!(matches!(
    scan.on_decoded("https://other.example").await,
    ScanOutcome::Recorded(Ok(_))
  ));
  assert_eq!(h.list_all().await.unwrap().len(), 2);
}

#[tokio::test]
async fn scan_flow_ignores_blank_text() {
  let (h, _, _) = history();
  let mut scan = ScanFlow::new(h.clone());

  assert!(matches!(scan.on_decoded("").await, ScanOutcome::Empty));
  assert!(matches!(scan.on_decoded(" \t\n").await, ScanOutcome::Empty));
  assert!(scan.result().is_none());
  assert!(h.list_all().await.unwrap().is_empty());

  // The session is still open for a real result.
  assert!(matches!(
    scan.on_decoded("WIFI:S:home;;").await,
    ScanOutcome::Recorded(Ok(_))
  ));
  assert_eq!(scan.result(), Some("WIFI:S:home;;"));
}

// ─── Generate flow ───────────────────────────────────────────────────────────

struct FixedEncoder;

impl QrEncoder for FixedEncoder {
  type Error = Injected;
  type Image = (u32, u32);

  fn encode(&self, _text: &str, width: u32, height: u32) -> Result<(u32, u32), Injected> {
    Ok((width, height))
  }
}

struct BrokenEncoder;

impl QrEncoder for BrokenEncoder {
  type Error = Injected;
  type Image = ();

  fn encode(&self, _text: &str, _w: u32, _h: u32) -> Result<(), Injected> { Err(Injected) }
}

#[tokio::test]
async fn generate_records_and_returns_image() {
  let (h, _, _) = history();

  let outcome = flow::generate(&h, &FixedEncoder, "hello").await.unwrap();
  assert_eq!(outcome.image, Some((flow::QR_SIZE, flow::QR_SIZE)));
  assert!(outcome.succeeded());

  let record = outcome.record.unwrap();
  assert_eq!(record.kind, RecordKind::Generate);
  assert_eq!(record.content, "hello");
}

#[tokio::test]
async fn generate_records_even_when_encoding_fails() {
  let (h, _, _) = history();

  let outcome = flow::generate(&h, &BrokenEncoder, "unencodable").await.unwrap();
  assert!(outcome.image.is_none());
  assert!(!outcome.succeeded());
  assert!(outcome.record.is_ok());

  let listed = h.list_all().await.unwrap();
  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0].content, "unencodable");
}

#[tokio::test]
async fn generate_ignores_blank_text() {
  let (h, _, _) = history();

  assert!(flow::generate(&h, &FixedEncoder, "").await.is_none());
  assert!(flow::generate(&h, &FixedEncoder, "  \n\t").await.is_none());
  assert!(h.list_all().await.unwrap().is_empty());
}

// ─── History view ────────────────────────────────────────────────────────────

#[tokio::test]
async fn history_view_lists_and_mutates() {
  let (h, _, _) = history();
  let mut view = HistoryView::new(h.clone());

  assert!(view.load().await.is_empty());
  assert!(view.is_empty());
  assert_eq!(EMPTY_HISTORY_MESSAGE, "No history items found");

  let a = h.insert(scan_at("a", "1")).await.unwrap();
  let b = h.insert(NewRecord::at(RecordKind::Generate, "b", "2")).await.unwrap();
  let c = h.insert(scan_at("c", "3")).await.unwrap();

  assert_eq!(view.load().await, &[c.clone(), b.clone(), a.clone()]);

  view.delete(b.id).await.unwrap();
  assert_eq!(view.records(), &[c, a]);

  view.clear().await.unwrap();
  assert!(view.is_empty());
}
