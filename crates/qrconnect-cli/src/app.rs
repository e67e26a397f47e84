//! Subcommands and their dispatch onto the history flows.

use std::io::{self, Read, Write};

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use qrconnect_core::{
  HistoryRecord,
  flow::{self, EMPTY_HISTORY_MESSAGE, HistoryView, QrEncoder, ScanFlow, ScanOutcome},
  timestamp,
};
use qrconnect_store_sqlite::SharedHistory;

// ─── Commands ─────────────────────────────────────────────────────────────────

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Record text decoded by an external scanner (read from stdin if omitted).
  Scan { text: Option<String> },

  /// Record a generate action for TEXT.
  Generate { text: String },

  /// List history, most recent first.
  History {
    /// Print records as JSON.
    #[arg(long)]
    json: bool,
  },

  /// Delete one record by id.
  Delete { id: i64 },

  /// Delete every record.
  Clear,
}

// ─── Encoder ──────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
#[error("no QR codec is linked into this build")]
pub struct CodecUnavailable;

/// Stand-in for the external image encoder. Always fails, so `generate`
/// records the text without producing an image.
pub struct NoCodec;

impl QrEncoder for NoCodec {
  type Error = CodecUnavailable;
  type Image = ();

  fn encode(&self, _text: &str, _width: u32, _height: u32) -> Result<(), CodecUnavailable> {
    Err(CodecUnavailable)
  }
}

// ─── App ──────────────────────────────────────────────────────────────────────

pub struct App {
  history: SharedHistory,
}

impl App {
  pub fn new(history: SharedHistory) -> Self { Self { history } }

  pub async fn run(&self, command: Command, out: &mut impl Write) -> Result<()> {
    match command {
      Command::Scan { text } => {
        let text = match text {
          Some(text) => text,
          None => read_decoded(io::stdin().lock())?,
        };
        self.scan(&text, out).await
      }
      Command::Generate { text } => self.generate(&text, out).await,
      Command::History { json } => self.list(json, out).await,
      Command::Delete { id } => self.delete(id, out).await,
      Command::Clear => self.clear(out).await,
    }
  }

  async fn scan(&self, text: &str, out: &mut impl Write) -> Result<()> {
    let mut scan = ScanFlow::new(self.history.get().await?.clone());
    match scan.on_decoded(text).await {
      ScanOutcome::Recorded(record) => {
        let record = record?;
        writeln!(out, "recorded scan #{}: {}", record.id, record.content)?;
      }
      ScanOutcome::AlreadyScanned => {}
      ScanOutcome::Empty => bail!("nothing to record: decoded text is empty"),
    }
    Ok(())
  }

  async fn generate(&self, text: &str, out: &mut impl Write) -> Result<()> {
    let history = self.history.get().await?;
    let Some(outcome) = flow::generate(history, &NoCodec, text).await else {
      bail!("nothing to generate: text is blank");
    };

    let record = outcome.record?;
    writeln!(out, "recorded generate #{}: {}", record.id, record.content)?;
    if outcome.image.is_none() {
      writeln!(out, "no image: {CodecUnavailable}")?;
    }
    Ok(())
  }

  async fn list(&self, json: bool, out: &mut impl Write) -> Result<()> {
    let mut view = HistoryView::new(self.history.get().await?.clone());
    let records = view.load().await;

    if json {
      serde_json::to_writer_pretty(&mut *out, records)?;
      writeln!(out)?;
    } else if records.is_empty() {
      writeln!(out, "{EMPTY_HISTORY_MESSAGE}")?;
    } else {
      for record in records {
        writeln!(out, "{}", format_line(record))?;
      }
    }
    Ok(())
  }

  async fn delete(&self, id: i64, out: &mut impl Write) -> Result<()> {
    let mut view = HistoryView::new(self.history.get().await?.clone());
    view.delete(id).await?;
    writeln!(out, "deleted #{id}; {} remaining", view.records().len())?;
    Ok(())
  }

  async fn clear(&self, out: &mut impl Write) -> Result<()> {
    let mut view = HistoryView::new(self.history.get().await?.clone());
    view.clear().await?;
    writeln!(out, "history cleared")?;
    Ok(())
  }
}

/// One listing line: id, kind, local time, content.
pub fn format_line(record: &HistoryRecord) -> String {
  format!(
    "#{:<5} {:<8} {}  {}",
    record.id,
    record.kind.as_str(),
    timestamp::format_display(&record.created_at),
    record.content
  )
}

/// Decoded text as piped in by a scanner, minus the trailing newline.
pub(crate) fn read_decoded(mut input: impl Read) -> Result<String> {
  let mut text = String::new();
  input.read_to_string(&mut text).context("reading decoded text")?;

  let text = text.trim_end_matches(['\n', '\r']);
  if text.is_empty() {
    bail!("no decoded text on stdin");
  }
  Ok(text.to_owned())
}
