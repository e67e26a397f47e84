//! `qrconnect`: record and browse QR scan/generate history.
//!
//! Decoding and encoding happen in external tools; this binary keeps the
//! history of what they produced.
//!
//! # Usage
//!
//! ```
//! zbarimg --raw -q code.png | qrconnect scan
//! qrconnect generate "https://example.com"
//! qrconnect history
//! qrconnect delete 3
//! qrconnect clear
//! ```

mod app;
mod settings;

use std::{io, path::PathBuf};

use anyhow::{Context, Result};
use app::{App, Command};
use clap::Parser;
use qrconnect_store_sqlite::{SharedHistory, StoreLocation};
use settings::AppConfig;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "qrconnect", version, about = "QR scan and generate history")]
struct Args {
  /// Path to a TOML config file.
  #[arg(short, long, value_name = "FILE", default_value = "qrconnect.toml")]
  config: PathBuf,

  /// History database file; overrides the config file and environment.
  #[arg(long, value_name = "FILE")]
  store: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  // Logs go to stderr so command output stays pipeable.
  tracing_subscriber::fmt()
    .with_writer(io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  let cfg = AppConfig::load(&args.config, args.store.as_deref())?;
  tracing::debug!(store_path = %cfg.store_path.display(), "configuration loaded");

  let history = SharedHistory::new(StoreLocation::file(&cfg.store_path));
  let app = App::new(history);

  let mut stdout = io::stdout().lock();
  app
    .run(args.command, &mut stdout)
    .await
    .with_context(|| format!("history store at {}", cfg.store_path.display()))
}
