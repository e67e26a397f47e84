//! Layered configuration: defaults, then the TOML file, then `QRCONNECT_*`
//! environment variables, then command-line overrides.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Default database file name.
pub const DEFAULT_STORE_PATH: &str = "qr_history.db";

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
  pub store_path: PathBuf,
}

impl AppConfig {
  /// Load from `file` (optional on disk) and the environment. `store`
  /// overrides every other source.
  pub fn load(file: &Path, store: Option<&Path>) -> Result<Self> {
    let settings = config::Config::builder()
      .set_default("store_path", DEFAULT_STORE_PATH)?
      .add_source(config::File::from(file.to_path_buf()).required(false))
      .add_source(config::Environment::with_prefix("QRCONNECT"))
      .set_override_option(
        "store_path",
        store.map(|p| p.to_string_lossy().into_owned()),
      )?
      .build()
      .context("failed to read config file")?;

    let mut cfg: Self = settings
      .try_deserialize()
      .context("failed to deserialise AppConfig")?;
    cfg.store_path = expand_tilde(&cfg.store_path);
    Ok(cfg)
  }
}

/// Expand a leading `~` to the user's home directory.
pub(crate) fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
