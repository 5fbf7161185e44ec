//! Runtime settings, built once at start-up and passed down by reference.
//!
//! Sources, lowest precedence first: built-in defaults, the optional TOML
//! file, then `BF_`-prefixed environment variables (`BF_DB_PATH`,
//! `BF_BATCH_SIZE`). The `--db` flag is applied on top by `main`.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, ConfigBuilder, Environment, File, builder::DefaultState};
use serde::Deserialize;

pub const DEFAULT_DB_PATH: &str = "bartenders_friend.db";
pub const DEFAULT_BATCH_SIZE: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
  /// SQLite database file; a leading `~/` is expanded.
  #[serde(default = "default_db_path")]
  pub db_path:    PathBuf,
  /// Staging rows accumulated before each write.
  #[serde(default = "default_batch_size")]
  pub batch_size: usize,
}

fn default_db_path() -> PathBuf { PathBuf::from(DEFAULT_DB_PATH) }

fn default_batch_size() -> usize { DEFAULT_BATCH_SIZE }

impl Settings {
  /// Load from `file` (if it exists) and the environment.
  pub fn load(file: &Path) -> anyhow::Result<Self> {
    Self::resolve(
      Config::builder()
        .add_source(File::from(file).required(false))
        .add_source(Environment::with_prefix("BF").try_parsing(true)),
    )
  }

  fn resolve(builder: ConfigBuilder<DefaultState>) -> anyhow::Result<Self> {
    let mut settings: Self = builder
      .build()
      .context("failed to read configuration")?
      .try_deserialize()
      .context("failed to deserialise Settings")?;

    settings.batch_size = settings.batch_size.max(1);
    settings.db_path = expand_tilde(&settings.db_path);
    Ok(settings)
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use config::FileFormat;

  use super::*;

  fn from_toml(toml: &str) -> Settings {
    Settings::resolve(Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
      .unwrap()
  }

  #[test]
  fn defaults_apply_when_nothing_is_set() {
    let settings = from_toml("");
    assert_eq!(settings.db_path, PathBuf::from(DEFAULT_DB_PATH));
    assert_eq!(settings.batch_size, DEFAULT_BATCH_SIZE);
  }

  #[test]
  fn file_values_override_defaults() {
    let settings = from_toml("db_path = \"/tmp/bar.db\"\nbatch_size = 64\n");
    assert_eq!(settings.db_path, PathBuf::from("/tmp/bar.db"));
    assert_eq!(settings.batch_size, 64);
  }

  #[test]
  fn zero_batch_size_is_clamped() {
    assert_eq!(from_toml("batch_size = 0").batch_size, 1);
  }

  #[test]
  fn missing_file_is_not_an_error() {
    let settings = Settings::resolve(
      Config::builder().add_source(File::from(Path::new("/nonexistent/barkeep.toml")).required(false)),
    )
    .unwrap();
    assert_eq!(settings.batch_size, DEFAULT_BATCH_SIZE);
  }
}
