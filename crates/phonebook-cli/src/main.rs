//! `phonebook`: interactive phone book over a store file.
//!
//! # Usage
//!
//! ```
//! phonebook phonebook.db
//! phonebook --config ~/.config/phonebook/config.toml --log-level debug
//! ```
//!
//! Without a store path the session is in-memory only.

mod app;

use std::{io, path::PathBuf};

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use phonebook_store::PhoneBook;
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "phonebook", version, about = "Interactive phone book")]
struct Args {
  /// Store file to open, created if missing.
  #[arg(value_name = "FILE", env = "PHONEBOOK_FILE")]
  file: Option<PathBuf>,

  /// Path to a TOML config file (store_path, log_level).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Default log level when RUST_LOG is unset (default: warn).
  #[arg(long, value_name = "LEVEL")]
  log_level: Option<String>,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  store_path: Option<PathBuf>,
  #[serde(default)]
  log_level:  String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

fn main() -> Result<()> {
  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let log_level: LevelFilter = args
    .log_level
    .or_else(|| (!file_cfg.log_level.is_empty()).then(|| file_cfg.log_level.clone()))
    .map(|level| level.parse())
    .transpose()
    .context("parsing log level")?
    .unwrap_or(LevelFilter::WARN);
  let store_path = args.file.or(file_cfg.store_path);

  // Logs go to stderr so they never interleave with prompts.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy(),
    )
    .with_writer(io::stderr)
    .init();

  let mut book = PhoneBook::new();
  if let Some(path) = &store_path {
    println!("open {}", path.display());
    if let Err(e) = book.load(path) {
      println!("{e}");
    }
  }

  App::new(book, io::stdin().lock(), io::stdout().lock())
    .run()
    .context("terminal i/o")
}
