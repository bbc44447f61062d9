//! `scrape` binary.
//!
//! Fetches each configured subject's stats page, writes the captured
//! tables into one SQLite file per subject under `--out-dir`, then
//! reconciles table presence across the stores.

use std::path::PathBuf;

use anyhow::{Context as _, bail};
use clap::{Parser, ValueEnum};
use statline_core::{subject::Subject, table::NameScheme};
use statline_scrape::{PageFetcher, PipelineConfig, reconcile, run};
use statline_store_sqlite::SqliteStore;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SchemeArg {
  /// `table_<ordinal>_<id>`
  OrdinalPrefixed,
  /// `table_<id>`
  Bare,
}

impl From<SchemeArg> for NameScheme {
  fn from(arg: SchemeArg) -> Self {
    match arg {
      SchemeArg::OrdinalPrefixed => NameScheme::OrdinalPrefixed,
      SchemeArg::Bare => NameScheme::Bare,
    }
  }
}

#[derive(Parser)]
#[command(author, version, about = "statline scraper")]
struct Cli {
  /// Directory for the per-subject SQLite files.
  #[arg(short, long, default_value = "data")]
  out_dir: PathBuf,

  /// First captured table ordinal (inclusive).
  #[arg(long, default_value_t = 21)]
  first: usize,

  /// Last captured table ordinal (inclusive).
  #[arg(long, default_value_t = 39)]
  last: usize,

  /// Stored-name scheme, applied by extractor and reconciler alike.
  #[arg(long, value_enum, default_value_t = SchemeArg::OrdinalPrefixed)]
  scheme: SchemeArg,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  if cli.first > cli.last {
    bail!("--first ({}) must not exceed --last ({})", cli.first, cli.last);
  }

  let config = PipelineConfig {
    range:  cli.first..=cli.last,
    scheme: cli.scheme.into(),
  };

  std::fs::create_dir_all(&cli.out_dir)
    .with_context(|| format!("creating {}", cli.out_dir.display()))?;

  // One store per roster subject.
  let mut subjects = Vec::new();
  for subject in Subject::default_roster() {
    let path = cli.out_dir.join(subject.store_file());
    let store = SqliteStore::open(&path)
      .await
      .with_context(|| format!("opening store at {}", path.display()))?;
    subjects.push((subject, store));
  }

  let fetcher = PageFetcher::new().context("building HTTP client")?;
  let report = run(&fetcher, subjects, &config).await?;

  let copies = reconcile(&report.stores, &report.keys, config.scheme)
    .await
    .context("reconciling stores")?;
  info!(
    "run complete: {} subjects, {} keys, {} reconciliation copies",
    report.stores.len(),
    report.keys.len(),
    copies
  );

  if !report.failures.is_empty() {
    let names: Vec<&str> = report
      .failures
      .iter()
      .map(|(s, _)| s.name.as_str())
      .collect();
    bail!("extraction failed for: {}", names.join(", "));
  }

  Ok(())
}
