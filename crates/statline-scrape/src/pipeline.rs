//! Per-subject extraction pipeline.
//!
//! Each subject is fetched and ingested independently (one tokio task
//! per subject; no ordering dependency exists between them). A failed
//! subject is isolated: its error lands in the [`RunReport`] and the
//! other subjects' output still feeds reconciliation.

use std::{collections::BTreeSet, ops::RangeInclusive};

use chrono::Utc;
use statline_core::{
  store::TableStore,
  subject::Subject,
  table::{NameScheme, TableKey, TableMeta},
};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::{
  Error, Result,
  extract::extract_tables,
  fetch::PageFetcher,
};

// ─── Configuration ───────────────────────────────────────────────────────────

/// Knobs for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
  /// Ordinal positions captured, boundaries inclusive. Tied to the
  /// source page layout rather than derived from it.
  pub range:  RangeInclusive<usize>,
  /// Stored-name scheme, shared with the reconciler.
  pub scheme: NameScheme,
}

impl Default for PipelineConfig {
  fn default() -> Self {
    Self { range: 21..=39, scheme: NameScheme::default() }
  }
}

// ─── Run report ──────────────────────────────────────────────────────────────

/// Outcome of a full extraction run.
pub struct RunReport<S> {
  /// Stores of the subjects that completed, in input order.
  pub stores:   Vec<(Subject, S)>,
  /// Every table key observed on any completed subject's page,
  /// including id-less ones.
  pub keys:     BTreeSet<TableKey>,
  /// Subjects whose page could not be fetched or parsed.
  pub failures: Vec<(Subject, Error)>,
}

// ─── Ingestion ───────────────────────────────────────────────────────────────

/// Extract every in-range table from `html` and persist the nameable
/// ones into `store`. Returns the keys of all captured tables.
///
/// A table with an empty id is recorded but skipped for persistence; a
/// per-table store failure is logged and skipped. Only page-level
/// extraction failure is fatal.
pub async fn ingest_page<S>(
  html: &str,
  store: &S,
  config: &PipelineConfig,
) -> Result<Vec<TableKey>>
where
  S: TableStore,
{
  let tables = extract_tables(html, config.range.clone())?;
  let mut keys = Vec::with_capacity(tables.len());

  for table in tables {
    keys.push(table.key.clone());

    let Some(name) = config.scheme.table_name(&table.key) else {
      debug!(
        "skipping table at ordinal {}: no DOM id",
        table.key.ordinal
      );
      continue;
    };

    let meta = TableMeta {
      name:       name.clone(),
      title:      table.title,
      ordinal:    table.key.ordinal,
      dom_id:     table.key.id.clone(),
      scraped_at: Utc::now(),
    };

    match store.put_table(meta, table.data).await {
      Ok(()) => info!("stored {name}"),
      Err(e) => warn!("failed to store {name}: {e}"),
    }
  }

  Ok(keys)
}

/// Fetch one subject's page and ingest it into `store`.
pub async fn extract_subject<S>(
  fetcher: &PageFetcher,
  subject: &Subject,
  store: &S,
  config: &PipelineConfig,
) -> Result<Vec<TableKey>>
where
  S: TableStore,
{
  info!("processing {}", subject.name);
  let html = fetcher.fetch(&subject.url).await?;
  let keys = ingest_page(&html, store, config).await?;
  info!("{}: captured {} tables", subject.name, keys.len());
  Ok(keys)
}

// ─── Orchestration ───────────────────────────────────────────────────────────

/// Run extraction for every subject concurrently and fold the observed
/// keys into one accumulator for the reconciler.
pub async fn run<S>(
  fetcher: &PageFetcher,
  subjects: Vec<(Subject, S)>,
  config: &PipelineConfig,
) -> Result<RunReport<S>>
where
  S: TableStore + 'static,
{
  let mut tasks = JoinSet::new();
  for (index, (subject, store)) in subjects.into_iter().enumerate() {
    let fetcher = fetcher.clone();
    let config = config.clone();
    tasks.spawn(async move {
      let result = extract_subject(&fetcher, &subject, &store, &config).await;
      (index, subject, store, result)
    });
  }

  let mut completed = Vec::new();
  let mut keys = BTreeSet::new();
  let mut failures = Vec::new();

  while let Some(joined) = tasks.join_next().await {
    let (index, subject, store, result) = joined?;
    match result {
      Ok(observed) => {
        keys.extend(observed);
        completed.push((index, subject, store));
      }
      Err(e) => {
        warn!("subject {} failed: {e}", subject.name);
        failures.push((subject, e));
      }
    }
  }

  completed.sort_by_key(|(index, _, _)| *index);
  let stores = completed
    .into_iter()
    .map(|(_, subject, store)| (subject, store))
    .collect();

  Ok(RunReport { stores, keys, failures })
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use statline_core::store::TableStore;
  use statline_store_sqlite::SqliteStore;

  use super::*;

  /// 39 tables; table 25 has id `totals` and no heading element.
  fn fixture_page() -> String {
    let mut page = String::from("<html><body>");
    for i in 1..=39 {
      if i == 25 {
        page.push_str(
          r#"<table id="totals"><thead><tr><th>Season</th><th>PTS</th></tr></thead>
             <tbody><tr><td>1991-92</td><td>2404</td></tr></tbody></table>"#,
        );
      } else {
        page.push_str(&format!(
          r#"<table id="t{i}"><thead><tr><th>A</th></tr></thead>
             <tbody><tr><td>{i}</td></tr></tbody></table>"#
        ));
      }
    }
    page.push_str("</body></html>");
    page
  }

  #[tokio::test]
  async fn ingest_stores_ordinal_prefixed_tables_with_fallback_titles() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let config = PipelineConfig::default();

    let keys = ingest_page(&fixture_page(), &store, &config).await.unwrap();
    assert_eq!(keys.len(), 19);

    let (meta, data) = store
      .get_table("table_25_totals")
      .await
      .unwrap()
      .expect("table 25 stored");
    assert_eq!(meta.title, "Table 25");
    assert_eq!(meta.dom_id, "totals");
    assert_eq!(data.rows, vec![vec!["1991-92", "2404"]]);
  }

  #[tokio::test]
  async fn every_nameable_key_has_a_stored_table() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let config = PipelineConfig::default();

    let keys = ingest_page(&fixture_page(), &store, &config).await.unwrap();
    assert!(!keys.is_empty());

    // The accumulator never outruns the stores: every key the scheme
    // can name is present in the store that ingested it.
    for key in &keys {
      let Some(name) = config.scheme.table_name(key) else { continue };
      assert!(
        store.table_exists(&name).await.unwrap(),
        "{name} observed but not stored"
      );
    }
  }

  #[tokio::test]
  async fn idless_table_is_recorded_but_not_stored() {
    let mut page = String::from("<html><body>");
    for i in 1..=39 {
      if i == 23 {
        page.push_str(
          r#"<table><thead><tr><th>A</th></tr></thead>
             <tbody><tr><td>1</td></tr></tbody></table>"#,
        );
      } else {
        page.push_str(&format!(r#"<table id="t{i}"><tr><td>{i}</td></tr></table>"#));
      }
    }
    page.push_str("</body></html>");

    let store = SqliteStore::open_in_memory().await.unwrap();
    let config = PipelineConfig::default();
    let keys = ingest_page(&page, &store, &config).await.unwrap();

    // Present in the accumulator...
    assert!(keys.iter().any(|k| k.ordinal == 23 && k.id.is_empty()));
    // ...but nothing was persisted for it.
    let stored = store.list_tables().await.unwrap();
    assert!(stored.iter().all(|m| m.ordinal != 23));
  }
}
