//! Explicit data-access context for the dashboard.
//!
//! Holds every subject's store plus a read cache whose scope is the
//! context's lifetime, not the process's. Store contents are assumed
//! immutable while a context is alive (the scrape run happens before
//! the server starts), so no invalidation is needed.

use std::{
  collections::{BTreeMap, HashMap},
  sync::Arc,
};

use serde::Serialize;
use statline_core::{
  store::TableStore,
  subject::Subject,
  table::{TableData, TableMeta},
};
use tokio::sync::RwLock;
use tracing::debug;

/// One logical table as the picker sees it: stored name, display title,
/// and the subjects that have a version of it.
#[derive(Debug, Clone, Serialize)]
pub struct TableListing {
  pub name:     String,
  pub title:    String,
  pub subjects: Vec<String>,
}

type CacheKey = (String, String); // (subject slug, table name)
type CachedTable = Arc<(TableMeta, TableData)>;

/// Shared state threaded through all axum handlers.
pub struct DashContext<S: TableStore> {
  entries: Vec<(Subject, S)>,
  cache:   RwLock<HashMap<CacheKey, CachedTable>>,
}

impl<S: TableStore> DashContext<S> {
  pub fn new(entries: Vec<(Subject, S)>) -> Self {
    Self { entries, cache: RwLock::new(HashMap::new()) }
  }

  pub fn subjects(&self) -> Vec<Subject> {
    self.entries.iter().map(|(s, _)| s.clone()).collect()
  }

  /// Union of every store's catalog, keyed by stored name.
  pub async fn list_tables(&self) -> Result<Vec<TableListing>, S::Error> {
    let mut by_name: BTreeMap<String, TableListing> = BTreeMap::new();
    for (subject, store) in &self.entries {
      for meta in store.list_tables().await? {
        by_name
          .entry(meta.name.clone())
          .or_insert_with(|| TableListing {
            name:     meta.name,
            title:    meta.title,
            subjects: Vec::new(),
          })
          .subjects
          .push(subject.slug.clone());
      }
    }
    Ok(by_name.into_values().collect())
  }

  /// Every subject's version of `name`. Subjects whose store lacks the
  /// table are simply absent from the result.
  pub async fn table_versions(
    &self,
    name: &str,
  ) -> Result<Vec<(Subject, CachedTable)>, S::Error> {
    let mut out = Vec::new();
    for (subject, store) in &self.entries {
      let key = (subject.slug.clone(), name.to_string());

      if let Some(hit) = self.cache.read().await.get(&key) {
        out.push((subject.clone(), hit.clone()));
        continue;
      }

      if let Some(fetched) = store.get_table(name).await? {
        debug!("caching {name} for {}", subject.slug);
        let cached = Arc::new(fetched);
        self.cache.write().await.insert(key, cached.clone());
        out.push((subject.clone(), cached));
      }
    }
    Ok(out)
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use statline_store_sqlite::SqliteStore;

  use super::*;

  fn meta(name: &str) -> TableMeta {
    TableMeta {
      name:       name.to_string(),
      title:      "Totals".to_string(),
      ordinal:    25,
      dom_id:     "totals".to_string(),
      scraped_at: Utc::now(),
    }
  }

  fn data() -> TableData {
    TableData {
      columns: vec!["Season".into(), "PTS".into()],
      rows:    vec![vec!["1991-92".into(), "2404".into()]],
    }
  }

  async fn ctx() -> DashContext<SqliteStore> {
    let a = SqliteStore::open_in_memory().await.unwrap();
    let b = SqliteStore::open_in_memory().await.unwrap();
    a.put_table(meta("table_25_totals"), data()).await.unwrap();
    b.put_table(meta("table_25_totals"), data()).await.unwrap();
    b.put_table(meta("table_26_advanced"), data()).await.unwrap();

    DashContext::new(vec![
      (Subject::new("Michael Jordan", "https://example.com/mj"), a),
      (Subject::new("LeBron James", "https://example.com/lj"), b),
    ])
  }

  #[tokio::test]
  async fn list_tables_unions_catalogs() {
    let ctx = ctx().await;
    let tables = ctx.list_tables().await.unwrap();

    assert_eq!(tables.len(), 2);
    assert_eq!(tables[0].name, "table_25_totals");
    assert_eq!(tables[0].subjects, vec!["michael_jordan", "lebron_james"]);
    assert_eq!(tables[1].name, "table_26_advanced");
    assert_eq!(tables[1].subjects, vec!["lebron_james"]);
  }

  #[tokio::test]
  async fn table_versions_skips_subjects_without_the_table() {
    let ctx = ctx().await;

    let versions = ctx.table_versions("table_26_advanced").await.unwrap();
    assert_eq!(versions.len(), 1);
    assert_eq!(versions[0].0.slug, "lebron_james");

    let missing = ctx.table_versions("table_99_nope").await.unwrap();
    assert!(missing.is_empty());
  }

  #[tokio::test]
  async fn second_read_is_served_from_cache() {
    let ctx = ctx().await;

    let first = ctx.table_versions("table_25_totals").await.unwrap();
    let second = ctx.table_versions("table_25_totals").await.unwrap();

    // Same allocation both times — the cache handed back its Arc.
    assert!(Arc::ptr_eq(&first[0].1, &second[0].1));
  }
}
