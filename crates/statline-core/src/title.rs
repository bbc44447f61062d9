//! Display-title resolution for scraped tables.
//!
//! Titles live in heading elements next to each table on the source
//! page. Absence is expected (some tables ship without a heading), so
//! lookup is a typed `Option` query against a harvested index with an
//! explicit fallback rule, not a raised-and-caught error.

use std::collections::HashMap;

use crate::table::TableKey;

/// DOM id → heading text, harvested once per page.
#[derive(Debug, Clone, Default)]
pub struct TitleIndex {
  titles: HashMap<String, String>,
}

impl TitleIndex {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert(&mut self, id: impl Into<String>, title: impl Into<String>) {
    self.titles.insert(id.into(), title.into());
  }

  pub fn get(&self, id: &str) -> Option<&str> {
    self.titles.get(id).map(String::as_str)
  }
}

/// Resolve the display title for `key`.
///
/// Playoff variants borrow the non-playoff sibling's title, prefixed
/// `"Playoffs "`. When no heading exists the fallback embeds the
/// ordinal: `"Table <n>"`, or `"Playoffs Table <n>"` for playoff
/// variants. Never fails.
pub fn resolve_title(index: &TitleIndex, key: &TableKey) -> String {
  if key.is_playoff() {
    match index.get(key.sibling_id()) {
      Some(title) => format!("Playoffs {title}"),
      None => format!("Playoffs Table {}", key.ordinal),
    }
  } else {
    match index.get(&key.id) {
      Some(title) => title.to_string(),
      None => format!("Table {}", key.ordinal),
    }
  }
}
