//! Table identity, naming, and the untyped tabular payload.
//!
//! A scraped table is identified by its 1-based ordinal position on the
//! page plus the DOM id attribute. The DOM id is the reconciliation key
//! across subjects; the ordinal only participates in naming.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// DOM id prefix marking the playoff variant of a stats table.
pub const PLAYOFF_PREFIX: &str = "playoffs_";

// ─── Identity ────────────────────────────────────────────────────────────────

/// Identity of one observed table: ordinal position (1-based, document
/// order) and DOM id. The id may be empty; such tables are recorded in
/// the accumulator but never persisted.
#[derive(
  Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TableKey {
  pub ordinal: usize,
  pub id:      String,
}

impl TableKey {
  pub fn new(ordinal: usize, id: impl Into<String>) -> Self {
    Self { ordinal, id: id.into() }
  }

  pub fn is_playoff(&self) -> bool {
    self.id.starts_with(PLAYOFF_PREFIX)
  }

  /// The id of the non-playoff sibling, i.e. the id with the playoff
  /// prefix stripped. Returns the id unchanged for regular tables.
  pub fn sibling_id(&self) -> &str {
    self.id.strip_prefix(PLAYOFF_PREFIX).unwrap_or(&self.id)
  }
}

// ─── Naming ──────────────────────────────────────────────────────────────────

/// How a [`TableKey`] maps to a stored table name.
///
/// The scraper this design derives from used `table_<ordinal>_<id>` when
/// writing and `table_<id>` when reconciling, so reconciliation could
/// never match extraction output. Both components here take the scheme
/// from the same pipeline configuration, so whichever is chosen is
/// applied consistently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameScheme {
  /// `table_<ordinal>_<id>` — what extraction historically produced.
  #[default]
  OrdinalPrefixed,
  /// `table_<id>` — the id alone, stable across page reordering.
  Bare,
}

impl NameScheme {
  /// Stored name for `key`, or `None` when the id is empty (an empty id
  /// would produce a malformed name).
  pub fn table_name(&self, key: &TableKey) -> Option<String> {
    if key.id.is_empty() {
      return None;
    }
    Some(match self {
      NameScheme::OrdinalPrefixed => format!("table_{}_{}", key.ordinal, key.id),
      NameScheme::Bare => format!("table_{}", key.id),
    })
  }
}

// ─── Stored form ─────────────────────────────────────────────────────────────

/// Catalog metadata for one stored table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMeta {
  /// Scheme-derived stored name, e.g. `table_25_totals`.
  pub name:       String,
  /// Resolved display title, e.g. `Playoffs Per Game`.
  pub title:      String,
  pub ordinal:    usize,
  pub dom_id:     String,
  pub scraped_at: DateTime<Utc>,
}

/// Header plus data rows; every value is text. Column count and types
/// are whatever the source page yields.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TableData {
  pub columns: Vec<String>,
  pub rows:    Vec<Vec<String>>,
}

impl TableData {
  /// Pad or truncate every row to the header width so the payload can
  /// be written as uniform SQL rows.
  pub fn normalized(mut self) -> Self {
    let width = self.columns.len();
    for row in &mut self.rows {
      row.resize(width, String::new());
    }
    self
  }

  pub fn column_index(&self, column: &str) -> Option<usize> {
    self.columns.iter().position(|c| c == column)
  }
}
