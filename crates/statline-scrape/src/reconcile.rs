//! Cross-store reconciliation: equalize table presence across subjects.
//!
//! For every accumulated table key, any store lacking the table while a
//! sibling store has it receives a full copy (catalog row + rows) under
//! replace semantics. Presence in both or neither is a no-op, which
//! makes the pass idempotent.

use std::collections::BTreeSet;

use statline_core::{
  store::TableStore,
  subject::Subject,
  table::{NameScheme, TableKey},
};
use tracing::{debug, info};

use crate::{Error, Result};

fn store_err<E>(e: E) -> Error
where
  E: std::error::Error + Send + Sync + 'static,
{
  Error::Store(Box::new(e))
}

/// Ensure every key's table exists in every store.
///
/// `scheme` must be the scheme the extractor wrote with; both sides of
/// the pipeline take it from the same
/// [`PipelineConfig`](crate::pipeline::PipelineConfig). Returns the
/// number of copies performed. A copy failure propagates and aborts the
/// remaining pass; that includes a source table present in
/// `sqlite_master` with no catalog row, which cannot be copied
/// faithfully ([`Error::Uncatalogued`]).
pub async fn reconcile<S>(
  stores: &[(Subject, S)],
  keys: &BTreeSet<TableKey>,
  scheme: NameScheme,
) -> Result<usize>
where
  S: TableStore,
{
  let mut copies = 0usize;

  for key in keys {
    let Some(name) = scheme.table_name(key) else {
      debug!("skipping id-less key at ordinal {}", key.ordinal);
      continue;
    };

    for a in 0..stores.len() {
      for b in (a + 1)..stores.len() {
        let (subject_a, store_a) = &stores[a];
        let (subject_b, store_b) = &stores[b];

        let in_a = store_a.table_exists(&name).await.map_err(store_err)?;
        let in_b = store_b.table_exists(&name).await.map_err(store_err)?;

        match (in_a, in_b) {
          (true, false) => {
            copies += copy_table(&name, store_a, store_b).await?;
            info!("copied {name}: {} → {}", subject_a.name, subject_b.name);
          }
          (false, true) => {
            copies += copy_table(&name, store_b, store_a).await?;
            info!("copied {name}: {} → {}", subject_b.name, subject_a.name);
          }
          _ => {}
        }
      }
    }
  }

  Ok(copies)
}

/// Copy one table (catalog row + contents) from `source` into `target`.
async fn copy_table<S>(name: &str, source: &S, target: &S) -> Result<usize>
where
  S: TableStore,
{
  let Some((meta, data)) = source.get_table(name).await.map_err(store_err)? else {
    // Exists in sqlite_master but was not written through the catalog;
    // nothing we can copy faithfully. Treated as a copy failure so the
    // symmetric guarantee never silently degrades.
    return Err(Error::Uncatalogued(name.to_string()));
  };

  target.put_table(meta, data).await.map_err(store_err)?;
  Ok(1)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
