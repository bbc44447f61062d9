//! [`SqliteStore`] — the SQLite implementation of [`TableStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use statline_core::{
  store::TableStore,
  table::{TableData, TableMeta},
};

use crate::{Error, Result, schema::SCHEMA};

// ─── Store ───────────────────────────────────────────────────────────────────

/// One subject's table store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Identifier helpers ──────────────────────────────────────────────────────

/// Double-quote an identifier for use in dynamic DDL/DML.
fn quote_ident(name: &str) -> String {
  format!("\"{}\"", name.replace('"', "\"\""))
}

/// Sanitise page headers into usable SQL column names.
///
/// Source pages can ship empty or duplicate header cells; both would
/// produce invalid DDL. Empty cells become `col_<n>`; duplicates get a
/// positional suffix.
fn ddl_columns(columns: &[String]) -> Vec<String> {
  let mut seen = std::collections::HashSet::new();
  columns
    .iter()
    .enumerate()
    .map(|(i, c)| {
      let mut name = c.trim().to_string();
      if name.is_empty() {
        name = format!("col_{}", i + 1);
      }
      if !seen.insert(name.to_lowercase()) {
        // The positional suffix itself can clash with a real header
        // (e.g. `x_3, x, x`), so keep bumping until the name is free.
        let mut n = i + 1;
        loop {
          let candidate = format!("{name}_{n}");
          if seen.insert(candidate.to_lowercase()) {
            name = candidate;
            break;
          }
          n += 1;
        }
      }
      name
    })
    .collect()
}

// ─── Raw row types ───────────────────────────────────────────────────────────

struct RawMeta {
  name:       String,
  title:      String,
  ordinal:    i64,
  dom_id:     String,
  scraped_at: String,
}

impl RawMeta {
  fn into_meta(self) -> Result<TableMeta> {
    let scraped_at = decode_dt(&self.scraped_at)?;
    Ok(TableMeta {
      name: self.name,
      title: self.title,
      ordinal: self.ordinal as usize,
      dom_id: self.dom_id,
      scraped_at,
    })
  }
}

fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339()
}

fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

const META_COLS: &str = "name, title, ordinal, dom_id, scraped_at";

fn meta_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawMeta> {
  Ok(RawMeta {
    name:       row.get(0)?,
    title:      row.get(1)?,
    ordinal:    row.get(2)?,
    dom_id:     row.get(3)?,
    scraped_at: row.get(4)?,
  })
}

// ─── TableStore impl ─────────────────────────────────────────────────────────

impl TableStore for SqliteStore {
  type Error = Error;

  async fn put_table(&self, meta: TableMeta, data: TableData) -> Result<()> {
    if meta.name.is_empty() {
      return Err(Error::InvalidTableName(meta.name));
    }

    // Derive SQL column names, synthesising a header if the page table
    // had none, then square the rows against it.
    let mut columns = ddl_columns(&data.columns);
    if columns.is_empty() {
      let width = data.rows.iter().map(Vec::len).max().unwrap_or(1).max(1);
      columns = (1..=width).map(|i| format!("col_{i}")).collect();
    }
    let data = TableData { columns: columns.clone(), rows: data.rows }.normalized();

    let q_name     = quote_ident(&meta.name);
    let drop_sql   = format!("DROP TABLE IF EXISTS {q_name}");
    let create_sql = format!(
      "CREATE TABLE {q_name} ({})",
      columns
        .iter()
        .map(|c| format!("{} TEXT", quote_ident(c)))
        .collect::<Vec<_>>()
        .join(", ")
    );
    let insert_sql = format!(
      "INSERT INTO {q_name} VALUES ({})",
      (1..=columns.len())
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ")
    );

    let at_str = encode_dt(meta.scraped_at);

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute_batch(&drop_sql)?;
        tx.execute_batch(&create_sql)?;
        {
          let mut stmt = tx.prepare(&insert_sql)?;
          for row in &data.rows {
            stmt.execute(rusqlite::params_from_iter(row.iter()))?;
          }
        }
        tx.execute(
          "INSERT OR REPLACE INTO catalog (name, title, ordinal, dom_id, scraped_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![
            meta.name,
            meta.title,
            meta.ordinal as i64,
            meta.dom_id,
            at_str,
          ],
        )?;
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_table(&self, name: &str) -> Result<Option<(TableMeta, TableData)>> {
    let name = name.to_owned();

    let raw: Option<(RawMeta, Vec<String>, Vec<Vec<String>>)> = self
      .conn
      .call(move |conn| {
        let meta: Option<RawMeta> = conn
          .query_row(
            &format!("SELECT {META_COLS} FROM catalog WHERE name = ?1"),
            rusqlite::params![name],
            meta_from_row,
          )
          .optional()?;

        let Some(meta) = meta else {
          return Ok(None);
        };

        let mut stmt =
          conn.prepare(&format!("SELECT * FROM {}", quote_ident(&meta.name)))?;
        let columns: Vec<String> =
          stmt.column_names().iter().map(|c| c.to_string()).collect();
        let ncols = columns.len();

        let rows = stmt
          .query_map([], |row| {
            let mut out = Vec::with_capacity(ncols);
            for i in 0..ncols {
              out.push(row.get::<_, Option<String>>(i)?.unwrap_or_default());
            }
            Ok(out)
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Some((meta, columns, rows)))
      })
      .await?;

    raw
      .map(|(meta, columns, rows)| {
        Ok((meta.into_meta()?, TableData { columns, rows }))
      })
      .transpose()
  }

  async fn table_exists(&self, name: &str) -> Result<bool> {
    let name = name.to_owned();

    let exists = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
              rusqlite::params![name],
              |_| Ok(()),
            )
            .optional()?
            .is_some(),
        )
      })
      .await?;
    Ok(exists)
  }

  async fn list_tables(&self) -> Result<Vec<TableMeta>> {
    let raws: Vec<RawMeta> = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare(&format!("SELECT {META_COLS} FROM catalog ORDER BY name"))?;
        let rows = stmt
          .query_map([], meta_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawMeta::into_meta).collect()
  }
}
