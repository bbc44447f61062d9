//! SQL schema for the statline SQLite store.
//!
//! Only the catalog is fixed; the scraped tables themselves are created
//! dynamically per page table, with whatever columns the page yielded.

/// Fixed schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per stored scrape table. `name` matches the dynamically
-- created data table of the same name.
CREATE TABLE IF NOT EXISTS catalog (
    name       TEXT PRIMARY KEY,
    title      TEXT NOT NULL,
    ordinal    INTEGER NOT NULL,
    dom_id     TEXT NOT NULL,
    scraped_at TEXT NOT NULL      -- ISO 8601 UTC
);

PRAGMA user_version = 1;
";
