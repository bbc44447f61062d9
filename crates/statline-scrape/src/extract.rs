//! Table extraction from a subject page.
//!
//! Tables are keyed by ordinal position in document order, filtered to a
//! configurable inclusive range (the career-stats block sits at a fixed
//! position on the source layout), and paired with a display title
//! harvested from the `<id>_sh` heading elements.

use std::ops::RangeInclusive;

use scraper::{ElementRef, Html, Selector};
use statline_core::{
  table::{TableData, TableKey},
  title::{TitleIndex, resolve_title},
};

use crate::{Error, Result};

/// One table captured from the page: identity, resolved title, payload.
#[derive(Debug, Clone)]
pub struct ExtractedTable {
  pub key:   TableKey,
  pub title: String,
  pub data:  TableData,
}

struct Selectors {
  table:    Selector,
  heading:  Selector,
  h2:       Selector,
  thead_tr: Selector,
  tbody_tr: Selector,
  tr:       Selector,
  cell:     Selector,
}

impl Selectors {
  fn new() -> Result<Self> {
    Ok(Self {
      table:    sel("table")?,
      heading:  sel(r#"[id$="_sh"]"#)?,
      h2:       sel("h2")?,
      thead_tr: sel("thead tr")?,
      tbody_tr: sel("tbody tr")?,
      tr:       sel("tr")?,
      cell:     sel("th, td")?,
    })
  }
}

fn sel(s: &str) -> Result<Selector> {
  Selector::parse(s).map_err(|e| Error::Selector(s.to_string(), e.to_string()))
}

/// Enumerate the page's tables in document order (ordinal from 1) and
/// capture those whose ordinal falls in `range`, boundaries inclusive.
///
/// Tables with no DOM id are captured too — their keys feed the
/// reconciliation accumulator even though they are never persisted.
pub fn extract_tables(
  html: &str,
  range: RangeInclusive<usize>,
) -> Result<Vec<ExtractedTable>> {
  let sels = Selectors::new()?;
  let doc = Html::parse_document(html);
  let titles = harvest_titles(&doc, &sels);

  let mut out = Vec::new();
  for (i, table) in doc.select(&sels.table).enumerate() {
    let ordinal = i + 1;
    if !range.contains(&ordinal) {
      continue;
    }

    let id = table.value().attr("id").unwrap_or("").trim().to_string();
    let key = TableKey::new(ordinal, id);
    let title = resolve_title(&titles, &key);
    let data = parse_table(&table, &sels);
    out.push(ExtractedTable { key, title, data });
  }

  Ok(out)
}

/// Build the DOM id → heading text index from `<id>_sh` elements.
fn harvest_titles(doc: &Html, sels: &Selectors) -> TitleIndex {
  let mut index = TitleIndex::new();
  for el in doc.select(&sels.heading) {
    let Some(holder_id) = el.value().attr("id") else { continue };
    let Some(table_id) = holder_id.strip_suffix("_sh") else { continue };
    if let Some(heading) = el.select(&sels.h2).next() {
      let text = element_text(&heading);
      if !text.is_empty() {
        index.insert(table_id, text);
      }
    }
  }
  index
}

/// Header row + data rows, all cells as trimmed text.
///
/// Multi-row headers keep only the last `thead` row (the real column
/// row; earlier rows are spanned group labels). Mid-table repeated
/// header rows (`class="thead"`) are dropped from the data.
fn parse_table(table: &ElementRef<'_>, sels: &Selectors) -> TableData {
  let head: Vec<ElementRef<'_>> = table.select(&sels.thead_tr).collect();

  let (columns, body) = match head.last() {
    Some(header_row) => {
      let mut body: Vec<ElementRef<'_>> = table.select(&sels.tbody_tr).collect();
      if body.is_empty() {
        // Table without <tbody>: everything after the header rows.
        body = table.select(&sels.tr).skip(head.len()).collect();
      }
      (row_cells(header_row, sels), body)
    }
    None => {
      // Table without <thead>: first row is the header.
      let mut rows = table.select(&sels.tr);
      let columns = rows
        .next()
        .map(|r| row_cells(&r, sels))
        .unwrap_or_default();
      (columns, rows.collect())
    }
  };

  let rows = body
    .into_iter()
    .filter(|r| !r.value().attr("class").unwrap_or("").contains("thead"))
    .map(|r| row_cells(&r, sels))
    .collect();

  TableData { columns, rows }.normalized()
}

fn row_cells(row: &ElementRef<'_>, sels: &Selectors) -> Vec<String> {
  row.select(&sels.cell).map(|c| element_text(&c)).collect()
}

fn element_text(el: &ElementRef<'_>) -> String {
  el.text().collect::<String>().trim().to_string()
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  /// A page of `n` minimal tables; `override_at` swaps in custom markup
  /// for one ordinal.
  fn fixture_page(n: usize, override_at: Option<(usize, &str)>) -> String {
    let mut page = String::from("<html><body>");
    for i in 1..=n {
      match override_at {
        Some((at, markup)) if at == i => page.push_str(markup),
        _ => page.push_str(&format!(
          r#"<table id="t{i}"><thead><tr><th>A</th><th>B</th></tr></thead>
             <tbody><tr><td>{i}</td><td>x</td></tr></tbody></table>"#
        )),
      }
    }
    page.push_str("</body></html>");
    page
  }

  #[test]
  fn range_boundaries_are_inclusive() {
    let page = fixture_page(45, None);
    let tables = extract_tables(&page, 21..=39).unwrap();

    let ordinals: Vec<usize> = tables.iter().map(|t| t.key.ordinal).collect();
    assert_eq!(ordinals.first(), Some(&21));
    assert_eq!(ordinals.last(), Some(&39));
    assert_eq!(ordinals.len(), 19);
    assert!(!ordinals.contains(&20));
    assert!(!ordinals.contains(&40));
  }

  #[test]
  fn captures_id_and_rows() {
    let totals = r#"<table id="totals"><thead><tr><th>Season</th><th>PTS</th></tr></thead>
      <tbody><tr><td>1991-92</td><td>2404</td></tr></tbody></table>"#;
    let page = fixture_page(39, Some((25, totals)));
    let tables = extract_tables(&page, 21..=39).unwrap();

    let t = tables.iter().find(|t| t.key.ordinal == 25).unwrap();
    assert_eq!(t.key.id, "totals");
    assert_eq!(t.data.columns, vec!["Season", "PTS"]);
    assert_eq!(t.data.rows, vec![vec!["1991-92", "2404"]]);
  }

  #[test]
  fn missing_heading_falls_back_to_ordinal_title() {
    let totals = r#"<table id="totals"><thead><tr><th>PTS</th></tr></thead>
      <tbody><tr><td>2404</td></tr></tbody></table>"#;
    let page = fixture_page(39, Some((25, totals)));
    let tables = extract_tables(&page, 21..=39).unwrap();

    let t = tables.iter().find(|t| t.key.id == "totals").unwrap();
    assert_eq!(t.title, "Table 25");
  }

  #[test]
  fn playoff_table_borrows_sibling_heading() {
    let markup = r#"
      <div id="totals_sh"><h2>Per Game</h2></div>
      <table id="playoffs_totals"><thead><tr><th>PTS</th></tr></thead>
        <tbody><tr><td>33.4</td></tr></tbody></table>"#;
    let page = fixture_page(39, Some((30, markup)));
    let tables = extract_tables(&page, 21..=39).unwrap();

    let t = tables.iter().find(|t| t.key.id == "playoffs_totals").unwrap();
    assert_eq!(t.title, "Playoffs Per Game");
  }

  #[test]
  fn idless_table_is_still_captured() {
    let markup = r#"<table><thead><tr><th>X</th></tr></thead>
      <tbody><tr><td>1</td></tr></tbody></table>"#;
    let page = fixture_page(39, Some((22, markup)));
    let tables = extract_tables(&page, 21..=39).unwrap();

    let t = tables.iter().find(|t| t.key.ordinal == 22).unwrap();
    assert!(t.key.id.is_empty());
  }

  #[test]
  fn multi_row_header_keeps_last_and_skips_repeats() {
    let markup = r#"<table id="per_game">
      <thead>
        <tr><th colspan="2">Shooting</th></tr>
        <tr><th>Season</th><th>FG%</th></tr>
      </thead>
      <tbody>
        <tr><td>1991-92</td><td>.519</td></tr>
        <tr class="thead"><td>Season</td><td>FG%</td></tr>
        <tr><td>1992-93</td><td>.495</td></tr>
      </tbody></table>"#;
    let page = fixture_page(39, Some((21, markup)));
    let tables = extract_tables(&page, 21..=39).unwrap();

    let t = tables.iter().find(|t| t.key.id == "per_game").unwrap();
    assert_eq!(t.data.columns, vec!["Season", "FG%"]);
    assert_eq!(t.data.rows.len(), 2);
    assert_eq!(t.data.rows[1], vec!["1992-93", ".495"]);
  }

  #[test]
  fn headerless_table_uses_first_row() {
    let markup = r#"<table id="raw">
      <tr><td>Season</td><td>PTS</td></tr>
      <tr><td>1991-92</td><td>2404</td></tr></table>"#;
    let page = fixture_page(39, Some((21, markup)));
    let tables = extract_tables(&page, 21..=39).unwrap();

    let t = tables.iter().find(|t| t.key.id == "raw").unwrap();
    assert_eq!(t.data.columns, vec!["Season", "PTS"]);
    assert_eq!(t.data.rows, vec![vec!["1991-92", "2404"]]);
  }
}
