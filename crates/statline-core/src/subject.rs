//! Subject — one tracked player with a single source page.
//!
//! Subjects come from static configuration and are immutable for the run.
//! Identity is the display name; `slug` is the filesystem-safe form used
//! to derive the per-subject store file.

use serde::{Deserialize, Serialize};

/// A tracked player: display name plus the URL of their stats page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
  pub name: String,
  pub slug: String,
  pub url:  String,
}

impl Subject {
  pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
    let name = name.into();
    let slug = slugify(&name);
    Self { name, slug, url: url.into() }
  }

  /// File name of this subject's SQLite store, e.g.
  /// `michael_jordan_stats.db`.
  pub fn store_file(&self) -> String {
    format!("{}_stats.db", self.slug)
  }

  /// The built-in roster. Code-level configuration, not parsed from a
  /// file.
  pub fn default_roster() -> Vec<Subject> {
    vec![
      Subject::new(
        "Michael Jordan",
        "https://www.basketball-reference.com/players/j/jordami01.html",
      ),
      Subject::new(
        "LeBron James",
        "https://www.basketball-reference.com/players/j/jamesle01.html",
      ),
    ]
  }
}

/// Lowercase; runs of non-alphanumeric characters collapse to `_`.
fn slugify(name: &str) -> String {
  let mut out = String::with_capacity(name.len());
  let mut last_sep = true;
  for c in name.chars() {
    if c.is_ascii_alphanumeric() {
      out.push(c.to_ascii_lowercase());
      last_sep = false;
    } else if !last_sep {
      out.push('_');
      last_sep = true;
    }
  }
  while out.ends_with('_') {
    out.pop();
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn slug_and_store_file() {
    let s = Subject::new("Michael Jordan", "https://example.com/mj");
    assert_eq!(s.slug, "michael_jordan");
    assert_eq!(s.store_file(), "michael_jordan_stats.db");
  }

  #[test]
  fn slug_collapses_punctuation() {
    assert_eq!(slugify("Shaquille O'Neal"), "shaquille_o_neal");
    assert_eq!(slugify("  A  B  "), "a_b");
  }

  #[test]
  fn default_roster_has_two_subjects() {
    let roster = Subject::default_roster();
    assert_eq!(roster.len(), 2);
    assert_ne!(roster[0].slug, roster[1].slug);
  }
}
