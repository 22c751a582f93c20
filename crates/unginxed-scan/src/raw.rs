//! What the scanner reports, before any validation.

use serde::Deserialize;

/// One issue, as the scanner reports it.
#[derive(Debug, Clone, Deserialize)]
pub struct Finding {
  /// The name of the rule that fired.
  pub name: String,
  /// What the rule is about.
  pub description: String,
  /// How bad it is, e.g. `WARNING`. Kept loose so that a bad severity only affects this finding.
  #[serde(default)]
  pub severity: serde_json::Value,
  /// Where in the document it fired.
  #[serde(default)]
  pub flagged: Vec<Span>,
}

/// A flagged span. All 1-based, columns inclusive.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Span {
  /// The line.
  pub line: u32,
  /// The first column.
  pub column_start: u32,
  /// The last column.
  pub column_end: u32,
}
