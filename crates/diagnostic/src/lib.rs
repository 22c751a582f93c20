//! See [`Diagnostic`].

/// A diagnostic message about a bit of a document, as shown to the user by the editor.
///
/// All positions are 0-based, and the range is half-open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
  /// The range of the file this diagnostic applies to.
  pub range: text_pos::RangeUtf16,
  /// How bad it is.
  pub severity: Severity,
  /// The message of the diagnostic.
  pub message: String,
  /// What produced the diagnostic, e.g. the name of the rule that fired.
  pub source: String,
  /// Extra text related to the diagnostic, reported at the same range.
  pub related: Option<String>,
}

/// A protocol-level severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
  /// Something is wrong.
  Error,
  /// Something is probably wrong.
  Warning,
  /// Something is worth knowing about.
  Information,
}
