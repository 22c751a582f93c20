//! A trait that describes what the "brain" of a language server must implement.
//!
//! This "brain" is not concerned with low-level LSP details like message formatting, or with when
//! or in what order documents get checked.

use std::{fmt, path::Path};

/// The state of a language server.
///
/// Checks may run on many threads at once, for the same or different paths.
pub trait State: Send + Sync + 'static {
  /// What to say to ask for a bug report.
  const BUG_REPORT_MSG: &'static str;

  /// The error when a check fails.
  type Error: fmt::Display;

  /// Checks the document at the path, returning all the diagnostics for it.
  ///
  /// # Errors
  ///
  /// If the document couldn't be checked at all.
  fn check(&self, path: &Path) -> Result<Vec<diagnostic::Diagnostic>, Self::Error>;
}
