//! Running an external scanner over a document and normalizing what it reports.
//!
//! The scanner is opaque: anything implementing [`Engine`] will do. [`scan`] is the only way the
//! rest of the server calls into it. It turns every way the engine can fail, panics included, into
//! an [`Error`], and validates what the engine reports into canonical [`Finding`]s.

mod command;
pub mod raw;

pub use command::{Command, CommandError, parse};

use std::{any::Any, fmt, panic, path::Path, path::PathBuf};

/// Something that can scan a document for findings.
pub trait Engine {
  /// The error when scanning fails.
  type Error: std::error::Error;

  /// Scans the document at the target path.
  ///
  /// # Errors
  ///
  /// If the engine could not produce results for the document.
  fn scan(&self, target: &Path) -> Result<Vec<raw::Finding>, Self::Error>;
}

/// The scanner failed to produce results for a document.
#[derive(Debug, thiserror::Error)]
pub enum Error {
  /// The engine reported an error.
  #[error("scanning {} failed: {message}", .path.display())]
  Engine {
    /// The document.
    path: PathBuf,
    /// What the engine said.
    message: String,
  },
  /// The engine panicked.
  #[error("scanner panicked on {}: {message}", .path.display())]
  Panicked {
    /// The document.
    path: PathBuf,
    /// The panic payload, if it was a string.
    message: String,
  },
}

/// One issue reported by the scanner, with a severity and where in the document it applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
  /// The name of the rule that fired.
  pub name: String,
  /// The long description of the issue.
  pub description: String,
  /// How bad it is.
  pub severity: Severity,
  /// The spans the issue applies to, in the order the scanner reported them.
  pub flagged: Vec<Span>,
}

/// A severity as reported by the scanner.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Severity {
  /// `INFORMATION`.
  Information,
  /// `WARNING`.
  Warning,
  /// `ERROR`.
  Error,
  /// Anything else, as the scanner wrote it. Carried through so it can be rejected downstream.
  Unknown(String),
}

impl Severity {
  fn from_raw(v: serde_json::Value) -> Self {
    match v {
      serde_json::Value::String(s) => match s.as_str() {
        "INFORMATION" => Severity::Information,
        "WARNING" => Severity::Warning,
        "ERROR" => Severity::Error,
        _ => Severity::Unknown(s),
      },
      v => Severity::Unknown(v.to_string()),
    }
  }
}

impl fmt::Display for Severity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Severity::Information => f.write_str("INFORMATION"),
      Severity::Warning => f.write_str("WARNING"),
      Severity::Error => f.write_str("ERROR"),
      Severity::Unknown(s) => f.write_str(s),
    }
  }
}

/// A flagged span of a single line.
///
/// Lines and columns are 1-based, and the end column is inclusive. Every field is at least 1 and
/// the end column is never before the start column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
  line: u32,
  col_start: u32,
  col_end: u32,
}

impl Span {
  /// Returns a new span, or `None` if the coordinates are not 1-based or out of order.
  #[must_use]
  pub fn new(line: u32, col_start: u32, col_end: u32) -> Option<Self> {
    (line >= 1 && col_start >= 1 && col_end >= col_start).then_some(Self {
      line,
      col_start,
      col_end,
    })
  }

  /// The line.
  #[must_use]
  pub fn line(self) -> u32 {
    self.line
  }

  /// The first column.
  #[must_use]
  pub fn col_start(self) -> u32 {
    self.col_start
  }

  /// The last column.
  #[must_use]
  pub fn col_end(self) -> u32 {
    self.col_end
  }
}

impl fmt::Display for Span {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{}-{}", self.line, self.col_start, self.col_end)
  }
}

/// Scans the document at `target` with the engine.
///
/// Spans the engine reports with bad coordinates are dropped with a warning.
///
/// # Errors
///
/// If the engine failed or panicked.
pub fn scan<E>(engine: &E, target: &Path) -> Result<Vec<Finding>, Error>
where
  E: Engine + ?Sized,
{
  let raw = match panic::catch_unwind(panic::AssertUnwindSafe(|| engine.scan(target))) {
    Ok(Ok(xs)) => xs,
    Ok(Err(e)) => return Err(Error::Engine { path: target.to_owned(), message: e.to_string() }),
    Err(payload) => {
      return Err(Error::Panicked {
        path: target.to_owned(),
        message: panic_message(payload.as_ref()),
      });
    }
  };
  Ok(raw.into_iter().map(|f| finding(target, f)).collect())
}

fn finding(target: &Path, f: raw::Finding) -> Finding {
  let flagged = f
    .flagged
    .into_iter()
    .filter_map(|s| {
      let ret = Span::new(s.line, s.column_start, s.column_end);
      if ret.is_none() {
        log::warn!(
          "{}: {}: dropping bad span {}:{}-{}",
          target.display(),
          f.name,
          s.line,
          s.column_start,
          s.column_end
        );
      }
      ret
    })
    .collect();
  Finding {
    name: f.name,
    description: f.description,
    severity: Severity::from_raw(f.severity),
    flagged,
  }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
  if let Some(s) = payload.downcast_ref::<&str>() {
    (*s).to_owned()
  } else if let Some(s) = payload.downcast_ref::<String>() {
    s.clone()
  } else {
    "<non-string panic payload>".to_owned()
  }
}
