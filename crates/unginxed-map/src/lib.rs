//! Turning scanner findings into diagnostics.

use diagnostic::{Diagnostic, Severity};
use text_pos::{PositionUtf16, RangeUtf16};
use unginxed_scan::{Finding, Span};

/// A finding could not be turned into a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
  /// The scanner reported a severity with no diagnostic severity.
  #[error("no diagnostic severity for scanner severity `{0}`")]
  Severity(String),
}

/// Returns the diagnostic severity for a scanner severity.
///
/// # Errors
///
/// If the scanner severity is not one we know about.
pub fn severity(s: &unginxed_scan::Severity) -> Result<Severity, Error> {
  match s {
    unginxed_scan::Severity::Information => Ok(Severity::Information),
    unginxed_scan::Severity::Warning => Ok(Severity::Warning),
    unginxed_scan::Severity::Error => Ok(Severity::Error),
    unginxed_scan::Severity::Unknown(s) => Err(Error::Severity(s.clone())),
  }
}

/// Returns the range for a span.
///
/// The span is 1-based, so every coordinate goes down by one.
#[must_use]
pub fn range(span: Span) -> RangeUtf16 {
  let line = span.line() - 1;
  RangeUtf16 {
    start: PositionUtf16 { line, col: span.col_start() - 1 },
    end: PositionUtf16 { line, col: span.col_end() - 1 },
  }
}

/// Converts a finding into one diagnostic per flagged span.
///
/// Spans that can't be converted are logged and skipped.
#[must_use]
pub fn convert(finding: &Finding) -> Vec<Diagnostic> {
  finding
    .flagged
    .iter()
    .filter_map(|&span| match one(finding, span) {
      Ok(d) => Some(d),
      Err(e) => {
        log::error!("{}: skipping span {span}: {e}", finding.name);
        None
      }
    })
    .collect()
}

/// Converts many findings, in order.
#[must_use]
pub fn convert_all(findings: &[Finding]) -> Vec<Diagnostic> {
  findings.iter().flat_map(convert).collect()
}

fn one(finding: &Finding, span: Span) -> Result<Diagnostic, Error> {
  Ok(Diagnostic {
    range: range(span),
    severity: severity(&finding.severity)?,
    message: finding.description.clone(),
    source: finding.name.clone(),
    related: None,
  })
}
