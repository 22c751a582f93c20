use anyhow::{Result, bail};
use lsp_types::Url;

pub(crate) fn path_buf(url: &Url) -> Result<std::path::PathBuf> {
  if url.scheme() != "file" {
    bail!("not a file url: {url}")
  }
  match url.to_file_path() {
    Ok(pb) => Ok(pb),
    Err(()) => bail!("couldn't make a URL into a file path: {url}"),
  }
}

/// Returns the params for publishing `diagnostics` as all the diagnostics for the document.
#[must_use]
pub fn publish_params(
  uri: &Url,
  diagnostics: &[diagnostic::Diagnostic],
) -> lsp_types::PublishDiagnosticsParams {
  let diagnostics = diagnostics.iter().map(|d| diagnostic(uri, d)).collect();
  lsp_types::PublishDiagnosticsParams { uri: uri.clone(), diagnostics, version: None }
}

fn diagnostic(uri: &Url, d: &diagnostic::Diagnostic) -> lsp_types::Diagnostic {
  let range = range(d.range);
  let related_information = d.related.as_ref().map(|message| {
    vec![lsp_types::DiagnosticRelatedInformation {
      location: lsp_types::Location { uri: uri.clone(), range },
      message: message.clone(),
    }]
  });
  lsp_types::Diagnostic {
    range,
    severity: Some(severity(d.severity)),
    code: None,
    code_description: None,
    source: Some(d.source.clone()),
    message: d.message.clone(),
    related_information,
    tags: None,
    data: None,
  }
}

fn severity(s: diagnostic::Severity) -> lsp_types::DiagnosticSeverity {
  match s {
    diagnostic::Severity::Error => lsp_types::DiagnosticSeverity::ERROR,
    diagnostic::Severity::Warning => lsp_types::DiagnosticSeverity::WARNING,
    diagnostic::Severity::Information => lsp_types::DiagnosticSeverity::INFORMATION,
  }
}

fn range(r: text_pos::RangeUtf16) -> lsp_types::Range {
  lsp_types::Range { start: position(r.start), end: position(r.end) }
}

fn position(p: text_pos::PositionUtf16) -> lsp_types::Position {
  lsp_types::Position { line: p.line, character: p.col }
}
