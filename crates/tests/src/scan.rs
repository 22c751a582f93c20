//! Calling the scanner.

use crate::check::{FakeEngine, Outcome, no_hsts, no_hsts_diagnostic, raw_finding};
use indoc::indoc;
use pretty_assertions::assert_eq;
use std::path::Path;
use unginxed_scan::{Command, CommandError, Error, Finding, Severity, Span};

#[test]
fn parse_output() {
  let out = indoc! {r#"
    [
      {
        "name": "no-hsts",
        "description": "missing Strict-Transport-Security header",
        "severity": "WARNING",
        "flagged": [{ "line": 10, "column_start": 1, "column_end": 20 }]
      },
      {
        "name": "autoindex",
        "description": "directory listing enabled",
        "severity": "CRITICAL",
        "flagged": []
      }
    ]
  "#};
  let got = unginxed_scan::parse(out.as_bytes()).unwrap();
  assert_eq!(got.len(), 2);
  assert_eq!(got[0].name, "no-hsts");
  assert_eq!(got[0].flagged.len(), 1);
  assert_eq!(got[0].flagged[0].column_end, 20);
  assert_eq!(got[1].severity, "CRITICAL");
}

#[test]
fn parse_blank_output() {
  assert!(unginxed_scan::parse(b"").unwrap().is_empty());
  assert!(unginxed_scan::parse(b"  \n").unwrap().is_empty());
}

#[test]
fn parse_missing_flagged() {
  let got =
    unginxed_scan::parse(br#"[{"name": "a", "description": "b", "severity": "ERROR"}]"#).unwrap();
  assert!(got[0].flagged.is_empty());
}

#[test]
fn parse_garbage() {
  let got = unginxed_scan::parse(b"Traceback (most recent call last):");
  assert!(matches!(got, Err(CommandError::Json(_))));
}

#[test]
fn normalize() {
  let engine = FakeEngine::default();
  engine.set("/site.conf", Outcome::Findings(vec![no_hsts()]));
  let got = unginxed_scan::scan(&engine, Path::new("/site.conf")).unwrap();
  let want = vec![Finding {
    name: "no-hsts".to_owned(),
    description: "missing Strict-Transport-Security header".to_owned(),
    severity: Severity::Warning,
    flagged: vec![Span::new(10, 1, 20).unwrap()],
  }];
  assert_eq!(got, want);
}

#[test]
fn severity_exact() {
  let engine = FakeEngine::default();
  let findings = vec![
    raw_finding("a", "a", "INFORMATION", &[]),
    raw_finding("b", "b", "WARNING", &[]),
    raw_finding("c", "c", "ERROR", &[]),
    raw_finding("d", "d", "information", &[]),
    raw_finding("e", "e", "Error", &[]),
  ];
  engine.set("/x.conf", Outcome::Findings(findings));
  let got: Vec<_> = unginxed_scan::scan(&engine, Path::new("/x.conf"))
    .unwrap()
    .into_iter()
    .map(|f| f.severity)
    .collect();
  let want = vec![
    Severity::Information,
    Severity::Warning,
    Severity::Error,
    Severity::Unknown("information".to_owned()),
    Severity::Unknown("Error".to_owned()),
  ];
  assert_eq!(got, want);
  for s in &want[3..] {
    assert!(unginxed_map::severity(s).is_err(), "{s} was accepted");
  }
}

#[test]
fn bad_finding_keeps_siblings() {
  let out = indoc! {r#"
    [
      {
        "name": "no-hsts",
        "description": "missing Strict-Transport-Security header",
        "severity": "WARNING",
        "flagged": [{ "line": 10, "column_start": 1, "column_end": 20 }]
      },
      {
        "name": "numeric",
        "description": "severity is a number",
        "severity": 4,
        "flagged": [{ "line": 2, "column_start": 1, "column_end": 3 }]
      },
      { "description": "no name" },
      "not even an object"
    ]
  "#};
  let raw = unginxed_scan::parse(out.as_bytes()).unwrap();
  assert_eq!(raw.len(), 2);
  let engine = FakeEngine::default();
  engine.set("/site.conf", Outcome::Findings(raw));
  let findings = unginxed_scan::scan(&engine, Path::new("/site.conf")).unwrap();
  assert_eq!(findings[1].severity, Severity::Unknown("4".to_owned()));
  assert_eq!(unginxed_map::convert_all(&findings), vec![no_hsts_diagnostic()]);
}

#[test]
fn parse_not_an_array() {
  let got = unginxed_scan::parse(br#"{"name": "a"}"#);
  assert!(matches!(got, Err(CommandError::Json(_))));
}

#[test]
fn bad_spans_dropped() {
  let engine = FakeEngine::default();
  let f = raw_finding("r", "d", "ERROR", &[(0, 1, 2), (3, 0, 2), (4, 5, 4), (5, 2, 2)]);
  engine.set("/x.conf", Outcome::Findings(vec![f]));
  let got = unginxed_scan::scan(&engine, Path::new("/x.conf")).unwrap();
  assert_eq!(got[0].flagged, vec![Span::new(5, 2, 2).unwrap()]);
}

#[test]
fn span_new() {
  assert!(Span::new(1, 1, 1).is_some());
  assert!(Span::new(0, 1, 1).is_none());
  assert!(Span::new(1, 0, 1).is_none());
  assert!(Span::new(1, 3, 2).is_none());
}

#[test]
fn engine_error() {
  let engine = FakeEngine::default();
  engine.set("/x.conf", Outcome::Fail("crossplane: unexpected '}'".to_owned()));
  let err = unginxed_scan::scan(&engine, Path::new("/x.conf")).unwrap_err();
  let Error::Engine { path, message } = &err else { panic!("not an engine error: {err:?}") };
  assert_eq!(path, Path::new("/x.conf"));
  assert_eq!(message, "crossplane: unexpected '}'");
  assert_eq!(err.to_string(), "scanning /x.conf failed: crossplane: unexpected '}'");
}

#[test]
fn engine_panic() {
  let engine = FakeEngine::default();
  engine.set("/x.conf", Outcome::Panic("index out of range".to_owned()));
  let err = unginxed_scan::scan(&engine, Path::new("/x.conf")).unwrap_err();
  let Error::Panicked { message, .. } = &err else { panic!("not a panic: {err:?}") };
  assert_eq!(message, "index out of range");
}

#[test]
fn command_not_found() {
  let cmd = Command::new("/nonexistent/unginxed-scanner", Vec::new());
  let err = unginxed_scan::scan(&cmd, Path::new("/x.conf")).unwrap_err();
  let Error::Engine { message, .. } = &err else { panic!("not an engine error: {err:?}") };
  assert!(message.starts_with("couldn't run `/nonexistent/unginxed-scanner`"), "{message}");
}

#[test]
fn command_default() {
  let cmd = Command::default();
  assert_eq!(cmd.program(), Path::new("unginxed"));
  assert_eq!(cmd.args(), ["scan", "--format", "json"]);
}

#[cfg(unix)]
fn sh(script: &str) -> Command {
  Command::new("sh", vec!["-c".to_owned(), script.to_owned(), "sh".to_owned()])
}

#[cfg(unix)]
#[test]
fn command_runs_on_target() {
  let dir = tempfile::tempdir().unwrap();
  let target = dir.path().join("findings.json");
  let json = r#"[{"name": "n", "description": "d", "severity": "INFORMATION", "flagged": [{"line": 2, "column_start": 3, "column_end": 4}]}]"#;
  std::fs::write(&target, json).unwrap();
  // the target is passed last, so this prints the target's contents.
  let got = unginxed_scan::scan(&sh(r#"cat "$1""#), &target).unwrap();
  assert_eq!(got.len(), 1);
  assert_eq!(got[0].severity, Severity::Information);
  assert_eq!(got[0].flagged, vec![Span::new(2, 3, 4).unwrap()]);
}

#[cfg(unix)]
#[test]
fn command_exit_failure() {
  let err = unginxed_scan::scan(&sh("echo 'no such file' >&2; exit 3"), Path::new("/x.conf"))
    .unwrap_err();
  let Error::Engine { message, .. } = &err else { panic!("not an engine error: {err:?}") };
  assert!(message.ends_with(": no such file"), "{message}");
}
