//! What the client gets sent.

use crate::check::{diagnostic, file_url, no_hsts_diagnostic, range};
use diagnostic::Severity;
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn no_hsts() {
  let uri = file_url("/etc/nginx/site.conf");
  let params = lang_srv::publish_params(&uri, &[no_hsts_diagnostic()]);
  let want = json!({
    "uri": "file:///etc/nginx/site.conf",
    "diagnostics": [
      {
        "range": {
          "start": { "line": 9, "character": 0 },
          "end": { "line": 9, "character": 19 }
        },
        "severity": 2,
        "source": "no-hsts",
        "message": "missing Strict-Transport-Security header"
      }
    ]
  });
  assert_eq!(serde_json::to_value(&params).unwrap(), want);
}

#[test]
fn severity_codes() {
  let uri = file_url("/x.conf");
  let ds: Vec<_> = [Severity::Error, Severity::Warning, Severity::Information]
    .into_iter()
    .map(|s| diagnostic(range(0, 0, 1), s, "m", "s"))
    .collect();
  let params = lang_srv::publish_params(&uri, &ds);
  let got: Vec<_> =
    params.diagnostics.iter().map(|d| serde_json::to_value(d.severity).unwrap()).collect();
  assert_eq!(got, vec![json!(1), json!(2), json!(3)]);
}

#[test]
fn related_information() {
  let uri = file_url("/x.conf");
  let mut d = diagnostic(range(3, 4, 16), Severity::Information, "server_tokens is on", "rule");
  d.related = Some("set server_tokens off".to_owned());
  let params = lang_srv::publish_params(&uri, &[d]);
  let got = serde_json::to_value(&params.diagnostics[0]).unwrap();
  let want = json!([
    {
      "location": {
        "uri": "file:///x.conf",
        "range": {
          "start": { "line": 3, "character": 4 },
          "end": { "line": 3, "character": 16 }
        }
      },
      "message": "set server_tokens off"
    }
  ]);
  assert_eq!(got["relatedInformation"], want);
}

#[test]
fn nothing_to_publish() {
  let uri = file_url("/x.conf");
  let params = lang_srv::publish_params(&uri, &[]);
  let want = json!({ "uri": "file:///x.conf", "diagnostics": [] });
  assert_eq!(serde_json::to_value(&params).unwrap(), want);
}
