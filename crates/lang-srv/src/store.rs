//! The diagnostics last published for each open document.

use diagnostic::Diagnostic;
use lsp_types::Url;
use rustc_hash::FxHashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A request to check a document, handed out when the request is issued.
#[derive(Debug, Clone)]
pub struct Token {
  uri: Url,
  seq: u64,
  doc: Arc<Mutex<Doc>>,
}

impl Token {
  /// The document to check.
  #[must_use]
  pub fn uri(&self) -> &Url {
    &self.uri
  }

  /// The sequence number of this request among all requests for the document.
  #[must_use]
  pub fn seq(&self) -> u64 {
    self.seq
  }
}

/// What happened to an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Update {
  /// The diagnostics are now the published ones.
  Published,
  /// Diagnostics from a later request were already published.
  Stale {
    /// The sequence number of the published diagnostics.
    published: u64,
  },
  /// The document was closed after the request was issued.
  Closed,
}

#[derive(Debug, Default)]
struct Doc {
  issued: u64,
  published: Option<u64>,
  diagnostics: Vec<Diagnostic>,
  closed: bool,
}

/// Per-document state, keyed by uri.
///
/// Each document has its own lock, so work on one document never waits on work for another.
#[derive(Debug, Default)]
pub struct Store {
  docs: Mutex<FxHashMap<Url, Arc<Mutex<Doc>>>>,
}

impl Store {
  /// Issues a new request to check the document, creating its state if there is none.
  #[must_use = "nothing is checked until the token is run"]
  pub fn issue(&self, uri: &Url) -> Token {
    let doc = Arc::clone(lock(&self.docs).entry(uri.clone()).or_default());
    let seq = {
      let mut d = lock(&doc);
      d.issued += 1;
      d.issued
    };
    Token { uri: uri.clone(), seq, doc }
  }

  /// Makes `diagnostics` the published set for the token's document, unless a later request was
  /// already published or the document was closed.
  ///
  /// `publish` is called with the new set iff it was stored. The document stays locked while it
  /// runs, so publications for one document happen in the order they were stored.
  pub fn update<F>(&self, token: &Token, diagnostics: Vec<Diagnostic>, publish: F) -> Update
  where
    F: FnOnce(&[Diagnostic]),
  {
    let mut d = lock(&token.doc);
    if d.closed {
      return Update::Closed;
    }
    if let Some(published) = d.published.filter(|&p| token.seq < p) {
      return Update::Stale { published };
    }
    d.published = Some(token.seq);
    d.diagnostics = diagnostics;
    publish(&d.diagnostics);
    Update::Published
  }

  /// Forgets everything about the document.
  ///
  /// `publish` is called with no diagnostics, whether or not there was any state. Requests issued
  /// before this will never be published.
  pub fn clear<F>(&self, uri: &Url, publish: F)
  where
    F: FnOnce(&[Diagnostic]),
  {
    let doc = lock(&self.docs).remove(uri);
    match doc {
      Some(doc) => {
        let mut d = lock(&doc);
        d.closed = true;
        d.diagnostics.clear();
        publish(&d.diagnostics);
      }
      None => publish(&[]),
    }
  }

  /// Returns the sequence number and contents of the published diagnostics for the document, if
  /// any were published.
  #[must_use]
  pub fn get(&self, uri: &Url) -> Option<(u64, Vec<Diagnostic>)> {
    let doc = lock(&self.docs).get(uri).map(Arc::clone)?;
    let d = lock(&doc);
    Some((d.published?, d.diagnostics.clone()))
  }

  /// Returns whether there is state for the document.
  #[must_use]
  pub fn contains(&self, uri: &Url) -> bool {
    lock(&self.docs).contains_key(uri)
  }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
  m.lock().unwrap_or_else(PoisonError::into_inner)
}
