//! Reacting to documents being opened, saved, and closed.

use crate::convert;
use crate::store::{Store, Token, Update};
use diagnostic::Diagnostic;
use lang_srv_state::State;
use lsp_types::Url;
use std::sync::Arc;
use std::{io, thread};

/// Somewhere to send diagnostics.
pub trait Publish: Send + Sync {
  /// Replaces all the diagnostics shown for the document with these.
  fn publish(&self, uri: &Url, diagnostics: &[Diagnostic]);

  /// Tells the user something went wrong.
  fn log_error(&self, message: &str);
}

/// Decides when documents get checked and which results get published.
///
/// Opening or saving a document issues a [`Token`]. The check for a token may run anywhere, for
/// as long as it likes, and then is completed with [`Controller::complete`]. Results that arrive
/// after results for a later token, or after the document was closed, are dropped.
#[derive(Debug)]
pub struct Controller<S, P> {
  st: S,
  publisher: P,
  store: Store,
}

impl<S, P> Controller<S, P>
where
  S: State,
  P: Publish,
{
  /// Returns a new controller with no open documents.
  #[must_use]
  pub fn new(st: S, publisher: P) -> Self {
    Self { st, publisher, store: Store::default() }
  }

  /// A document was opened.
  #[must_use = "nothing is checked until the token is run"]
  pub fn open(&self, uri: &Url) -> Token {
    let ret = self.store.issue(uri);
    log::debug!("open {uri}: issued #{}", ret.seq());
    ret
  }

  /// A document was saved.
  #[must_use = "nothing is checked until the token is run"]
  pub fn save(&self, uri: &Url) -> Token {
    if !self.store.contains(uri) {
      log::info!("{uri} saved without being opened, treating as opened");
    }
    let ret = self.store.issue(uri);
    log::debug!("save {uri}: issued #{}", ret.seq());
    ret
  }

  /// A document was closed. Clears its diagnostics, even if a check is in flight.
  pub fn close(&self, uri: &Url) {
    log::debug!("close {uri}");
    self.store.clear(uri, |ds| self.publisher.publish(uri, ds));
  }

  /// Checks the document for the token. Never fails: if the check did, that is logged, and there
  /// are no diagnostics.
  #[must_use]
  pub fn check(&self, token: &Token) -> Vec<Diagnostic> {
    let uri = token.uri();
    let path = match convert::path_buf(uri) {
      Ok(x) => x,
      Err(e) => {
        self.fail(&format!("can't check {uri}: {e}"));
        return Vec::new();
      }
    };
    match self.st.check(path.as_path()) {
      Ok(ds) => ds,
      Err(e) => {
        self.fail(&format!("checking {uri} failed: {e}"));
        Vec::new()
      }
    }
  }

  fn fail(&self, message: &str) {
    log::error!("{message}");
    self.publisher.log_error(message);
  }

  /// Completes the check for a token with its diagnostics, publishing them if nothing newer has
  /// been.
  pub fn complete(&self, token: &Token, diagnostics: Vec<Diagnostic>) -> Update {
    let uri = token.uri();
    let seq = token.seq();
    let ret = self.store.update(token, diagnostics, |ds| self.publisher.publish(uri, ds));
    match ret {
      Update::Published => log::debug!("{uri}: published #{seq}"),
      Update::Stale { published } => {
        log::debug!("{uri}: discarding #{seq}, already published #{published}");
      }
      Update::Closed => log::debug!("{uri}: discarding #{seq}, closed"),
    }
    ret
  }

  /// Checks and completes the token.
  pub fn run(&self, token: &Token) -> Update {
    let ds = self.check(token);
    self.complete(token, ds)
  }

  /// Runs the token on a new thread.
  ///
  /// Every check gets its own thread, so a scan that never finishes holds up nothing but itself.
  ///
  /// # Errors
  ///
  /// If the thread couldn't be started.
  pub fn spawn(this: &Arc<Self>, token: Token) -> io::Result<thread::JoinHandle<Update>>
  where
    P: 'static,
  {
    let controller = Arc::clone(this);
    let name = format!("check {} #{}", token.uri(), token.seq());
    thread::Builder::new().name(name).spawn(move || controller.run(&token))
  }

  /// Returns the store of document state.
  #[must_use]
  pub fn store(&self) -> &Store {
    &self.store
  }
}
