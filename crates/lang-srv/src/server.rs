use crate::controller::{Controller, Publish};
use crate::{convert, store::Token};
use always::always;
use lang_srv_state::State;
use lsp_types::Url;
use std::{
  fmt,
  sync::{Arc, Weak},
};

pub(crate) struct Server<S> {
  pub(crate) conn: Arc<lsp_server::Connection>,
  pub(crate) controller: Arc<Controller<S, Publisher>>,
}

impl<S> Server<S>
where
  S: State,
{
  pub(crate) fn new(conn: Arc<lsp_server::Connection>, st: S) -> Self {
    let publisher = Publisher(Arc::downgrade(&conn));
    Self { conn, controller: Arc::new(Controller::new(st, publisher)) }
  }

  /// Runs the check for the token in the background.
  pub(crate) fn spawn(&self, token: Token) {
    let uri = token.uri().clone();
    if let Err(e) = Controller::spawn(&self.controller, token) {
      log::error!("couldn't start checking {uri}: {e}");
    }
  }

  pub(crate) fn respond(&self, response: lsp_server::Response) {
    send(&self.conn, response.into());
  }
}

/// Sends to the client, while it's still connected.
///
/// Only the server owns the connection. Checks still running at shutdown don't keep it open.
pub(crate) struct Publisher(Weak<lsp_server::Connection>);

impl Publisher {
  fn notify<N>(&self, params: N::Params)
  where
    N: lsp_types::notification::Notification,
  {
    let Some(conn) = self.0.upgrade() else {
      log::debug!("not sending {}: disconnected", N::METHOD);
      return;
    };
    let notif = lsp_server::Notification::new(N::METHOD.to_owned(), params);
    // the client may have gone away while a check was running, so this isn't a bug.
    if let Err(e) = conn.sender.send(notif.into()) {
      log::warn!("couldn't send {}: {e}", N::METHOD);
    }
  }
}

impl fmt::Debug for Publisher {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Publisher").finish_non_exhaustive()
  }
}

impl Publish for Publisher {
  fn publish(&self, uri: &Url, diagnostics: &[diagnostic::Diagnostic]) {
    self.notify::<lsp_types::notification::PublishDiagnostics>(convert::publish_params(
      uri,
      diagnostics,
    ));
  }

  fn log_error(&self, message: &str) {
    let params =
      lsp_types::LogMessageParams { typ: lsp_types::MessageType::ERROR, message: message.to_owned() };
    self.notify::<lsp_types::notification::LogMessage>(params);
  }
}

fn send(conn: &lsp_server::Connection, m: lsp_server::Message) {
  match conn.sender.send(m) {
    Ok(()) => {}
    Err(e) => {
      always!(false, "send failure: {e}");
    }
  }
}
