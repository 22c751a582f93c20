//! Handling notifications from the client, e.g. "this document was saved".

use crate::server::Server;
use anyhow::{Result, anyhow, bail};
use lang_srv_state::State;
use std::ops::ControlFlow;

pub(crate) fn handle<S: State>(srv: &Server<S>, notif: lsp_server::Notification) -> Result<()> {
  match go(srv, notif) {
    // these are all optional for the server to handle
    ControlFlow::Continue(x) if x.method.starts_with("$/") => {
      log::debug!("ignoring notification: {}", x.method);
      Ok(())
    }
    ControlFlow::Continue(x) => bail!("unhandled notification: {x:?}"),
    ControlFlow::Break(Ok(())) => Ok(()),
    ControlFlow::Break(Err(e)) => bail!("couldn't handle notification: {e:?}"),
  }
}

type ControlFlowResult = ControlFlow<Result<()>, lsp_server::Notification>;

fn go<S: State>(srv: &Server<S>, mut notif: lsp_server::Notification) -> ControlFlowResult {
  notif = try_notif::<lsp_types::notification::DidOpenTextDocument, _>(notif, |params| {
    let token = srv.controller.open(&params.text_document.uri);
    srv.spawn(token);
    Ok(())
  })?;
  notif = try_notif::<lsp_types::notification::DidSaveTextDocument, _>(notif, |params| {
    let token = srv.controller.save(&params.text_document.uri);
    srv.spawn(token);
    Ok(())
  })?;
  notif = try_notif::<lsp_types::notification::DidCloseTextDocument, _>(notif, |params| {
    srv.controller.close(&params.text_document.uri);
    Ok(())
  })?;
  ControlFlow::Continue(notif)
}

fn try_notif<N, F>(notif: lsp_server::Notification, f: F) -> ControlFlowResult
where
  N: lsp_types::notification::Notification,
  F: FnOnce(N::Params) -> Result<()>,
{
  match notif.extract::<N::Params>(N::METHOD) {
    Ok(x) => ControlFlow::Break(f(x)),
    Err(e) => extract_error(e),
  }
}

/// Continue iff the notification was for some other method.
fn extract_error(e: lsp_server::ExtractError<lsp_server::Notification>) -> ControlFlowResult {
  match e {
    lsp_server::ExtractError::MethodMismatch(x) => ControlFlow::Continue(x),
    lsp_server::ExtractError::JsonError { method, error } => {
      ControlFlow::Break(Err(anyhow!("couldn't deserialize params for {method}: {error}")))
    }
  }
}
