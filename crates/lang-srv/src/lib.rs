//! A generic language server that checks documents when they are opened or saved.

mod capabilities;
mod controller;
mod convert;
mod notification;
mod server;
mod store;

pub use controller::{Controller, Publish};
pub use convert::publish_params;
pub use lang_srv_state::State;
pub use store::{Store, Token, Update};

use std::sync::Arc;

/// Sets up and runs the LSP over stdio.
///
/// `init` makes the state from the client's initialization options.
///
/// # Panics
///
/// If things failed that it wouldn't make sense to try to recover from, like starting up the LSP or
/// joining I/O threads.
pub fn run<S, F>(init: F)
where
  S: State,
  F: FnOnce(Option<serde_json::Value>) -> S,
{
  better_panic::Settings::new()
    .message(S::BUG_REPORT_MSG)
    .verbosity(better_panic::Verbosity::Medium)
    .install();

  let (conn, io_threads) = lsp_server::Connection::stdio();

  let server_capabilities = serde_json::to_value(capabilities::get()).expect("get capabilities");
  let init_params = conn.initialize(server_capabilities).expect("init conn");
  let init_params: lsp_types::InitializeParams =
    serde_json::from_value(init_params).expect("get init");
  let st = init(init_params.initialization_options);
  let srv = server::Server::new(Arc::new(conn), st);
  log::info!("started lsp server");

  for msg in &srv.conn.receiver {
    match msg {
      lsp_server::Message::Request(req) => {
        if srv.conn.handle_shutdown(&req).expect("handle shutdown") {
          break;
        }
        log::warn!("unhandled request: {}", req.method);
        let msg = format!("unhandled request: {}", req.method);
        let code = lsp_server::ErrorCode::MethodNotFound as i32;
        srv.respond(lsp_server::Response::new_err(req.id, code, msg));
      }
      lsp_server::Message::Response(res) => log::info!("got response: {res:?}"),
      lsp_server::Message::Notification(notif) => match notification::handle(&srv, notif) {
        Ok(()) => {}
        Err(e) => log::error!("error: {e}"),
      },
    }
  }

  // checks only hold a weak ref to the connection, so dropping this lets the writer thread stop even
  // if some are still running.
  drop(srv);
  io_threads.join().expect("join io threads");
  log::info!("shut down lsp server");
}
