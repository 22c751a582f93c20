//! A language server for nginx configuration, reporting what the uNGINXed scanner finds.

fn main() {
  lang_srv::run(unginxed_ls::init);
}
