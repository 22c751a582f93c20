//! The state for the uNGINXed language server: scanning a document and mapping what the scanner
//! finds to diagnostics.

use always::always;
use serde_json::Value;
use std::path::Path;
use unginxed_scan::{Command, Engine};

/// The state: an engine to scan with.
#[derive(Debug)]
pub struct St<E> {
  engine: E,
}

impl<E> St<E> {
  /// Returns a new state scanning with the engine.
  #[must_use]
  pub fn new(engine: E) -> Self {
    Self { engine }
  }
}

impl<E> lang_srv::State for St<E>
where
  E: Engine + Send + Sync + 'static,
{
  const BUG_REPORT_MSG: &'static str =
    "the uNGINXed language server crashed. please file a bug report with the output above.";

  type Error = unginxed_scan::Error;

  fn check(&self, path: &Path) -> Result<Vec<diagnostic::Diagnostic>, Self::Error> {
    let findings = unginxed_scan::scan(&self.engine, path)?;
    log::debug!("{}: {} findings", path.display(), findings.len());
    Ok(unginxed_map::convert_all(&findings))
  }
}

/// Configuration from the initialization options.
#[derive(Debug, Default)]
pub struct Config {
  /// The filter for the logger, if any.
  pub logger_filter: Option<String>,
  /// How to run the scanner.
  pub scanner: Command,
}

impl Config {
  /// Reads the initialization options. Anything unset or invalid is left as the default.
  ///
  /// Returns the config and a description of each invalid option.
  #[must_use]
  pub fn new(val: Option<&Value>) -> (Self, Vec<String>) {
    let mut ret = Self::default();
    let mut errors = Vec::<String>::new();
    let Some(val) = val else { return (ret, errors) };
    let Value::Object(obj) = val else {
      errors.push(format!("initialization options must be an object, got {val}"));
      return (ret, errors);
    };
    ret.logger_filter =
      obj.get("logger_filter").and_then(Value::as_str).filter(|x| !x.is_empty()).map(str::to_owned);
    let program = match obj.get("scanner_command") {
      None => None,
      Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
      Some(v) => {
        errors.push(format!("scanner_command must be a non-empty string, got {v}"));
        None
      }
    };
    let args = match obj.get("scanner_args") {
      None => None,
      Some(Value::Array(xs)) => {
        let args = xs.iter().map(|x| x.as_str().map(str::to_owned)).collect::<Option<Vec<_>>>();
        if args.is_none() {
          errors.push("scanner_args must contain only strings".to_owned());
        }
        args
      }
      Some(v) => {
        errors.push(format!("scanner_args must be an array, got {v}"));
        None
      }
    };
    if program.is_some() || args.is_some() {
      let program = program.unwrap_or_else(|| Command::DEFAULT_PROGRAM.to_owned());
      let args = args.unwrap_or_else(|| Command::DEFAULT_ARGS.iter().map(|&x| x.to_owned()).collect());
      ret.scanner = Command::new(program, args);
    }
    (ret, errors)
  }
}

/// Makes the state from the initialization options, and starts the logger.
#[must_use]
pub fn init(val: Option<Value>) -> St<Command> {
  let (config, errors) = Config::new(val.as_ref());
  let mut logger_env = env_logger::Env::default();
  if let Some(filter) = config.logger_filter {
    logger_env = logger_env.default_filter_or(filter);
  }
  if let Err(e) = env_logger::try_init_from_env(logger_env) {
    always!(false, "couldn't init logger: {e}");
  }
  for e in errors {
    log::warn!("ignoring bad initialization option: {e}");
  }
  log::info!("scanning with {}", config.scanner.program().display());
  St::new(config.scanner)
}
