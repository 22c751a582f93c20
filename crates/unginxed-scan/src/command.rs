//! Running the scanner as a separate process.

use crate::{Engine, raw};
use std::{
  io,
  path::{Path, PathBuf},
  process,
};

/// A scanner run as a separate process.
///
/// It is run as `<program> <args...> <target>` and must print a JSON array of findings to stdout,
/// and exit successfully.
#[derive(Debug, Clone)]
pub struct Command {
  program: PathBuf,
  args: Vec<String>,
}

impl Command {
  /// The program run by default.
  pub const DEFAULT_PROGRAM: &'static str = "unginxed";

  /// The args passed by default, before the target.
  pub const DEFAULT_ARGS: [&'static str; 3] = ["scan", "--format", "json"];

  /// Returns a new command running `program` with `args` before the target.
  #[must_use]
  pub fn new<P>(program: P, args: Vec<String>) -> Self
  where
    P: Into<PathBuf>,
  {
    Self { program: program.into(), args }
  }

  /// The program to run.
  #[must_use]
  pub fn program(&self) -> &Path {
    self.program.as_path()
  }

  /// The args passed before the target.
  #[must_use]
  pub fn args(&self) -> &[String] {
    self.args.as_slice()
  }
}

impl Default for Command {
  fn default() -> Self {
    Self::new(Self::DEFAULT_PROGRAM, Self::DEFAULT_ARGS.iter().map(|&x| x.to_owned()).collect())
  }
}

/// An error from running a [`Command`].
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
  /// Couldn't start the process.
  #[error("couldn't run `{program}`: {source}")]
  Spawn {
    /// The program.
    program: String,
    /// Why.
    source: io::Error,
  },
  /// The process exited unsuccessfully.
  #[error("`{program}` exited with {status}: {stderr}")]
  Exit {
    /// The program.
    program: String,
    /// How it exited.
    status: process::ExitStatus,
    /// What it printed to stderr.
    stderr: String,
  },
  /// The process printed something that wasn't findings.
  #[error("couldn't parse scanner output: {0}")]
  Json(#[from] serde_json::Error),
}

impl Engine for Command {
  type Error = CommandError;

  fn scan(&self, target: &Path) -> Result<Vec<raw::Finding>, Self::Error> {
    log::debug!("running {} on {}", self.program.display(), target.display());
    let output = process::Command::new(&self.program)
      .args(&self.args)
      .arg(target)
      .stdin(process::Stdio::null())
      .output()
      .map_err(|source| CommandError::Spawn { program: self.program.display().to_string(), source })?;
    if !output.status.success() {
      return Err(CommandError::Exit {
        program: self.program.display().to_string(),
        status: output.status,
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
      });
    }
    parse(&output.stdout)
  }
}

/// Parses the stdout of a scanner process. Blank output means no findings.
///
/// Elements of the array that aren't findings are logged and skipped.
///
/// # Errors
///
/// If the output was not a JSON array.
pub fn parse(stdout: &[u8]) -> Result<Vec<raw::Finding>, CommandError> {
  if stdout.iter().all(u8::is_ascii_whitespace) {
    return Ok(Vec::new());
  }
  let values: Vec<serde_json::Value> = serde_json::from_slice(stdout)?;
  let ret = values
    .into_iter()
    .enumerate()
    .filter_map(|(idx, v)| match serde_json::from_value::<raw::Finding>(v) {
      Ok(x) => Some(x),
      Err(e) => {
        log::error!("skipping finding #{idx} in scanner output: {e}");
        None
      }
    })
    .collect();
  Ok(ret)
}
