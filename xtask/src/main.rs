//! A task runner for the repo based on the [xtask spec](https://github.com/matklad/cargo-xtask).

use flate2::{Compression, write::GzEncoder};
use pico_args::Arguments;
use std::path::Path;
use std::{env, fs, io, process::Command};

const HELP: &str = "usage:
  cargo xtask <command>

commands:
  ci    build, lint, and test
  dist  build the language server for release and gzip it into binary/
";

const LANG_SRV_NAME: &str = "unginxed-ls";

fn run(c: &mut Command) {
  let w = c.status().expect("run cmd");
  assert!(w.success(), "command failed: {c:?}");
}

fn ci() {
  run(Command::new("cargo").args(["build", "--locked"]));
  run(Command::new("cargo").args(["fmt", "--", "--check"]));
  run(Command::new("cargo").args(["clippy", "--locked", "--tests"]));
  run(Command::new("cargo").args(["test", "--locked"]));
}

fn dist() {
  run(Command::new("cargo").args(["build", "--locked", "--release", "--bin", LANG_SRV_NAME]));
  let src = Path::new("target")
    .join("release")
    .join(format!("{LANG_SRV_NAME}{}", env::consts::EXE_SUFFIX));
  let dst = Path::new("binary");
  fs::create_dir_all(dst).expect("create binary dir");
  let mut encoder = GzEncoder::new(
    fs::File::create(dst.join(format!("{LANG_SRV_NAME}.gz"))).expect("create gz"),
    Compression::best(),
  );
  io::copy(&mut fs::File::open(&src).expect("open server binary"), &mut encoder).expect("gzip");
  encoder.finish().expect("finish gzip");
}

fn main() {
  let mut args = Arguments::from_env();
  if args.contains(["-h", "--help"]) {
    print!("{HELP}");
    return;
  }
  let cmd = args.subcommand().expect("subcommand");
  let rest = args.finish();
  assert!(rest.is_empty(), "unexpected args: {rest:?}");
  let dir = Path::new(env!("CARGO_MANIFEST_DIR")).parent().expect("parent");
  env::set_current_dir(dir).expect("set dir");
  match cmd.as_deref() {
    Some("ci") => ci(),
    Some("dist") => dist(),
    None | Some("help") => print!("{HELP}"),
    Some(c) => panic!("unknown command: {c}"),
  }
}
