// SPDX-License-Identifier: LGPL-2.1
// Copyright 2022 Daniel Vogelbacher <daniel@chaospixel.com>

mod app;
mod convert;

use std::path::PathBuf;

use fern::colors::{Color, ColoredLevelConfig};
use thiserror::Error;

const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");
const PKG_NAME: &str = env!("CARGO_PKG_NAME");

/// Main entry function
///
/// We initialize the fern logger here, create a Clap command line
/// parser and hand over to the conversion driver. Any fatal error exits
/// with code 1; warnings never change the exit code.
fn main() {
  let app = app::create_app();
  let matches = app.try_get_matches().unwrap_or_else(|e| {
    let _ = e.print();
    std::process::exit(1);
  });

  let colors = ColoredLevelConfig::new().debug(Color::Magenta);
  fern::Dispatch::new()
    .chain(std::io::stderr())
    .level({
      match matches.get_count("debug") {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
      }
    })
    .format(move |out, message, record| {
      out.finish(format_args!(
        "[{:6}][{}] {} ({}:{})",
        colors.color(record.level()),
        record.target(),
        message,
        record.file().unwrap_or("<undefined>"),
        record.line().unwrap_or(0)
      ))
    })
    .apply()
    .expect("Invalid fern configuration, exiting");

  log::debug!("{} {}", PKG_NAME, PKG_VERSION);

  if let Err(err) = convert::convert(&matches) {
    eprintln!("ERROR: {}", err);
    std::process::exit(1);
  }
}

#[derive(Error, Debug)]
pub enum AppError {
  #[error("Invalid arguments: {}", _0)]
  InvalidCmdSwitch(String),
  #[error("I/O error: {}", _0)]
  Io(#[from] std::io::Error),
  #[error("Could not open {}: {}", _0.display(), _1)]
  FileOpen(PathBuf, std::io::Error),
  #[error("Decoder failed: {}", _0)]
  DecoderFailed(#[from] ambaraw::AmbaError),
  #[error("{}", _0)]
  General(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
