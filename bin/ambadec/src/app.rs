// SPDX-License-Identifier: LGPL-2.1
// Copyright 2022 Daniel Vogelbacher <daniel@chaospixel.com>

use std::path::PathBuf;

use clap::{Arg, ArgAction, Command, crate_version, value_parser};
use log::debug;

pub fn create_app() -> Command {
  debug!("Creating CLAP app configuration");
  Command::new("ambadec")
    .version(crate_version!())
    .author("Daniel V. <daniel@chaospixel.com>")
    .about("Decompress Ambarella bit-packed camera RAW files")
    .after_help(
      "Simplest case, guess the geometry from the file size:\n  \
       ambadec FILE1.RAW FILE2.RAW ...\n\
       Normal case, provide width and height:\n  \
       ambadec --size 3840 2880 FILE_IN.RAW\n\
       Hard case, also provide the pitch (truncated or odd files):\n  \
       ambadec --size 3840 2880 --pitch 3264 FILE_IN.RAW",
    )
    .arg(
      Arg::new("debug")
        .short('d')
        .action(ArgAction::Count)
        .help("Sets the level of debugging information"),
    )
    .arg(
      Arg::new("output")
        .short('o')
        .long("output")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("Output file (not usable with multiple inputs)"),
    )
    .arg(
      Arg::new("size")
        .short('s')
        .long("size")
        .num_args(2)
        .value_names(["WIDTH", "HEIGHT"])
        .value_parser(value_parser!(usize))
        .help("Image dimensions in pixels"),
    )
    .arg(
      Arg::new("pitch")
        .short('p')
        .long("pitch")
        .value_name("BYTES")
        .value_parser(value_parser!(usize))
        .help("Bytes per input row, padding included"),
    )
    .arg(
      Arg::new("FILE")
        .required(true)
        .num_args(1..)
        .value_parser(value_parser!(PathBuf))
        .help("Compressed input file(s)"),
    )
}
