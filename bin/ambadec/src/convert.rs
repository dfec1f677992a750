// SPDX-License-Identifier: LGPL-2.1
// Copyright 2022 Daniel Vogelbacher <daniel@chaospixel.com>

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use ambaraw::dims::{autodetect_dimensions, known_camera_dim};
use ambaraw::{DimCandidate, FrameDecoder};
use clap::ArgMatches;
use log::{debug, warn};

use crate::{AppError, Result};

/// Convert all given input files.
pub fn convert(options: &ArgMatches) -> Result<()> {
  let files: Vec<PathBuf> = options.get_many::<PathBuf>("FILE").expect("FILE is required").cloned().collect();
  let out_override = options.get_one::<PathBuf>("output");

  if out_override.is_some() && files.len() > 1 {
    return Err(AppError::InvalidCmdSwitch("can't use --output with multiple input files".into()));
  }

  // 0 means unset, as if the option was not given at all
  let user_dim: Option<(usize, usize)> = options
    .get_many::<usize>("size")
    .map(|values| values.copied().collect::<Vec<_>>())
    .map(|wh| (wh[0], wh[1]))
    .filter(|(w, h)| *w > 0 && *h > 0);
  let user_pitch = options.get_one::<usize>("pitch").copied().filter(|p| *p > 0);

  for file in &files {
    let out_name = out_override.cloned().unwrap_or_else(|| default_output_name(file));
    convert_file(file, &out_name, user_dim, user_pitch)?;
  }
  Ok(())
}

/// Decode a single file, resolving geometry from the command line, the
/// known-camera table or the size-based solver, in that order.
fn convert_file(input: &Path, out_name: &Path, user_dim: Option<(usize, usize)>, user_pitch: Option<usize>) -> Result<()> {
  let fin = File::open(input).map_err(|e| AppError::FileOpen(input.to_path_buf(), e))?;
  let size = fin.metadata().map_err(|e| AppError::FileOpen(input.to_path_buf(), e))?.len();

  println!("**** input='{}' size={} --> output='{}'", input.display(), size, out_name.display());

  let candidates = autodetect_dimensions(size, true);
  report_candidates(size, &candidates);

  let (width, height) = user_dim
    .or_else(|| known_camera_dim(size).map(|dim| (dim.width, dim.height)))
    .or_else(|| candidates.first().map(|dim| (dim.width, dim.height)))
    .ok_or_else(|| AppError::General("could not guess dimensions from the file size, please give --size WIDTH HEIGHT".into()))?;

  let pitch_calc = (size / height as u64) as usize;
  let pitch = user_pitch.unwrap_or(pitch_calc);
  let decoder = FrameDecoder::new(width, height, pitch)?;

  if size == width as u64 * height as u64 * 2 {
    warn!("input file size equals width*height*2, are you sure the file is compressed at all?");
  }
  if pitch as u64 * height as u64 != size {
    warn!("input file size should be pitch*height! pitch_calculated={} pitch_used={}", pitch_calc, pitch);
  }

  println!(
    "using width={} height={} pitch={} (aspect={:.3} blocks={} extra={})",
    width,
    height,
    pitch,
    width as f32 / height as f32,
    decoder.blocks_per_row(),
    pitch as i64 - decoder.min_pitch() as i64
  );

  let fout = File::create(out_name).map_err(|e| AppError::FileOpen(out_name.to_path_buf(), e))?;
  let mut reader = BufReader::new(fin);
  let mut writer = BufWriter::new(fout);
  let truncated = decoder.decode_stream(&mut reader, &mut writer)?;
  writer.flush().map_err(AppError::Io)?;

  if truncated > 0 {
    warn!("{} of {} rows were truncated and zero-filled", truncated, height);
  }
  debug!("done with '{}'", input.display());
  Ok(())
}

fn report_candidates(size: u64, candidates: &[DimCandidate]) {
  if candidates.is_empty() {
    println!("AutoDim: size={} ==> no solutions for dimension found!", size);
  } else {
    println!("AutoDim: size={} #solutions={}", size, candidates.len());
    for cand in candidates {
      println!(
        "  aspect={:.3}: -size {} {} -pitch {}",
        cand.aspect(),
        cand.width,
        cand.height,
        size / cand.height as u64
      );
    }
  }
}

/// Derive the output name: a trailing `.raw`/`.RAW` becomes `_unc.raw`,
/// anything else gets the suffix appended.
fn default_output_name(input: &Path) -> PathBuf {
  let name = input.as_os_str().to_string_lossy();
  let base = match name.len() > 4 {
    true => match name.get(name.len() - 4..) {
      Some(ext) if ext.eq_ignore_ascii_case(".raw") => &name[..name.len() - 4],
      _ => &name[..],
    },
    false => &name[..],
  };
  PathBuf::from(format!("{}_unc.raw", base))
}
