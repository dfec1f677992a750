// SPDX-License-Identifier: LGPL-2.1
// Copyright 2022 Daniel Vogelbacher <daniel@chaospixel.com>

//! Row-by-row frame assembly: reads compressed rows at a fixed pitch,
//! unpacks them and streams out little-endian u16 samples.

use std::io::{ErrorKind, Read, Write};

use byteorder::{LittleEndian, WriteBytesExt};
use log::warn;

use crate::packed::{self, BLOCK_BYTES, BLOCK_PAD, BLOCK_PIXELS};
use crate::{AmbaError, Result};

/// Streaming decoder for one frame of known geometry.
///
/// Owns no I/O; [decode_stream](Self::decode_stream) drives any
/// reader/writer pair. Rows are processed strictly in order through a
/// single reusable row buffer.
#[derive(Debug, Clone)]
pub struct FrameDecoder {
  width: usize,
  height: usize,
  pitch: usize,
  blocks: usize,
}

impl FrameDecoder {
  /// Validate the geometry and build a decoder.
  ///
  /// The sensor reads out two rows per color-filter cycle, so an odd
  /// height is rejected.
  pub fn new(width: usize, height: usize, pitch: usize) -> Result<Self> {
    if width == 0 || height == 0 {
      return Err(AmbaError::InvalidGeometry(format!("image size {}x{} must be positive", width, height)));
    }
    if height % 2 != 0 {
      return Err(AmbaError::InvalidGeometry(format!("height {} must be even", height)));
    }
    let blocks = width.div_ceil(BLOCK_PIXELS);
    if pitch == 0 {
      return Err(AmbaError::InvalidGeometry(format!("pitch must be positive, got {}", pitch)));
    }
    Ok(Self { width, height, pitch, blocks })
  }

  pub fn width(&self) -> usize {
    self.width
  }

  pub fn height(&self) -> usize {
    self.height
  }

  pub fn pitch(&self) -> usize {
    self.pitch
  }

  /// Blocks per row, width padded up to the 32-pixel granularity.
  pub fn blocks_per_row(&self) -> usize {
    self.blocks
  }

  /// Compressed bytes per row actually carrying pixel data; anything
  /// beyond this up to the pitch is stride padding.
  pub fn min_pitch(&self) -> usize {
    self.blocks * BLOCK_BYTES
  }

  /// Decode `height` rows from `input`, writing `width * height` samples
  /// to `output` low-byte-first.
  ///
  /// A row delivering fewer than `pitch` bytes is zero-filled and
  /// decoded anyway (warning per row); the decode never fails on
  /// truncated or garbage input. Returns the number of truncated rows.
  pub fn decode_stream(&self, input: &mut impl Read, output: &mut impl Write) -> Result<usize> {
    // One buffer serves every row; sized for pitch and block data plus
    // the pad byte the bit cursor may touch.
    let row_bytes = self.pitch.max(self.min_pitch());
    let mut rowbuf = vec![0_u8; row_bytes + BLOCK_PAD];
    let mut line = vec![0_u16; self.width];
    let mut truncated = 0_usize;

    for row in 0..self.height {
      let got = read_until_eof(input, &mut rowbuf[..self.pitch])?;
      if got < self.pitch {
        warn!("row {}: truncated, got {} of {} bytes, zero-filling the rest", row, got, self.pitch);
        rowbuf[got..].fill(0);
        truncated += 1;
      }
      packed::decode_line27(&rowbuf, &mut line);
      for sample in &line {
        output.write_u16::<LittleEndian>(*sample)?;
      }
    }

    Ok(truncated)
  }
}

/// Fill `buf` from `reader`, stopping early only at EOF.
fn read_until_eof(reader: &mut impl Read, buf: &mut [u8]) -> std::io::Result<usize> {
  let mut got = 0;
  while got < buf.len() {
    match reader.read(&mut buf[got..]) {
      Ok(0) => break,
      Ok(n) => got += n,
      Err(e) if e.kind() == ErrorKind::Interrupted => continue,
      Err(e) => return Err(e),
    }
  }
  Ok(got)
}
