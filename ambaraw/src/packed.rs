// SPDX-License-Identifier: LGPL-2.1
// Copyright 2022 Daniel Vogelbacher <daniel@chaospixel.com>

//! Unpacking of the Ambarella fixed-ratio block compression.
//!
//! The sensor packs 32 pixels into 27 bytes. A block is 8 groups, each
//! group being one 3-bit shared scale field followed by four 6-bit
//! mantissas: 8 * (3 + 4 * 6) = 216 bits = 27 bytes, no padding bits.
//! A pixel is reconstructed as `mantissa << (scale + 1)`, so samples
//! cover 0..=16128. After unpacking, the 32 samples are reordered into a
//! Bayer-aware interleave that groups pixels by color-filter phase.

use crate::pumps::{BitPump, BitPumpLSB};

/// Bytes per compressed block.
pub const BLOCK_BYTES: usize = 27;
/// Pixels decoded from one block.
pub const BLOCK_PIXELS: usize = 32;
/// Extra readable bytes a block buffer must carry beyond [BLOCK_BYTES].
///
/// The bit cursor refills in 32-bit words and may touch one byte past the
/// block, so callers hand in `27 * nblocks + 1` bytes (pad zeroed or not,
/// the pad never contributes to any sample).
pub const BLOCK_PAD: usize = 1;

/// Output position of each decode-order sample, alternating groups of 4
/// so pixels of the same color-filter phase land together.
///
/// Entry k is `(k/8)*8 + ((k/4) & 1) + (k&3)*2`, a bijection of 0..32.
#[rustfmt::skip]
const BAYER_INTERLEAVE: [usize; BLOCK_PIXELS] = [
   0,  2,  4,  6,   1,  3,  5,  7,
   8, 10, 12, 14,   9, 11, 13, 15,
  16, 18, 20, 22,  17, 19, 21, 23,
  24, 26, 28, 30,  25, 27, 29, 31,
];

/// Unpack one 27-byte block into 32 samples.
///
/// Total over any input: garbage bytes still decode to 32 in-range
/// samples. `src` must hold at least [BLOCK_BYTES] + [BLOCK_PAD] bytes.
pub fn decode_block27(src: &[u8]) -> [u16; BLOCK_PIXELS] {
  let mut pump = BitPumpLSB::new(src);
  let mut out = [0_u16; BLOCK_PIXELS];

  for group in 0..BLOCK_PIXELS / 4 {
    let shift = pump.get_bits(3) + 1;
    for sub in 0..4 {
      let mantissa = pump.get_bits(6) as u16;
      // The original compressor probably rounds; adding (1 << (shift - 1))
      // here might recover precision but is untested, keep it unrounded.
      out[BAYER_INTERLEAVE[group * 4 + sub]] = mantissa << shift;
    }
  }

  out
}

/// Unpack a row of consecutive blocks into `line`, trimming to the line
/// length.
///
/// Lines are padded to a multiple of 32 pixels in the compressed stream;
/// pixels past `line.len()` in the last block are alignment filler and
/// are dropped. `src` must hold `ceil(line.len() / 32) * 27 + 1` bytes.
pub fn decode_line27(src: &[u8], line: &mut [u16]) {
  debug_assert!(src.len() >= line.len().div_ceil(BLOCK_PIXELS) * BLOCK_BYTES + BLOCK_PAD);

  for (block, out) in line.chunks_mut(BLOCK_PIXELS).enumerate() {
    let samples = decode_block27(&src[block * BLOCK_BYTES..]);
    out.copy_from_slice(&samples[..out.len()]);
  }
}
