// SPDX-License-Identifier: LGPL-2.1
// Copyright 2022 Daniel Vogelbacher <daniel@chaospixel.com>

use std::io::Cursor;

use ambaraw::FrameDecoder;
use ambaraw::bits::LEu16;
use ambaraw::packed::{BLOCK_BYTES, BLOCK_PIXELS};

fn check_md5_equal(data: &[u8], expected: &str) {
  assert_eq!(hex::encode(md5::compute(data).0), expected);
}

/// Two rows of one block each, hand-traced through the group/mantissa
/// layout and the Bayer interleave.
#[test]
fn synthetic_two_row_frame() -> std::result::Result<(), Box<dyn std::error::Error>> {
  let mut input: Vec<u8> = (1..=27).collect();
  input.extend((0..27).map(|i| (0x5A ^ (i * 17)) as u8));

  let dec = FrameDecoder::new(32, 2, BLOCK_BYTES)?;
  let mut out = Vec::new();
  let truncated = dec.decode_stream(&mut Cursor::new(&input), &mut out)?;
  assert_eq!(truncated, 0);
  assert_eq!(out.len(), 32 * 2 * 2);
  check_md5_equal(&out, "92c227709538f5ac5f6574827a84cbd3");

  #[rustfmt::skip]
  let row0: [u16; BLOCK_PIXELS] = [
    0, 40, 4, 64, 24, 2, 128, 14,
    8, 0, 36, 192, 32, 832, 66, 3584,
    60, 128, 0, 608, 68, 512, 16, 544,
    3072, 50, 2176, 80, 704, 98, 3072, 12,
  ];
  #[rustfmt::skip]
  let row1: [u16; BLOCK_PIXELS] = [
    344, 3648, 296, 3136, 384, 192, 88, 3840,
    704, 62, 1152, 112, 960, 44, 768, 60,
    82, 3840, 90, 5120, 40, 4736, 74, 4224,
    896, 256, 112, 1920, 352, 1920, 928, 7168,
  ];
  for (i, &expected) in row0.iter().chain(row1.iter()).enumerate() {
    assert_eq!(LEu16(&out, i * 2), expected, "sample {}", i);
  }
  Ok(())
}

/// A frame narrower than the block granularity: the last block of each
/// row contributes only `width % 32` samples.
#[test]
fn width_not_a_block_multiple() -> std::result::Result<(), Box<dyn std::error::Error>> {
  // width 48 -> 2 blocks per row, 16 alignment pixels dropped
  let mut row: Vec<u8> = (1..=27).collect();
  row.extend((1..=27).rev());
  let mut input = row.clone();
  input.extend(&row);

  let dec = FrameDecoder::new(48, 2, 2 * BLOCK_BYTES)?;
  assert_eq!(dec.blocks_per_row(), 2);

  let mut out = Vec::new();
  dec.decode_stream(&mut Cursor::new(&input), &mut out)?;
  assert_eq!(out.len(), 48 * 2 * 2);
  Ok(())
}

/// Decoding a stream of noise neither fails nor reads past the row
/// geometry; every sample stays in the representable range.
#[test]
fn garbage_input_is_total() -> std::result::Result<(), Box<dyn std::error::Error>> {
  let input: Vec<u8> = (0..4_u32 * 54).map(|i| (i.wrapping_mul(2654435761) >> 13) as u8).collect();

  let dec = FrameDecoder::new(64, 4, 54)?;
  let mut out = Vec::new();
  dec.decode_stream(&mut Cursor::new(&input), &mut out)?;
  assert_eq!(out.len(), 64 * 4 * 2);
  for i in 0..64_usize * 4 {
    assert!(LEu16(&out, i * 2) <= 16128);
  }
  Ok(())
}
