// SPDX-License-Identifier: LGPL-2.1
// Copyright 2022 Daniel Vogelbacher <daniel@chaospixel.com>

//! Image dimension recovery from a bare byte count.
//!
//! Compressed sensor dumps carry no geometry metadata, but the byte count
//! constrains it: the count represents `width * height * 2` bytes of
//! uncompressed-equivalent samples (scaled by the 27/64 block compression
//! when the dump is compressed), widths are multiples of 16 and heights
//! multiples of 8. Factoring the count under a handful of aspect-ratio
//! hypotheses usually pins down the true geometry.

use log::{debug, info};

/// Width modulus observed across sensor configurations.
pub const DIM_XMOD: u64 = 16;
/// Height modulus observed across sensor configurations.
pub const DIM_YMOD: u64 = 8;

/// Aspect ratios worth probing: roughly 4:3, 16:9, 1.90:1 and square.
const ASPECT_HYPOTHESES: [f32; 4] = [1.32, 1.75, 1.90, 1.00];

/// Compressed bytes per block over bytes for 32 uncompressed u16 samples.
const COMPRESSED_RATIO: f32 = 27.0 / 64.0;

/// Aspect ratio preferred when several candidates survive.
const PREFERRED_ASPECT: f32 = 4.0 / 3.0;

/// A (width, height) pair consistent with a total byte count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimCandidate {
  pub width: usize,
  pub height: usize,
}

impl DimCandidate {
  pub fn aspect(&self) -> f32 {
    self.width as f32 / self.height as f32
  }
}

/// Factor `size` into a width/height pair under one aspect hypothesis.
fn guess_dim_from_size(size: u64, xmod: u64, ymod: u64, aspect: f32) -> Option<DimCandidate> {
  if size & 1 == 1 {
    return None; // not a whole number of u16 samples
  }
  let units = size / 2;
  if units % (xmod * ymod) != 0 {
    return None;
  }
  let units = units / (xmod * ymod);

  let mut ay = ((size as f32 / 2.0 / aspect).sqrt() / ymod as f32) as u64 + 2;
  // Search downward only: a deliberate tie-break toward higher aspect
  // ratios, not a bug. Terminates at ay == 1 at the latest.
  while units % ay != 0 {
    ay -= 1;
  }
  let ax = units / ay;

  let width = ax * xmod;
  let height = ay * ymod;
  (ax > 1 && ay > 1 && width * height * 2 == size).then_some(DimCandidate {
    width: width as usize,
    height: height as usize,
  })
}

/// Recover plausible image dimensions from a raw byte count.
///
/// Probes every aspect hypothesis, drops duplicate solutions, rescales
/// widths of compressed dumps back to pixels (re-aligned to the 32-pixel
/// block granularity) and ranks the survivors by closeness to 4:3, first
/// found winning ties. An empty result is a valid outcome; the caller
/// must then get dimensions from the user.
pub fn autodetect_dimensions(size: u64, compressed: bool) -> Vec<DimCandidate> {
  let scale = if compressed { COMPRESSED_RATIO } else { 1.0 };

  let mut found: Vec<DimCandidate> = Vec::with_capacity(ASPECT_HYPOTHESES.len());
  for aspect in ASPECT_HYPOTHESES {
    if let Some(cand) = guess_dim_from_size(size, DIM_XMOD, DIM_YMOD, aspect * scale) {
      if !found.contains(&cand) {
        found.push(cand);
      }
    }
  }

  if compressed {
    // Undo the 27/64 byte accounting on the width axis.
    for cand in &mut found {
      cand.width = (2 * cand.width / 27) * 32;
    }
  }

  found.sort_by(|a, b| {
    let da = (a.aspect() - PREFERRED_ASPECT).abs();
    let db = (b.aspect() - PREFERRED_ASPECT).abs();
    da.total_cmp(&db)
  });

  if found.is_empty() {
    info!("AutoDim: size={} no solutions found", size);
  } else {
    info!("AutoDim: size={} #solutions={}", size, found.len());
    for cand in &found {
      debug!(
        "  aspect={:.3}: -size {} {} -pitch {}",
        cand.aspect(),
        cand.width,
        cand.height,
        size / cand.height as u64
      );
    }
  }

  found
}

/// Dumps from cameras seen in the wild, by exact byte count.
///
/// The solver recovers all of these on its own; the table just keeps the
/// historically verified answers authoritative.
#[rustfmt::skip]
const KNOWN_CAMERA_SIZES: [(u64, DimCandidate); 4] = [
  (13492224, DimCandidate { width: 4608, height: 3456 }), // Xiaomi Yi
  ( 9400320, DimCandidate { width: 3840, height: 2880 }), // FF8SE (A12)
  (10176000, DimCandidate { width: 4000, height: 3000 }), // FF8SE (A12)
  (10368000, DimCandidate { width: 4096, height: 3000 }), // FF8SE (A12)
];

/// Look up a byte count in the verified camera table.
pub fn known_camera_dim(size: u64) -> Option<DimCandidate> {
  KNOWN_CAMERA_SIZES.iter().find(|(n, _)| *n == size).map(|(_, dim)| *dim)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn xiaomi_yi_size_resolves() -> std::result::Result<(), Box<dyn std::error::Error>> {
    crate::init_test_logger();
    let found = autodetect_dimensions(13492224, true);
    assert_eq!(found.first(), Some(&DimCandidate { width: 4608, height: 3456 }));
    // the other survivors, ranked by distance from 4:3
    assert_eq!(
      found,
      [
        DimCandidate { width: 4608, height: 3456 },
        DimCandidate { width: 4096, height: 3904 },
        DimCandidate { width: 5440, height: 2928 },
        DimCandidate { width: 6912, height: 2304 },
      ]
    );
    Ok(())
  }

  #[test]
  fn known_table_sizes_resolve_to_table_answer() -> std::result::Result<(), Box<dyn std::error::Error>> {
    crate::init_test_logger();
    for (size, dim) in KNOWN_CAMERA_SIZES {
      assert_eq!(known_camera_dim(size), Some(dim));
      assert_eq!(autodetect_dimensions(size, true).first(), Some(&dim));
    }
    assert_eq!(known_camera_dim(42), None);
    Ok(())
  }

  #[test]
  fn odd_size_has_no_solution() -> std::result::Result<(), Box<dyn std::error::Error>> {
    crate::init_test_logger();
    assert!(autodetect_dimensions(13492225, true).is_empty());
    Ok(())
  }

  #[test]
  fn size_not_divisible_by_moduli_has_no_solution() -> std::result::Result<(), Box<dyn std::error::Error>> {
    crate::init_test_logger();
    // even, but size/2 is not a multiple of 16*8
    assert!(autodetect_dimensions(1000002, true).is_empty());
    Ok(())
  }

  #[test]
  fn uncompressed_size_resolves_unscaled() -> std::result::Result<(), Box<dyn std::error::Error>> {
    crate::init_test_logger();
    let found = autodetect_dimensions(4608 * 3456 * 2, false);
    assert_eq!(found.first(), Some(&DimCandidate { width: 4608, height: 3456 }));
    Ok(())
  }

  #[test]
  fn candidates_verify_byte_accounting() -> std::result::Result<(), Box<dyn std::error::Error>> {
    crate::init_test_logger();
    // pre-correction invariant: width * height * 2 == size holds for
    // every uncompressed solve
    for size in [9400320_u64, 10176000, 31850496] {
      for cand in autodetect_dimensions(size, false) {
        assert_eq!(cand.width as u64 * cand.height as u64 * 2, size);
        assert_eq!(cand.width as u64 % DIM_XMOD, 0);
        assert_eq!(cand.height as u64 % DIM_YMOD, 0);
      }
    }
    Ok(())
  }
}
