//! Library to decompress the fixed-ratio bit-packed RAW data produced by
//! Ambarella-based camera sensors (Xiaomi Yi, FF8SE and friends). Each
//! 27-byte block of the input expands to 32 linear 16-bit Bayer samples;
//! when no geometry is known, the image dimensions can usually be
//! recovered from the file size alone.
//!
//! # Example
//! ```rust,no_run
//! use std::fs::File;
//! use std::io::{BufReader, BufWriter};
//!
//! use ambaraw::FrameDecoder;
//!
//! fn main() -> ambaraw::Result<()> {
//!   let mut input = BufReader::new(File::open("image.RAW")?);
//!   let mut output = BufWriter::new(File::create("image_unc.raw")?);
//!
//!   let size = std::fs::metadata("image.RAW")?.len();
//!   let dim = ambaraw::dims::autodetect_dimensions(size, true)
//!     .first()
//!     .copied()
//!     .expect("give dimensions explicitly when autodetection fails");
//!
//!   let pitch = (size / dim.height as u64) as usize;
//!   FrameDecoder::new(dim.width, dim.height, pitch)?.decode_stream(&mut input, &mut output)?;
//!   Ok(())
//! }
//! ```

#![deny(unstable_features)]

pub mod bits;
pub mod dims;
pub mod frame;
pub mod packed;
pub mod pumps;

pub use dims::DimCandidate;
pub use frame::FrameDecoder;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AmbaError {
  #[error("Invalid geometry: {}", _0)]
  InvalidGeometry(String),

  #[error("I/O error: {}", _0)]
  Io(#[from] std::io::Error),

  #[error("{}", _0)]
  General(String),
}

pub type Result<T> = std::result::Result<T, AmbaError>;

impl From<String> for AmbaError {
  fn from(str: String) -> Self {
    Self::General(str)
  }
}

#[cfg(test)]
pub(crate) fn init_test_logger() {
  let _ = env_logger::builder().is_test(true).try_init();
}
