#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for I/O operations.
pub mod error;

/// Frame rate counter for repeated processing loops.
pub mod fps_counter;

/// High-level image reading functions.
///
/// See [`functional::read_image_any_mono8`] for automatic format detection.
pub mod functional;

/// JPEG image encoding.
pub mod jpeg;

/// PNG image encoding and decoding.
pub mod png;

pub use crate::error::IoError;
