#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// image representation for computer vision purposes.
pub mod image;

/// Error types for the image module.
pub mod error;

/// camera-native frame descriptors.
pub mod frame;

/// storage marker traits for owned and borrowed images.
pub mod storage;

pub use crate::error::ImageError;
pub use crate::frame::{PixelFormat, RawFrame};
pub use crate::image::{Image, ImageDtype, ImageSize, ImageView, ImageViewMut};
pub use crate::storage::{ImageStorage, ImageStorageMut};
