#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! ```
//! use cvgl::image::{Image, ImageSize};
//! use cvgl::imgproc::edge_filter;
//!
//! let src = Image::<u8, 1>::from_size_val(ImageSize { width: 32, height: 24 }, 128).unwrap();
//! let mut dst = Image::<u8, 1>::from_size_val(src.size(), 0).unwrap();
//!
//! edge_filter(&src, &mut dst).unwrap();
//! ```

#[doc(inline)]
pub use cvgl_image as image;

#[doc(inline)]
pub use cvgl_imgproc as imgproc;

#[doc(inline)]
pub use cvgl_io as io;
