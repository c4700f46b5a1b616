#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// border extrapolation module.
pub mod border;

/// color transformations module.
pub mod color;

/// image basic operations module.
pub mod core;

/// gaussian blur followed by canny edge detection.
pub mod edge_filter;

/// edge detection module.
pub mod edges;

/// image filtering module.
pub mod filter;

/// module containing parallization utilities.
pub mod parallel;

pub use edge_filter::{
    edge_filter, EdgeFilter, EdgeFilterConfig, EdgeFilterError, EdgeFilterStatus, EdgePolarity,
};
