use std::time::Instant;

use cvgl_image::{Image, ImageError, ImageStorage, ImageStorageMut, ImageView, RawFrame};
use serde::{Deserialize, Serialize};

use crate::color::gray_from_frame;
use crate::core::bitwise_not_inplace;
use crate::edges::{canny, GradientNorm};
use crate::filter::{gaussian_blur_with_strategy, kernels};
use crate::parallel::ExecutionStrategy;

/// Which value marks an edge pixel in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgePolarity {
    /// Edges are 255 on a 0 background.
    #[default]
    WhiteOnBlack,
    /// Edges are 0 on a 255 background.
    BlackOnWhite,
}

/// Outcome of a successful edge filter call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeFilterStatus {
    /// The output was fully written.
    Processed,
    /// The input was empty and the output was left untouched.
    SkippedEmpty,
}

/// An error in the edge filter configuration.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum EdgeFilterError {
    /// The gaussian kernel size is even or zero.
    #[error("Invalid kernel size {0}, it must be odd and at least 1")]
    InvalidKernelSize(usize),

    /// The gaussian sigma is not a finite number.
    #[error("Invalid sigma {0}, it must be finite")]
    InvalidSigma(f32),

    /// A hysteresis threshold is negative or not finite.
    #[error("Invalid threshold {0}, it must be finite and non-negative")]
    InvalidThreshold(f32),

    /// Error in the image buffers.
    #[error(transparent)]
    Image(#[from] ImageError),
}

/// Parameters of the edge filter.
///
/// Every field is optional when deserializing; missing fields take the default value.
///
/// # Example
///
/// ```
/// use cvgl_imgproc::edge_filter::{EdgeFilterConfig, EdgePolarity};
///
/// let config: EdgeFilterConfig =
///     serde_json::from_str(r#"{ "high_threshold": 120, "polarity": "black_on_white" }"#).unwrap();
///
/// assert_eq!(config.kernel_size, 5);
/// assert_eq!(config.high_threshold, 120.0);
/// assert_eq!(config.polarity, EdgePolarity::BlackOnWhite);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EdgeFilterConfig {
    /// Size of the square gaussian kernel. Must be odd.
    pub kernel_size: usize,
    /// Standard deviation of the gaussian kernel. Non-positive values are derived from the kernel size.
    pub sigma: f32,
    /// Hysteresis low threshold on the gradient magnitude.
    pub low_threshold: f32,
    /// Hysteresis high threshold on the gradient magnitude.
    pub high_threshold: f32,
    /// Norm of the gradient magnitude.
    pub gradient_norm: GradientNorm,
    /// Output polarity.
    pub polarity: EdgePolarity,
    /// How the rows of each stage are scheduled.
    pub execution: ExecutionStrategy,
}

impl Default for EdgeFilterConfig {
    fn default() -> Self {
        Self {
            kernel_size: 5,
            sigma: 1.5,
            low_threshold: 50.0,
            high_threshold: 150.0,
            gradient_norm: GradientNorm::L1,
            polarity: EdgePolarity::WhiteOnBlack,
            execution: ExecutionStrategy::Serial,
        }
    }
}

/// Gaussian blur followed by Canny edge detection on a grayscale image.
///
/// The filter holds no state besides its validated configuration, so one instance
/// can be reused for every frame. Each call allocates and drops its own
/// intermediate buffers.
///
/// # Example
///
/// ```
/// use cvgl_image::{Image, ImageSize};
/// use cvgl_imgproc::edge_filter::{EdgeFilter, EdgeFilterConfig, EdgeFilterStatus};
///
/// let filter = EdgeFilter::new(EdgeFilterConfig::default()).unwrap();
///
/// let src = Image::<u8, 1>::from_size_val(ImageSize { width: 8, height: 8 }, 128).unwrap();
/// let mut dst = Image::<u8, 1>::from_size_val(src.size(), 1).unwrap();
///
/// assert_eq!(filter.apply(&src, &mut dst).unwrap(), EdgeFilterStatus::Processed);
/// assert!(dst.as_slice().iter().all(|&v| v == 0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct EdgeFilter {
    config: EdgeFilterConfig,
}

impl EdgeFilter {
    /// Validate a configuration and create the filter.
    ///
    /// A non-positive sigma is replaced by the value derived from the kernel size,
    /// and a low threshold above the high threshold is swapped with it.
    ///
    /// # Errors
    ///
    /// Returns an error if the kernel size is even, the sigma is not finite, or a
    /// threshold is negative or not finite.
    pub fn new(config: EdgeFilterConfig) -> Result<Self, EdgeFilterError> {
        let mut config = config;

        if config.kernel_size % 2 == 0 {
            return Err(EdgeFilterError::InvalidKernelSize(config.kernel_size));
        }

        if !config.sigma.is_finite() {
            return Err(EdgeFilterError::InvalidSigma(config.sigma));
        }

        for threshold in [config.low_threshold, config.high_threshold] {
            if !threshold.is_finite() || threshold < 0.0 {
                return Err(EdgeFilterError::InvalidThreshold(threshold));
            }
        }

        if config.sigma <= 0.0 {
            config.sigma = kernels::sigma_from_kernel_size(config.kernel_size);
        }

        if config.low_threshold > config.high_threshold {
            log::warn!(
                "low threshold {} is above high threshold {}, swapping them",
                config.low_threshold,
                config.high_threshold
            );
            std::mem::swap(&mut config.low_threshold, &mut config.high_threshold);
        }

        log::debug!("edge filter configured: {config:?}");

        Ok(Self { config })
    }

    /// The effective configuration.
    pub fn config(&self) -> &EdgeFilterConfig {
        &self.config
    }

    /// Run the filter on a grayscale image.
    ///
    /// # Arguments
    ///
    /// * `src` - The input image. It is only read.
    /// * `dst` - The output edge map. Its previous content is overwritten.
    ///
    /// # Returns
    ///
    /// [`EdgeFilterStatus::SkippedEmpty`] if `src` has zero width or height, in which
    /// case `dst` is not touched. [`EdgeFilterStatus::Processed`] otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidImageSize`] if a non-empty `src` and `dst` have
    /// different sizes. Nothing is written to `dst` in that case.
    pub fn apply<S1, S2>(
        &self,
        src: &Image<u8, 1, S1>,
        dst: &mut Image<u8, 1, S2>,
    ) -> Result<EdgeFilterStatus, ImageError>
    where
        S1: ImageStorage<u8>,
        S2: ImageStorageMut<u8>,
    {
        if src.is_empty() {
            log::trace!("edge filter skipped empty {} input", src.size());
            return Ok(EdgeFilterStatus::SkippedEmpty);
        }

        if src.size() != dst.size() {
            return Err(ImageError::InvalidImageSize(
                src.cols(),
                src.rows(),
                dst.cols(),
                dst.rows(),
            ));
        }

        let start = Instant::now();
        let config = &self.config;

        let mut blurred = Image::<u8, 1>::from_size_val(src.size(), 0)?;
        gaussian_blur_with_strategy(
            src,
            &mut blurred,
            (config.kernel_size, config.kernel_size),
            (config.sigma, config.sigma),
            config.execution,
        )?;

        canny(
            &blurred,
            dst,
            config.low_threshold,
            config.high_threshold,
            config.gradient_norm,
            config.execution,
        )?;

        if config.polarity == EdgePolarity::BlackOnWhite {
            bitwise_not_inplace(dst);
        }

        log::trace!(
            "edge filter processed {} in {:?}",
            src.size(),
            start.elapsed()
        );

        Ok(EdgeFilterStatus::Processed)
    }

    /// Run the filter on the luma plane of a camera frame.
    ///
    /// Tightly packed frames are filtered in place, strided ones are copied to a
    /// temporary grayscale image first.
    ///
    /// # Errors
    ///
    /// Same as [`EdgeFilter::apply`].
    pub fn apply_frame<S>(
        &self,
        frame: &RawFrame<'_>,
        dst: &mut Image<u8, 1, S>,
    ) -> Result<EdgeFilterStatus, ImageError>
    where
        S: ImageStorageMut<u8>,
    {
        let size = frame.size();
        if frame.is_empty() {
            log::trace!("edge filter skipped empty {size} frame");
            return Ok(EdgeFilterStatus::SkippedEmpty);
        }

        if frame.row_stride() == size.width {
            let luma = ImageView::<u8, 1>::from_slice(size, &frame.as_bytes()[..size.num_pixels()])?;
            return self.apply(&luma, dst);
        }

        let mut gray = Image::<u8, 1>::from_size_val(size, 0)?;
        gray_from_frame(frame, &mut gray)?;
        self.apply(&gray, dst)
    }
}

/// Run the edge filter with the default configuration.
///
/// Gaussian blur with a 5x5 kernel and sigma 1.5, then Canny with thresholds 50
/// and 150. Edges are written as 255 on a 0 background.
///
/// See [`EdgeFilter::apply`] for the contract.
pub fn edge_filter<S1, S2>(
    src: &Image<u8, 1, S1>,
    dst: &mut Image<u8, 1, S2>,
) -> Result<EdgeFilterStatus, ImageError>
where
    S1: ImageStorage<u8>,
    S2: ImageStorageMut<u8>,
{
    EdgeFilter::default().apply(src, dst)
}
