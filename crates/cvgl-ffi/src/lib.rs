#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! Every function takes caller-owned buffers as raw addresses plus dimensions,
//! borrows them for the duration of the call only and reports the outcome as a
//! [`CvglStatus`]. Panics never cross the boundary.
//!
//! The matching C declarations live in `include/cvgl.h`.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::slice;

use cvgl_image::{ImageError, ImageSize, ImageView, ImageViewMut, PixelFormat, RawFrame};
use cvgl_imgproc::edge_filter::{
    EdgeFilter, EdgeFilterConfig, EdgeFilterStatus, EdgePolarity,
};
use cvgl_imgproc::edges::GradientNorm;
use cvgl_imgproc::parallel::ExecutionStrategy;

/// Result code of every exported function.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CvglStatus {
    /// The output buffer was written.
    Ok = 0,
    /// The input had zero width or height; nothing was written.
    SkippedEmpty = 1,
    /// A required pointer was null.
    NullPointer = -1,
    /// The input and output dimensions do not match.
    InvalidSize = -2,
    /// The filter configuration was rejected.
    InvalidConfig = -3,
    /// The frame layout, stride or length is inconsistent.
    InvalidFrame = -4,
    /// The input and output buffers overlap.
    AliasedBuffers = -5,
    /// An unexpected internal failure.
    Internal = -6,
}

/// Pixel format code of a single gray plane.
pub const CVGL_PIXEL_FORMAT_GRAY8: u32 = 0;
/// Pixel format code of NV21 (Y plane followed by interleaved V/U).
pub const CVGL_PIXEL_FORMAT_NV21: u32 = 1;
/// Pixel format code of the luma plane of a YUV 4:2:0 image.
pub const CVGL_PIXEL_FORMAT_YUV420: u32 = 2;

/// Edge filter parameters as seen from C.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CvglEdgeFilterConfig {
    /// Size of the square gaussian kernel. Must be odd.
    pub kernel_size: u32,
    /// Standard deviation of the gaussian kernel. Non-positive values are derived from the kernel size.
    pub sigma: f32,
    /// Hysteresis low threshold.
    pub low_threshold: f32,
    /// Hysteresis high threshold.
    pub high_threshold: f32,
    /// Use `sqrt(dx² + dy²)` instead of `|dx| + |dy|`.
    pub l2_gradient: bool,
    /// Write edges as 0 on a 255 background.
    pub invert: bool,
    /// Spread the rows over the global thread pool.
    pub parallel: bool,
}

impl From<EdgeFilterConfig> for CvglEdgeFilterConfig {
    fn from(config: EdgeFilterConfig) -> Self {
        Self {
            kernel_size: u32::try_from(config.kernel_size).unwrap_or(u32::MAX),
            sigma: config.sigma,
            low_threshold: config.low_threshold,
            high_threshold: config.high_threshold,
            l2_gradient: config.gradient_norm == GradientNorm::L2,
            invert: config.polarity == EdgePolarity::BlackOnWhite,
            parallel: config.execution != ExecutionStrategy::Serial,
        }
    }
}

impl From<CvglEdgeFilterConfig> for EdgeFilterConfig {
    fn from(config: CvglEdgeFilterConfig) -> Self {
        Self {
            kernel_size: config.kernel_size as usize,
            sigma: config.sigma,
            low_threshold: config.low_threshold,
            high_threshold: config.high_threshold,
            gradient_norm: if config.l2_gradient {
                GradientNorm::L2
            } else {
                GradientNorm::L1
            },
            polarity: if config.invert {
                EdgePolarity::BlackOnWhite
            } else {
                EdgePolarity::WhiteOnBlack
            },
            execution: if config.parallel {
                ExecutionStrategy::Parallel
            } else {
                ExecutionStrategy::Serial
            },
        }
    }
}

impl From<EdgeFilterStatus> for CvglStatus {
    fn from(status: EdgeFilterStatus) -> Self {
        match status {
            EdgeFilterStatus::Processed => CvglStatus::Ok,
            EdgeFilterStatus::SkippedEmpty => CvglStatus::SkippedEmpty,
        }
    }
}

impl From<ImageError> for CvglStatus {
    fn from(err: ImageError) -> Self {
        match err {
            ImageError::InvalidRowStride(..) | ImageError::FrameBufferTooSmall(..) => {
                CvglStatus::InvalidFrame
            }
            ImageError::InvalidImageSize(..) | ImageError::InvalidChannelShape(..) => {
                CvglStatus::InvalidSize
            }
            _ => CvglStatus::Internal,
        }
    }
}

fn pixel_format(code: u32) -> Option<PixelFormat> {
    match code {
        CVGL_PIXEL_FORMAT_GRAY8 => Some(PixelFormat::Gray8),
        CVGL_PIXEL_FORMAT_NV21 => Some(PixelFormat::Nv21),
        CVGL_PIXEL_FORMAT_YUV420 => Some(PixelFormat::Yuv420),
        _ => None,
    }
}

fn overlaps(a: *const u8, a_len: usize, b: *const u8, b_len: usize) -> bool {
    let (a, b) = (a as usize, b as usize);
    a < b.saturating_add(b_len) && b < a.saturating_add(a_len)
}

fn build_filter(config: Option<CvglEdgeFilterConfig>) -> Result<EdgeFilter, CvglStatus> {
    let config = config.map(EdgeFilterConfig::from).unwrap_or_default();
    EdgeFilter::new(config).map_err(|err| {
        log::warn!("rejected edge filter config: {err}");
        CvglStatus::InvalidConfig
    })
}

fn guarded(f: impl FnOnce() -> Result<CvglStatus, CvglStatus>) -> CvglStatus {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(status)) | Ok(Err(status)) => status,
        Err(_) => {
            log::error!("panic caught at the C boundary");
            CvglStatus::Internal
        }
    }
}

/// # Safety
///
/// See [`cvgl_edge_filter_apply`].
unsafe fn apply_impl(
    config: Option<CvglEdgeFilterConfig>,
    src_ptr: *const u8,
    src_width: usize,
    src_height: usize,
    dst_ptr: *mut u8,
    dst_width: usize,
    dst_height: usize,
) -> Result<CvglStatus, CvglStatus> {
    let filter = build_filter(config)?;

    if src_width == 0 || src_height == 0 {
        return Ok(CvglStatus::SkippedEmpty);
    }

    if src_ptr.is_null() || dst_ptr.is_null() {
        return Err(CvglStatus::NullPointer);
    }

    if (src_width, src_height) != (dst_width, dst_height) {
        return Err(CvglStatus::InvalidSize);
    }

    let len = src_width
        .checked_mul(src_height)
        .ok_or(CvglStatus::InvalidSize)?;

    if overlaps(src_ptr, len, dst_ptr, len) {
        return Err(CvglStatus::AliasedBuffers);
    }

    let size = ImageSize {
        width: src_width,
        height: src_height,
    };

    // SAFETY: the caller guarantees both buffers hold `width * height` bytes and
    // stay valid for the call; they were checked to be non-null and disjoint.
    let (src, dst) = unsafe {
        (
            slice::from_raw_parts(src_ptr, len),
            slice::from_raw_parts_mut(dst_ptr, len),
        )
    };

    let src = ImageView::<u8, 1>::from_slice(size, src)?;
    let mut dst = ImageViewMut::<u8, 1>::from_slice_mut(size, dst)?;

    Ok(filter.apply(&src, &mut dst)?.into())
}

/// Returns the default edge filter configuration.
///
/// Gaussian blur 5x5 with sigma 1.5, Canny thresholds 50 and 150, L1 gradient,
/// white edges on black, serial execution.
#[no_mangle]
pub extern "C" fn cvgl_edge_filter_default_config() -> CvglEdgeFilterConfig {
    EdgeFilterConfig::default().into()
}

/// Runs the default edge filter on a tightly packed 8-bit gray image.
///
/// A zero width or height input returns [`CvglStatus::SkippedEmpty`] without
/// touching any pointer.
///
/// # Safety
///
/// `src_ptr` must be valid for reads and `dst_ptr` valid for writes of
/// `width * height` bytes for the duration of the call, unless the input is empty.
#[no_mangle]
pub unsafe extern "C" fn cvgl_edge_filter_apply(
    src_ptr: *const u8,
    src_width: usize,
    src_height: usize,
    dst_ptr: *mut u8,
    dst_width: usize,
    dst_height: usize,
) -> CvglStatus {
    guarded(|| unsafe {
        apply_impl(
            None, src_ptr, src_width, src_height, dst_ptr, dst_width, dst_height,
        )
    })
}

/// Runs the edge filter with an explicit configuration.
///
/// # Safety
///
/// `config` must point to a valid configuration. The buffers follow the rules of
/// [`cvgl_edge_filter_apply`].
#[no_mangle]
pub unsafe extern "C" fn cvgl_edge_filter_apply_with_config(
    config: *const CvglEdgeFilterConfig,
    src_ptr: *const u8,
    src_width: usize,
    src_height: usize,
    dst_ptr: *mut u8,
    dst_width: usize,
    dst_height: usize,
) -> CvglStatus {
    guarded(|| {
        // SAFETY: the caller guarantees a non-null `config` points to a valid value.
        let config = unsafe { config.as_ref() }.ok_or(CvglStatus::NullPointer)?;
        unsafe {
            apply_impl(
                Some(*config),
                src_ptr,
                src_width,
                src_height,
                dst_ptr,
                dst_width,
                dst_height,
            )
        }
    })
}

/// Runs the edge filter on the luma plane of a camera frame.
///
/// # Arguments
///
/// * `frame_ptr`, `frame_len` - The frame bytes in their native layout.
/// * `width`, `height` - The frame size in pixels.
/// * `row_stride` - Bytes between two consecutive luma rows.
/// * `format` - One of the `CVGL_PIXEL_FORMAT_*` codes.
/// * `dst_ptr`, `dst_width`, `dst_height` - The packed 8-bit output image.
/// * `config` - The filter configuration, or null for the default one.
///
/// # Safety
///
/// `frame_ptr` must be valid for reads of `frame_len` bytes, `dst_ptr` valid for
/// writes of `dst_width * dst_height` bytes and a non-null `config` must point to a
/// valid configuration, all for the duration of the call.
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn cvgl_process_frame(
    frame_ptr: *const u8,
    frame_len: usize,
    width: usize,
    height: usize,
    row_stride: usize,
    format: u32,
    dst_ptr: *mut u8,
    dst_width: usize,
    dst_height: usize,
    config: *const CvglEdgeFilterConfig,
) -> CvglStatus {
    guarded(|| {
        // SAFETY: the caller guarantees a non-null `config` points to a valid value.
        let config = unsafe { config.as_ref() }.copied();
        let filter = build_filter(config)?;

        let format = pixel_format(format).ok_or(CvglStatus::InvalidFrame)?;

        if width == 0 || height == 0 {
            return Ok(CvglStatus::SkippedEmpty);
        }

        if frame_ptr.is_null() || dst_ptr.is_null() {
            return Err(CvglStatus::NullPointer);
        }

        if (width, height) != (dst_width, dst_height) {
            return Err(CvglStatus::InvalidSize);
        }

        let dst_len = width.checked_mul(height).ok_or(CvglStatus::InvalidSize)?;

        if overlaps(frame_ptr, frame_len, dst_ptr, dst_len) {
            return Err(CvglStatus::AliasedBuffers);
        }

        // SAFETY: the caller guarantees the lengths; both pointers are non-null and
        // the regions are disjoint.
        let (frame_data, dst) = unsafe {
            (
                slice::from_raw_parts(frame_ptr, frame_len),
                slice::from_raw_parts_mut(dst_ptr, dst_len),
            )
        };

        let size = ImageSize { width, height };
        let frame = RawFrame::new(frame_data, size, format, row_stride)?;
        let mut dst = ImageViewMut::<u8, 1>::from_slice_mut(size, dst)?;

        Ok(filter.apply_frame(&frame, &mut dst)?.into())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ptr;

    fn step_image(width: usize, height: usize) -> Vec<u8> {
        (0..width * height)
            .map(|i| if i % width < width / 2 { 0 } else { 255 })
            .collect()
    }

    #[test]
    fn default_config_round_trip() {
        let config = cvgl_edge_filter_default_config();
        assert_eq!(config.kernel_size, 5);
        assert_eq!(config.sigma, 1.5);
        assert!(!config.l2_gradient && !config.invert && !config.parallel);
        assert_eq!(EdgeFilterConfig::from(config), EdgeFilterConfig::default());
    }

    #[test]
    fn apply_writes_edges() {
        let (w, h) = (16, 8);
        let src = step_image(w, h);
        let mut dst = vec![7u8; w * h];

        let status =
            unsafe { cvgl_edge_filter_apply(src.as_ptr(), w, h, dst.as_mut_ptr(), w, h) };

        assert_eq!(status, CvglStatus::Ok);
        assert!(dst.iter().all(|&v| v == 0 || v == 255));
        assert_eq!(dst.iter().filter(|&&v| v == 255).count(), h);
    }

    #[test]
    fn empty_input_ignores_pointers() {
        let status =
            unsafe { cvgl_edge_filter_apply(ptr::null(), 0, 10, ptr::null_mut(), 0, 0) };
        assert_eq!(status, CvglStatus::SkippedEmpty);
    }

    #[test]
    fn rejects_bad_arguments() {
        let (w, h) = (8, 8);
        let src = step_image(w, h);
        let mut dst = vec![3u8; w * h];

        let status = unsafe { cvgl_edge_filter_apply(ptr::null(), w, h, dst.as_mut_ptr(), w, h) };
        assert_eq!(status, CvglStatus::NullPointer);

        let status =
            unsafe { cvgl_edge_filter_apply(src.as_ptr(), w, h, dst.as_mut_ptr(), w - 1, h) };
        assert_eq!(status, CvglStatus::InvalidSize);
        assert!(dst.iter().all(|&v| v == 3));

        let status = unsafe {
            cvgl_edge_filter_apply(dst.as_ptr(), w, h, dst.as_mut_ptr(), w, h)
        };
        assert_eq!(status, CvglStatus::AliasedBuffers);

        let config = CvglEdgeFilterConfig {
            kernel_size: 4,
            ..cvgl_edge_filter_default_config()
        };
        let status = unsafe {
            cvgl_edge_filter_apply_with_config(&config, src.as_ptr(), w, h, dst.as_mut_ptr(), w, h)
        };
        assert_eq!(status, CvglStatus::InvalidConfig);

        let status = unsafe {
            cvgl_edge_filter_apply_with_config(
                ptr::null(),
                src.as_ptr(),
                w,
                h,
                dst.as_mut_ptr(),
                w,
                h,
            )
        };
        assert_eq!(status, CvglStatus::NullPointer);
    }

    #[test]
    fn inverted_config() {
        let (w, h) = (16, 8);
        let src = step_image(w, h);
        let mut normal = vec![0u8; w * h];
        let mut inverted = vec![0u8; w * h];

        let config = CvglEdgeFilterConfig {
            invert: true,
            ..cvgl_edge_filter_default_config()
        };

        unsafe {
            assert_eq!(
                cvgl_edge_filter_apply(src.as_ptr(), w, h, normal.as_mut_ptr(), w, h),
                CvglStatus::Ok
            );
            assert_eq!(
                cvgl_edge_filter_apply_with_config(
                    &config,
                    src.as_ptr(),
                    w,
                    h,
                    inverted.as_mut_ptr(),
                    w,
                    h
                ),
                CvglStatus::Ok
            );
        }

        assert!(normal.iter().zip(&inverted).all(|(&a, &b)| a == !b));
    }

    #[test]
    fn process_nv21_frame_with_stride() {
        let (w, h, stride) = (16, 8, 20);
        let luma = step_image(w, h);

        let mut frame = Vec::new();
        for row in luma.chunks_exact(w) {
            frame.extend_from_slice(row);
            frame.extend_from_slice(&[0u8; 4]);
        }
        frame.extend(std::iter::repeat(128u8).take(stride * h / 2));

        let mut from_frame = vec![0u8; w * h];
        let mut from_image = vec![0u8; w * h];

        unsafe {
            let status = cvgl_process_frame(
                frame.as_ptr(),
                frame.len(),
                w,
                h,
                stride,
                CVGL_PIXEL_FORMAT_NV21,
                from_frame.as_mut_ptr(),
                w,
                h,
                ptr::null(),
            );
            assert_eq!(status, CvglStatus::Ok);

            let status = cvgl_edge_filter_apply(luma.as_ptr(), w, h, from_image.as_mut_ptr(), w, h);
            assert_eq!(status, CvglStatus::Ok);
        }

        assert_eq!(from_frame, from_image);
    }

    #[test]
    fn process_frame_rejects_bad_layout() {
        let (w, h) = (8, 4);
        let frame = vec![0u8; w * h];
        let mut dst = vec![0u8; w * h];

        unsafe {
            // luma only, chroma plane missing
            let status = cvgl_process_frame(
                frame.as_ptr(),
                frame.len(),
                w,
                h,
                w,
                CVGL_PIXEL_FORMAT_NV21,
                dst.as_mut_ptr(),
                w,
                h,
                ptr::null(),
            );
            assert_eq!(status, CvglStatus::InvalidFrame);

            let status = cvgl_process_frame(
                frame.as_ptr(),
                frame.len(),
                w,
                h,
                w,
                42,
                dst.as_mut_ptr(),
                w,
                h,
                ptr::null(),
            );
            assert_eq!(status, CvglStatus::InvalidFrame);

            let status = cvgl_process_frame(
                frame.as_ptr(),
                frame.len(),
                w,
                h,
                w - 1,
                CVGL_PIXEL_FORMAT_GRAY8,
                dst.as_mut_ptr(),
                w,
                h,
                ptr::null(),
            );
            assert_eq!(status, CvglStatus::InvalidFrame);
        }
    }
}
