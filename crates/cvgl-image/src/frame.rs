use crate::{error::ImageError, image::ImageSize};

/// Pixel layout of a raw camera frame.
///
/// Every supported layout starts with a full resolution 8-bit luma plane, which is
/// what the edge filter consumes. The caller states the layout; it is never inferred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// Single 8-bit gray plane.
    Gray8,
    /// Y plane followed by an interleaved V/U plane at half vertical resolution.
    Nv21,
    /// The luma plane (plane 0) of a planar YUV 4:2:0 image such as Android's `YUV_420_888`.
    Yuv420,
}

impl PixelFormat {
    /// Minimum number of bytes a buffer with this layout must hold.
    ///
    /// The last row of a plane may be shorter than `row_stride`, as camera stacks
    /// commonly drop the trailing padding of the final row.
    pub fn required_len(&self, size: ImageSize, row_stride: usize) -> usize {
        if size.is_empty() {
            return 0;
        }

        let rows = match self {
            PixelFormat::Gray8 | PixelFormat::Yuv420 => size.height,
            PixelFormat::Nv21 => size.height + size.height.div_ceil(2),
        };

        row_stride * (rows - 1) + size.width
    }
}

/// A borrowed camera frame in its native layout.
///
/// # Examples
///
/// ```
/// use cvgl_image::{PixelFormat, RawFrame};
///
/// // 4x2 NV21 frame: 8 luma bytes followed by 4 chroma bytes
/// let data = [10u8, 11, 12, 13, 20, 21, 22, 23, 128, 128, 128, 128];
/// let frame = RawFrame::new(&data, [4, 2].into(), PixelFormat::Nv21, 4).unwrap();
///
/// assert_eq!(frame.luma_row(1), &[20, 21, 22, 23]);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct RawFrame<'a> {
    data: &'a [u8],
    size: ImageSize,
    format: PixelFormat,
    row_stride: usize,
}

impl<'a> RawFrame<'a> {
    /// Describe a caller-owned frame buffer.
    ///
    /// # Arguments
    ///
    /// * `data` - The frame bytes.
    /// * `size` - The size of the frame in pixels.
    /// * `format` - The pixel layout of `data`.
    /// * `row_stride` - Bytes between the starts of two consecutive luma rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the stride is smaller than the width or the buffer is too
    /// short for the declared layout.
    pub fn new(
        data: &'a [u8],
        size: ImageSize,
        format: PixelFormat,
        row_stride: usize,
    ) -> Result<Self, ImageError> {
        if !size.is_empty() && row_stride < size.width {
            return Err(ImageError::InvalidRowStride(row_stride, size.width));
        }

        let required = format.required_len(size, row_stride);
        if data.len() < required {
            return Err(ImageError::FrameBufferTooSmall(data.len(), required));
        }

        Ok(Self {
            data,
            size,
            format,
            row_stride,
        })
    }

    /// Describe a frame whose rows are tightly packed.
    pub fn packed(data: &'a [u8], size: ImageSize, format: PixelFormat) -> Result<Self, ImageError> {
        Self::new(data, size, format, size.width)
    }

    /// Get the size of the frame in pixels.
    #[inline]
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Get the declared pixel layout.
    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Get the luma row stride in bytes.
    #[inline]
    pub fn row_stride(&self) -> usize {
        self.row_stride
    }

    /// Returns true if the frame has zero width or zero height.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size.is_empty()
    }

    /// Get the raw frame bytes.
    #[inline]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.data
    }

    /// Get the `width` luma samples of row `y`, without the stride padding.
    ///
    /// PRECONDITION: `y < self.size().height`.
    #[inline]
    pub fn luma_row(&self, y: usize) -> &'a [u8] {
        let start = y * self.row_stride;
        &self.data[start..start + self.size.width]
    }
}
