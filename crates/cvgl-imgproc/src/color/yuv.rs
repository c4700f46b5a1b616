use cvgl_image::{Image, ImageError, ImageStorageMut, RawFrame};

/// Extract the grayscale image of a camera frame.
///
/// All supported [`cvgl_image::PixelFormat`]s carry a full resolution 8-bit luma
/// plane first, which is copied row by row without the stride padding. Chroma
/// samples are ignored.
///
/// # Arguments
///
/// * `frame` - The camera frame in its declared layout.
/// * `dst` - The output grayscale image, same size as the frame.
///
/// # Example
///
/// ```
/// use cvgl_image::{Image, PixelFormat, RawFrame};
/// use cvgl_imgproc::color::gray_from_frame;
///
/// // 2x2 NV21 with a stride of 3 bytes
/// let data = [1u8, 2, 0, 3, 4, 0, 128, 128];
/// let frame = RawFrame::new(&data, [2, 2].into(), PixelFormat::Nv21, 3).unwrap();
///
/// let mut gray = Image::<u8, 1>::from_size_val(frame.size(), 0).unwrap();
/// gray_from_frame(&frame, &mut gray).unwrap();
///
/// assert_eq!(gray.as_slice(), &[1, 2, 3, 4]);
/// ```
pub fn gray_from_frame<S>(frame: &RawFrame<'_>, dst: &mut Image<u8, 1, S>) -> Result<(), ImageError>
where
    S: ImageStorageMut<u8>,
{
    if frame.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            frame.size().width,
            frame.size().height,
            dst.cols(),
            dst.rows(),
        ));
    }

    for y in 0..frame.size().height {
        dst.row_mut(y).copy_from_slice(frame.luma_row(y));
    }

    Ok(())
}
