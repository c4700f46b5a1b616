use cvgl_image::{Image, ImageError, ImageStorage, ImageStorageMut};

use crate::parallel::{self, ExecutionStrategy};

/// Convert an RGB8 image to grayscale using the formula:
///
/// Y = 77 * R + 150 * G + 29 * B
///
/// # Arguments
///
/// * `src` - The input RGB8 image.
/// * `dst` - The output grayscale image.
///
/// Precondition: the input and output images must have the same size.
///
/// # Example
///
/// ```
/// use cvgl_image::{Image, ImageSize};
/// use cvgl_imgproc::color::gray_from_rgb_u8;
///
/// let image = Image::<u8, 3>::new(
///     ImageSize {
///         width: 2,
///         height: 1,
///     },
///     vec![255, 255, 255, 255, 0, 0],
/// )
/// .unwrap();
///
/// let mut gray = Image::<u8, 1>::from_size_val(image.size(), 0).unwrap();
///
/// gray_from_rgb_u8(&image, &mut gray).unwrap();
///
/// assert_eq!(gray.as_slice(), &[255, 76]);
/// ```
pub fn gray_from_rgb_u8<S1, S2>(
    src: &Image<u8, 3, S1>,
    dst: &mut Image<u8, 1, S2>,
) -> Result<(), ImageError>
where
    S1: ImageStorage<u8>,
    S2: ImageStorageMut<u8>,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let cols = src.cols();
    let src_data = src.as_slice();

    parallel::for_each_row_mut(
        ExecutionStrategy::default(),
        dst.as_slice_mut(),
        cols,
        |r, dst_row| {
            let src_row = &src_data[r * cols * 3..(r + 1) * cols * 3];
            for (dst_pixel, src_pixel) in dst_row.iter_mut().zip(src_row.chunks_exact(3)) {
                let r = src_pixel[0] as u16;
                let g = src_pixel[1] as u16;
                let b = src_pixel[2] as u16;
                *dst_pixel = ((r * 77 + g * 150 + b * 29) >> 8) as u8;
            }
        },
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cvgl_image::ImageSize;

    #[test]
    fn gray_from_rgb_u8_primaries() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 4,
            height: 1,
        };

        #[rustfmt::skip]
        let image = Image::<u8, 3>::new(size, vec![
            0, 0, 0,
            0, 255, 0,
            0, 0, 255,
            128, 128, 128,
        ])?;

        let mut gray = Image::<u8, 1>::from_size_val(size, 0)?;
        gray_from_rgb_u8(&image, &mut gray)?;

        assert_eq!(gray.as_slice(), &[0, 149, 28, 128]);

        Ok(())
    }

    #[test]
    fn gray_from_rgb_u8_size_mismatch() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::from_size_val([2, 2].into(), 0)?;
        let mut gray = Image::<u8, 1>::from_size_val([2, 3].into(), 0)?;
        assert_eq!(
            gray_from_rgb_u8(&image, &mut gray),
            Err(ImageError::InvalidImageSize(2, 2, 2, 3))
        );
        Ok(())
    }
}
