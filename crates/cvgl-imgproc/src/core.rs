use cvgl_image::{Image, ImageError, ImageStorage, ImageStorageMut};

use crate::parallel::{self, ExecutionStrategy};

/// Invert every bit of an image.
///
/// For a binary edge map this swaps the polarity: 255 becomes 0 and 0 becomes 255.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `dst` - The output image, same size as `src`. It may not alias `src`.
///
/// # Example
///
/// ```
/// use cvgl_image::{Image, ImageSize};
/// use cvgl_imgproc::core::bitwise_not;
///
/// let image = Image::<u8, 1>::new(
///     ImageSize {
///         width: 3,
///         height: 1,
///     },
///     vec![0, 255, 15],
/// )
/// .unwrap();
///
/// let mut inverted = Image::<u8, 1>::from_size_val(image.size(), 0).unwrap();
/// bitwise_not(&image, &mut inverted).unwrap();
///
/// assert_eq!(inverted.as_slice(), &[255, 0, 240]);
/// ```
pub fn bitwise_not<const C: usize, S1, S2>(
    src: &Image<u8, C, S1>,
    dst: &mut Image<u8, C, S2>,
) -> Result<(), ImageError>
where
    S1: ImageStorage<u8>,
    S2: ImageStorageMut<u8>,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }

    parallel::iter_rows_val(
        ExecutionStrategy::default(),
        src.as_slice(),
        dst.as_slice_mut(),
        src.cols() * C,
        |&s, d| *d = !s,
    );

    Ok(())
}

/// Invert every bit of an image in place.
pub fn bitwise_not_inplace<const C: usize, S>(img: &mut Image<u8, C, S>)
where
    S: ImageStorageMut<u8>,
{
    img.as_slice_mut().iter_mut().for_each(|v| *v = !*v);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitwise_not_is_involution() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::new([2, 2].into(), (0..12).map(|v| v * 20).collect())?;

        let mut once = Image::<u8, 3>::from_size_val(image.size(), 0)?;
        bitwise_not(&image, &mut once)?;
        assert!(once
            .as_slice()
            .iter()
            .zip(image.as_slice())
            .all(|(&a, &b)| a == 255 - b));

        bitwise_not_inplace(&mut once);
        assert_eq!(once.as_slice(), image.as_slice());

        Ok(())
    }

    #[test]
    fn test_bitwise_not_size_mismatch() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val([2, 2].into(), 0)?;
        let mut dst = Image::<u8, 1>::from_size_val([1, 2].into(), 0)?;
        assert_eq!(
            bitwise_not(&image, &mut dst),
            Err(ImageError::InvalidImageSize(2, 2, 1, 2))
        );
        Ok(())
    }
}
