use cvgl_image::{Image, ImageDtype, ImageError, ImageStorage, ImageStorageMut};

use super::{kernels, separable_filter_with_strategy};
use crate::border::BorderMode;
use crate::parallel::{self, ExecutionStrategy};

/// Blur an image using a box blur filter
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `kernel_size` - The size of the kernel (kernel_x, kernel_y).
///
/// PRECONDITION: `src` and `dst` must have the same shape.
pub fn box_blur<T, const C: usize, S1, S2>(
    src: &Image<T, C, S1>,
    dst: &mut Image<T, C, S2>,
    kernel_size: (usize, usize),
) -> Result<(), ImageError>
where
    T: ImageDtype,
    S1: ImageStorage<T>,
    S2: ImageStorageMut<T>,
{
    let kernel_x = kernels::box_blur_kernel_1d(kernel_size.0);
    let kernel_y = kernels::box_blur_kernel_1d(kernel_size.1);
    separable_filter_with_strategy(
        src,
        dst,
        &kernel_x,
        &kernel_y,
        BorderMode::Reflect101,
        ExecutionStrategy::default(),
    )
}

/// Blur an image using a gaussian blur filter
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `kernel_size` - The size of the kernel (kernel_x, kernel_y). Both must be odd.
/// * `sigma` - The sigma of the gaussian kernel, xy-ordered.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
pub fn gaussian_blur<T, const C: usize, S1, S2>(
    src: &Image<T, C, S1>,
    dst: &mut Image<T, C, S2>,
    kernel_size: (usize, usize),
    sigma: (f32, f32),
) -> Result<(), ImageError>
where
    T: ImageDtype,
    S1: ImageStorage<T>,
    S2: ImageStorageMut<T>,
{
    gaussian_blur_with_strategy(src, dst, kernel_size, sigma, ExecutionStrategy::default())
}

/// Blur an image using a gaussian blur filter with execution strategy control.
///
/// Borders are extrapolated with [`BorderMode::Reflect101`].
///
/// # Errors
///
/// Returns an error if a kernel size is even or zero, or the images have different sizes.
pub fn gaussian_blur_with_strategy<T, const C: usize, S1, S2>(
    src: &Image<T, C, S1>,
    dst: &mut Image<T, C, S2>,
    kernel_size: (usize, usize),
    sigma: (f32, f32),
    strategy: ExecutionStrategy,
) -> Result<(), ImageError>
where
    T: ImageDtype,
    S1: ImageStorage<T>,
    S2: ImageStorageMut<T>,
{
    if kernel_size.0 % 2 == 0 || kernel_size.1 % 2 == 0 {
        return Err(ImageError::InvalidKernelLength(
            kernel_size.0,
            kernel_size.1,
        ));
    }

    let kernel_x = kernels::gaussian_kernel_1d(kernel_size.0, sigma.0);
    let kernel_y = kernels::gaussian_kernel_1d(kernel_size.1, sigma.1);
    separable_filter_with_strategy(
        src,
        dst,
        &kernel_x,
        &kernel_y,
        BorderMode::Reflect101,
        strategy,
    )
}

/// Compute the first order image derivatives in x and y with a 3x3 Sobel operator.
///
/// The kernels are not normalized, so a step of height `h` produces a response of
/// up to `4 * h`. Borders are replicated.
///
/// # Arguments
///
/// * `src` - The source grayscale image.
/// * `dx` - The horizontal derivative, same size as `src`.
/// * `dy` - The vertical derivative, same size as `src`.
/// * `strategy` - The execution strategy.
pub fn spatial_gradient_i16<S1, S2, S3>(
    src: &Image<u8, 1, S1>,
    dx: &mut Image<i16, 1, S2>,
    dy: &mut Image<i16, 1, S3>,
    strategy: ExecutionStrategy,
) -> Result<(), ImageError>
where
    S1: ImageStorage<u8>,
    S2: ImageStorageMut<i16>,
    S3: ImageStorageMut<i16>,
{
    for grad in [dx.size(), dy.size()] {
        if src.size() != grad {
            return Err(ImageError::InvalidImageSize(
                src.cols(),
                src.rows(),
                grad.width,
                grad.height,
            ));
        }
    }

    if src.is_empty() {
        return Ok(());
    }

    let rows = src.rows();
    let cols = src.cols();
    let data = src.as_slice();

    // replicate border: clamp the neighbour rows and columns into the image
    let neighbours = |r: usize| {
        let prev = r.saturating_sub(1);
        let next = (r + 1).min(rows - 1);
        (
            &data[prev * cols..(prev + 1) * cols],
            &data[r * cols..(r + 1) * cols],
            &data[next * cols..(next + 1) * cols],
        )
    };

    parallel::for_each_row_mut(strategy, dx.as_slice_mut(), cols, |r, dx_row| {
        let (p, m, n) = neighbours(r);
        for (c, out) in dx_row.iter_mut().enumerate() {
            let cp = c.saturating_sub(1);
            let cn = (c + 1).min(cols - 1);
            let diff = |row: &[u8]| row[cn] as i16 - row[cp] as i16;
            *out = diff(p) + 2 * diff(m) + diff(n);
        }
    });

    parallel::for_each_row_mut(strategy, dy.as_slice_mut(), cols, |r, dy_row| {
        let (p, _, n) = neighbours(r);
        for (c, out) in dy_row.iter_mut().enumerate() {
            let cp = c.saturating_sub(1);
            let cn = (c + 1).min(cols - 1);
            let smooth = |row: &[u8]| row[cp] as i16 + 2 * row[c] as i16 + row[cn] as i16;
            *out = smooth(n) - smooth(p);
        }
    });

    Ok(())
}
