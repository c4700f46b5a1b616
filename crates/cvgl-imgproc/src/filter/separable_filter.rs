use cvgl_image::{Image, ImageDtype, ImageError, ImageStorage, ImageStorageMut};

use crate::border::BorderMode;
use crate::parallel::{self, ExecutionStrategy};

/// A separable 2D filter that applies horizontal and vertical 1D convolutions sequentially.
///
/// The border lookups are resolved once per filter so that the inner loops only
/// deal with valid indices.
struct SeparableFilter<'k> {
    kernel_x: &'k [f32],
    kernel_y: &'k [f32],
    // per output column, the source column of each kernel tap (None: outside, constant border)
    cols_table: Vec<Option<usize>>,
    // per output row, the source row of each kernel tap
    rows_table: Vec<Option<usize>>,
}

impl<'k> SeparableFilter<'k> {
    fn new(
        kernel_x: &'k [f32],
        kernel_y: &'k [f32],
        rows: usize,
        cols: usize,
        border: BorderMode,
    ) -> Self {
        let half_x = (kernel_x.len() / 2) as isize;
        let half_y = (kernel_y.len() / 2) as isize;

        let cols_table = (0..cols)
            .flat_map(|c| {
                (0..kernel_x.len())
                    .map(move |i| border.map_index(c as isize + i as isize - half_x, cols))
            })
            .collect();

        let rows_table = (0..rows)
            .flat_map(|r| {
                (0..kernel_y.len())
                    .map(move |i| border.map_index(r as isize + i as isize - half_y, rows))
            })
            .collect();

        Self {
            kernel_x,
            kernel_y,
            cols_table,
            rows_table,
        }
    }

    /// Horizontal filtering into a f32 buffer followed by vertical filtering into `dst`.
    fn apply<T: ImageDtype, const C: usize>(
        &self,
        src: &[T],
        dst: &mut [T],
        cols: usize,
        strategy: ExecutionStrategy,
    ) {
        let row_len = cols * C;
        let kx = self.kernel_x.len();
        let ky = self.kernel_y.len();

        let mut temp = vec![0.0f32; src.len()];

        // horizontal
        parallel::for_each_row_mut(strategy, &mut temp, row_len, |r, temp_row| {
            let src_row = &src[r * row_len..(r + 1) * row_len];
            for c in 0..cols {
                let mut acc = [0.0f32; C];
                let taps = &self.cols_table[c * kx..(c + 1) * kx];
                for (&k, &x) in self.kernel_x.iter().zip(taps.iter()) {
                    let Some(x) = x else {
                        continue;
                    };
                    let px = &src_row[x * C..(x + 1) * C];
                    for (acc_val, &v) in acc.iter_mut().zip(px.iter()) {
                        *acc_val += v.to_f32() * k;
                    }
                }
                temp_row[c * C..(c + 1) * C].copy_from_slice(&acc);
            }
        });

        // vertical
        let temp = temp.as_slice();
        parallel::for_each_row_mut(strategy, dst, row_len, |r, dst_row| {
            let mut acc_row = vec![0.0f32; row_len];
            let taps = &self.rows_table[r * ky..(r + 1) * ky];
            for (&k, &y) in self.kernel_y.iter().zip(taps.iter()) {
                let Some(y) = y else {
                    continue;
                };
                let temp_row = &temp[y * row_len..(y + 1) * row_len];
                for (acc_val, &v) in acc_row.iter_mut().zip(temp_row.iter()) {
                    *acc_val += v * k;
                }
            }
            for (d, &acc_val) in dst_row.iter_mut().zip(acc_row.iter()) {
                *d = T::from_f32(acc_val);
            }
        });
    }
}

/// Apply a separable filter with border and execution strategy control.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `kernel_x` - The horizontal kernel.
/// * `kernel_y` - The vertical kernel.
/// * `border` - How samples outside the image are extrapolated.
/// * `strategy` - Execution strategy: `Serial`, `Parallel`, or `Auto`.
///
/// # Errors
///
/// Returns an error if a kernel is empty or the images have different sizes.
pub fn separable_filter_with_strategy<T, const C: usize, S1, S2>(
    src: &Image<T, C, S1>,
    dst: &mut Image<T, C, S2>,
    kernel_x: &[f32],
    kernel_y: &[f32],
    border: BorderMode,
    strategy: ExecutionStrategy,
) -> Result<(), ImageError>
where
    T: ImageDtype,
    S1: ImageStorage<T>,
    S2: ImageStorageMut<T>,
{
    if kernel_x.is_empty() || kernel_y.is_empty() {
        return Err(ImageError::InvalidKernelLength(
            kernel_x.len(),
            kernel_y.len(),
        ));
    }

    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    if src.is_empty() {
        return Ok(());
    }

    let filter = SeparableFilter::new(kernel_x, kernel_y, src.rows(), src.cols(), border);
    filter.apply::<T, C>(src.as_slice(), dst.as_slice_mut(), src.cols(), strategy);

    Ok(())
}

/// Apply a separable filter to an image.
///
/// Uses reflect-101 borders and runs on the calling thread.
/// For explicit control, use [`separable_filter_with_strategy`].
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `kernel_x` - The horizontal kernel.
/// * `kernel_y` - The vertical kernel.
pub fn separable_filter<T, const C: usize, S1, S2>(
    src: &Image<T, C, S1>,
    dst: &mut Image<T, C, S2>,
    kernel_x: &[f32],
    kernel_y: &[f32],
) -> Result<(), ImageError>
where
    T: ImageDtype,
    S1: ImageStorage<T>,
    S2: ImageStorageMut<T>,
{
    separable_filter_with_strategy(
        src,
        dst,
        kernel_x,
        kernel_y,
        BorderMode::default(),
        ExecutionStrategy::default(),
    )
}
