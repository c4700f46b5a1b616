use cvgl_image::{Image, ImageError, ImageStorage, ImageStorageMut};
use serde::{Deserialize, Serialize};

use crate::filter::spatial_gradient_i16;
use crate::parallel::{self, ExecutionStrategy};

/// Label of a pixel that is not a local maximum or is below the low threshold.
pub const NOT_EDGE: u8 = 0;

/// Label of a local maximum between the low and the high threshold.
pub const WEAK_EDGE: u8 = 1;

/// Label of a local maximum above the high threshold.
pub const STRONG_EDGE: u8 = 2;

// tan(22.5°) and tan(67.5°), the bounds of the four gradient direction sectors
const TAN_22_5: f32 = 0.414_213_56;
const TAN_67_5: f32 = 2.414_213_6;

/// Norm used to compute the gradient magnitude from the image derivatives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientNorm {
    /// `|dx| + |dy|`
    #[default]
    L1,
    /// `sqrt(dx² + dy²)`
    L2,
}

impl GradientNorm {
    /// Compute the gradient magnitude of a single pixel.
    #[inline]
    pub fn magnitude(&self, dx: i16, dy: i16) -> f32 {
        match self {
            GradientNorm::L1 => ((dx as i32).abs() + (dy as i32).abs()) as f32,
            GradientNorm::L2 => (dx as f32).hypot(dy as f32),
        }
    }
}

/// Thin the gradient magnitude to one pixel wide ridges and classify the survivors.
///
/// The gradient direction of every pixel is quantized into horizontal, vertical or
/// one of the two diagonals. A pixel survives when its magnitude is above
/// `low_threshold` and is a local maximum along that direction. Survivors are
/// labelled [`STRONG_EDGE`] if the magnitude is above `high_threshold` and
/// [`WEAK_EDGE`] otherwise. Every other pixel is labelled [`NOT_EDGE`].
///
/// Ties between two neighbours along the direction are resolved towards the
/// pixel with the smaller index, so a plateau of width two yields a single pixel.
///
/// # Arguments
///
/// * `dx` - The horizontal derivative.
/// * `dy` - The vertical derivative.
/// * `labels` - The output labels, same size as the derivatives.
/// * `low_threshold` - Minimum magnitude of an edge pixel.
/// * `high_threshold` - Minimum magnitude of a strong edge pixel.
/// * `norm` - The gradient magnitude norm.
/// * `strategy` - The execution strategy.
pub fn non_maximum_suppression<S1, S2, S3>(
    dx: &Image<i16, 1, S1>,
    dy: &Image<i16, 1, S2>,
    labels: &mut Image<u8, 1, S3>,
    low_threshold: f32,
    high_threshold: f32,
    norm: GradientNorm,
    strategy: ExecutionStrategy,
) -> Result<(), ImageError>
where
    S1: ImageStorage<i16>,
    S2: ImageStorage<i16>,
    S3: ImageStorageMut<u8>,
{
    for other in [dy.size(), labels.size()] {
        if dx.size() != other {
            return Err(ImageError::InvalidImageSize(
                dx.cols(),
                dx.rows(),
                other.width,
                other.height,
            ));
        }
    }

    if dx.is_empty() {
        return Ok(());
    }

    let cols = dx.cols();
    let rows = dx.rows();
    let gx = dx.as_slice();
    let gy = dy.as_slice();

    // magnitude with a ring of zeros, so that every pixel has 8 neighbours
    let stride = cols + 2;
    let mut mag = vec![0.0f32; stride * (rows + 2)];
    parallel::for_each_row_mut(strategy, &mut mag, stride, |r, mag_row| {
        if r == 0 || r > rows {
            return;
        }
        let y = r - 1;
        let gx_row = &gx[y * cols..(y + 1) * cols];
        let gy_row = &gy[y * cols..(y + 1) * cols];
        for ((m, &vx), &vy) in mag_row[1..=cols].iter_mut().zip(gx_row).zip(gy_row) {
            *m = norm.magnitude(vx, vy);
        }
    });

    let mag = mag.as_slice();
    parallel::for_each_row_mut(strategy, labels.as_slice_mut(), cols, |y, label_row| {
        let prev = &mag[y * stride..(y + 1) * stride];
        let curr = &mag[(y + 1) * stride..(y + 2) * stride];
        let next = &mag[(y + 2) * stride..(y + 3) * stride];
        let gx_row = &gx[y * cols..(y + 1) * cols];
        let gy_row = &gy[y * cols..(y + 1) * cols];

        for (x, label) in label_row.iter_mut().enumerate() {
            let j = x + 1;
            let m = curr[j];

            *label = NOT_EDGE;
            if m <= low_threshold {
                continue;
            }

            let (vx, vy) = (gx_row[x], gy_row[x]);
            let ax = (vx as f32).abs();
            let ay = (vy as f32).abs();

            let is_max = if ay < ax * TAN_22_5 {
                m > curr[j - 1] && m >= curr[j + 1]
            } else if ay > ax * TAN_67_5 {
                m > prev[j] && m >= next[j]
            } else if (vx < 0) != (vy < 0) {
                m > prev[j + 1] && m > next[j - 1]
            } else {
                m > prev[j - 1] && m > next[j + 1]
            };

            if is_max {
                *label = if m > high_threshold {
                    STRONG_EDGE
                } else {
                    WEAK_EDGE
                };
            }
        }
    });

    Ok(())
}

/// Promote weak edges connected to strong edges and binarize the result.
///
/// Connectivity is 8-neighbourhood. Pixels that end up strong are written as 255,
/// every other pixel as 0.
///
/// # Arguments
///
/// * `labels` - Labels produced by [`non_maximum_suppression`].
/// * `dst` - The binary edge map, same size as `labels`.
pub fn hysteresis<S1, S2>(
    labels: &Image<u8, 1, S1>,
    dst: &mut Image<u8, 1, S2>,
) -> Result<(), ImageError>
where
    S1: ImageStorage<u8>,
    S2: ImageStorageMut<u8>,
{
    if labels.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            labels.cols(),
            labels.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    if labels.is_empty() {
        return Ok(());
    }

    let cols = labels.cols();
    let rows = labels.rows();
    let mut work = labels.as_slice().to_vec();

    let mut stack = work
        .iter()
        .enumerate()
        .filter(|(_, &label)| label == STRONG_EDGE)
        .map(|(idx, _)| idx)
        .collect::<Vec<_>>();

    while let Some(idx) = stack.pop() {
        let (x, y) = (idx % cols, idx / cols);
        for ny in y.saturating_sub(1)..=(y + 1).min(rows - 1) {
            for nx in x.saturating_sub(1)..=(x + 1).min(cols - 1) {
                let n = ny * cols + nx;
                if work[n] == WEAK_EDGE {
                    work[n] = STRONG_EDGE;
                    stack.push(n);
                }
            }
        }
    }

    dst.as_slice_mut()
        .iter_mut()
        .zip(work.iter())
        .for_each(|(d, &label)| *d = if label == STRONG_EDGE { 255 } else { 0 });

    Ok(())
}

/// Detect edges with the Canny algorithm.
///
/// The input is not smoothed; blur it beforehand to suppress noise. Gradients are
/// computed with a 3x3 Sobel operator, see [`spatial_gradient_i16`].
///
/// If `low_threshold` is greater than `high_threshold` the two are swapped.
///
/// # Arguments
///
/// * `src` - The source grayscale image.
/// * `dst` - The binary edge map (255 on edges, 0 elsewhere), same size as `src`.
/// * `low_threshold` - Hysteresis low threshold on the gradient magnitude.
/// * `high_threshold` - Hysteresis high threshold on the gradient magnitude.
/// * `norm` - The gradient magnitude norm.
/// * `strategy` - The execution strategy.
///
/// # Example
///
/// ```
/// use cvgl_image::{Image, ImageSize};
/// use cvgl_imgproc::edges::{canny, GradientNorm};
/// use cvgl_imgproc::parallel::ExecutionStrategy;
///
/// let size = ImageSize { width: 6, height: 4 };
/// let src = Image::<u8, 1>::from_size_val(size, 100).unwrap();
/// let mut dst = Image::<u8, 1>::from_size_val(size, 7).unwrap();
///
/// canny(&src, &mut dst, 50.0, 150.0, GradientNorm::L1, ExecutionStrategy::Serial).unwrap();
///
/// assert!(dst.as_slice().iter().all(|&v| v == 0));
/// ```
pub fn canny<S1, S2>(
    src: &Image<u8, 1, S1>,
    dst: &mut Image<u8, 1, S2>,
    low_threshold: f32,
    high_threshold: f32,
    norm: GradientNorm,
    strategy: ExecutionStrategy,
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

    if src.is_empty() {
        return Ok(());
    }

    let (low, high) = if low_threshold > high_threshold {
        (high_threshold, low_threshold)
    } else {
        (low_threshold, high_threshold)
    };

    let mut dx = Image::<i16, 1>::from_size_val(src.size(), 0)?;
    let mut dy = Image::<i16, 1>::from_size_val(src.size(), 0)?;
    spatial_gradient_i16(src, &mut dx, &mut dy, strategy)?;

    let mut labels = Image::<u8, 1>::from_size_val(src.size(), NOT_EDGE)?;
    non_maximum_suppression(&dx, &dy, &mut labels, low, high, norm, strategy)?;

    hysteresis(&labels, dst)
}
