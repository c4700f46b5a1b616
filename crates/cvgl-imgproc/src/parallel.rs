use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Number of pixels from which [`ExecutionStrategy::Auto`] switches to parallel execution.
pub const AUTO_PARALLEL_MIN_PIXELS: usize = 100_000;

/// Controls how row-wise operations are executed.
///
/// Every strategy is synchronous: the call returns only once all rows are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStrategy {
    /// Run sequentially on the calling thread.
    #[default]
    Serial,

    /// Process rows on the global Rayon thread pool.
    Parallel,

    /// Parallel for images of at least [`AUTO_PARALLEL_MIN_PIXELS`] pixels, serial otherwise.
    Auto,
}

impl ExecutionStrategy {
    /// Decide whether an image with `num_pixels` pixels is processed in parallel.
    #[inline]
    pub fn is_parallel(&self, num_pixels: usize) -> bool {
        match self {
            ExecutionStrategy::Serial => false,
            ExecutionStrategy::Parallel => true,
            ExecutionStrategy::Auto => num_pixels >= AUTO_PARALLEL_MIN_PIXELS,
        }
    }
}

/// Apply `f(row_index, row)` to every row of `dst`.
///
/// # Arguments
///
/// * `strategy` - The execution strategy.
/// * `dst` - The flat destination buffer.
/// * `row_len` - The number of samples per row (width * channels).
/// * `f` - The row operation.
pub fn for_each_row_mut<T>(
    strategy: ExecutionStrategy,
    dst: &mut [T],
    row_len: usize,
    f: impl Fn(usize, &mut [T]) + Send + Sync,
) where
    T: Send,
{
    if row_len == 0 {
        return;
    }

    let num_rows = dst.len() / row_len;
    if strategy.is_parallel(num_rows * row_len) {
        dst.par_chunks_exact_mut(row_len)
            .enumerate()
            .for_each(|(r, row)| f(r, row));
    } else {
        dst.chunks_exact_mut(row_len)
            .enumerate()
            .for_each(|(r, row)| f(r, row));
    }
}

/// Apply a function to each sample of `src` and write the result to the same position in `dst`.
///
/// Both buffers are walked row by row; `row_len` is the number of samples per row.
///
/// PRECONDITION: `src` and `dst` have the same length.
pub fn iter_rows_val<T1, T2>(
    strategy: ExecutionStrategy,
    src: &[T1],
    dst: &mut [T2],
    row_len: usize,
    f: impl Fn(&T1, &mut T2) + Send + Sync,
) where
    T1: Sync,
    T2: Send,
{
    if row_len == 0 {
        return;
    }

    if strategy.is_parallel(src.len()) {
        src.par_chunks_exact(row_len)
            .zip(dst.par_chunks_exact_mut(row_len))
            .for_each(|(src_row, dst_row)| {
                src_row
                    .iter()
                    .zip(dst_row.iter_mut())
                    .for_each(|(s, d)| f(s, d));
            });
    } else {
        src.iter().zip(dst.iter_mut()).for_each(|(s, d)| f(s, d));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_threshold() {
        assert!(!ExecutionStrategy::Auto.is_parallel(AUTO_PARALLEL_MIN_PIXELS - 1));
        assert!(ExecutionStrategy::Auto.is_parallel(AUTO_PARALLEL_MIN_PIXELS));
        assert!(!ExecutionStrategy::Serial.is_parallel(usize::MAX));
        assert!(ExecutionStrategy::Parallel.is_parallel(1));
    }

    #[test]
    fn rows_serial_and_parallel_agree() {
        for strategy in [ExecutionStrategy::Serial, ExecutionStrategy::Parallel] {
            let mut dst = vec![0usize; 12];
            for_each_row_mut(strategy, &mut dst, 4, |r, row| {
                row.iter_mut().enumerate().for_each(|(c, v)| *v = r * 10 + c)
            });
            assert_eq!(dst, vec![0, 1, 2, 3, 10, 11, 12, 13, 20, 21, 22, 23]);
        }
    }

    #[test]
    fn val_serial_and_parallel_agree() {
        let src = vec![1u8, 2, 3, 4, 5, 6];
        for strategy in [ExecutionStrategy::Serial, ExecutionStrategy::Parallel] {
            let mut dst = vec![0u16; 6];
            iter_rows_val(strategy, &src, &mut dst, 3, |s, d| *d = *s as u16 * 2);
            assert_eq!(dst, vec![2, 4, 6, 8, 10, 12]);
        }
    }

    #[test]
    fn strategy_from_json() -> Result<(), serde_json::Error> {
        let strategy: ExecutionStrategy = serde_json::from_str("\"auto\"")?;
        assert_eq!(strategy, ExecutionStrategy::Auto);
        Ok(())
    }
}
