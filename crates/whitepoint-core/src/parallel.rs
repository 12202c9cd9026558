//! Parallelization helpers for per-pixel passes
//!
//! Every pixel loop in the engine goes through one of these so the
//! parallel/sequential cutover is decided in one place.

use rayon::prelude::*;

/// Minimum number of chunks (pixels) before work is handed to rayon.
pub const PARALLEL_THRESHOLD: usize = 30_000;

/// Parallel fold/reduce over chunks with automatic threshold-based dispatch.
///
/// # Arguments
/// * `data` - The slice to process
/// * `chunk_size` - Size of each chunk (3 for interleaved pixels)
/// * `init` - Function that creates a new accumulator
/// * `fold_fn` - Function that folds a chunk into the accumulator
/// * `reduce_fn` - Function that combines two accumulators
///
/// # Example
/// ```ignore
/// let sums = parallel_fold_reduce(
///     &data,
///     3,
///     || [0.0f64; 3],
///     |mut acc, px| {
///         for c in 0..3 {
///             acc[c] += px[c] as f64;
///         }
///         acc
///     },
///     |a, b| [a[0] + b[0], a[1] + b[1], a[2] + b[2]],
/// );
/// ```
pub fn parallel_fold_reduce<T, A, I, F, R>(
    data: &[T],
    chunk_size: usize,
    init: I,
    fold_fn: F,
    reduce_fn: R,
) -> A
where
    T: Sync,
    A: Send + Clone,
    I: Fn() -> A + Sync,
    F: Fn(A, &[T]) -> A + Sync,
    R: Fn(A, A) -> A + Sync,
{
    if data.len() / chunk_size >= PARALLEL_THRESHOLD {
        data.par_chunks_exact(chunk_size)
            .fold(&init, &fold_fn)
            .reduce(&init, &reduce_fn)
    } else {
        data.chunks_exact(chunk_size).fold(init(), &fold_fn)
    }
}

/// Parallel for-each over mutable chunks with automatic threshold-based dispatch.
///
/// # Arguments
/// * `data` - The mutable slice to process
/// * `chunk_size` - Size of each chunk (3 for interleaved pixels)
/// * `f` - Function applied to each chunk in place
pub fn parallel_for_each_chunk_mut<T, F>(data: &mut [T], chunk_size: usize, f: F)
where
    T: Send + Sync,
    F: Fn(&mut [T]) + Sync,
{
    if data.len() / chunk_size >= PARALLEL_THRESHOLD {
        data.par_chunks_exact_mut(chunk_size).for_each(&f);
    } else {
        data.chunks_exact_mut(chunk_size).for_each(f);
    }
}

/// Parallel map over chunks, collecting each chunk's output into one `Vec`.
///
/// Used for luminance and per-channel extraction where every pixel
/// contributes exactly one value.
pub fn parallel_map_chunks<T, U, F>(data: &[T], chunk_size: usize, f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(&[T]) -> U + Sync + Send,
{
    if data.len() / chunk_size >= PARALLEL_THRESHOLD {
        data.par_chunks_exact(chunk_size).map(f).collect()
    } else {
        data.chunks_exact(chunk_size).map(f).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_reduce_small() {
        let data: Vec<f32> = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];

        let sums = parallel_fold_reduce(
            &data,
            3,
            || [0.0f64; 3],
            |mut acc, px| {
                acc[0] += px[0] as f64;
                acc[1] += px[1] as f64;
                acc[2] += px[2] as f64;
                acc
            },
            |a, b| [a[0] + b[0], a[1] + b[1], a[2] + b[2]],
        );

        assert!((sums[0] - 5.0).abs() < 1e-9);
        assert!((sums[1] - 7.0).abs() < 1e-9);
        assert!((sums[2] - 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_fold_reduce_large_matches_sequential_ratio() {
        let num_pixels = PARALLEL_THRESHOLD + 1000;
        let mut data: Vec<f32> = Vec::with_capacity(num_pixels * 3);
        for i in 0..num_pixels {
            let v = (i as f32) / (num_pixels as f32);
            data.extend_from_slice(&[v, v * 0.5, v * 0.25]);
        }

        let sums = parallel_fold_reduce(
            &data,
            3,
            || [0.0f64; 3],
            |mut acc, px| {
                acc[0] += px[0] as f64;
                acc[1] += px[1] as f64;
                acc[2] += px[2] as f64;
                acc
            },
            |a, b| [a[0] + b[0], a[1] + b[1], a[2] + b[2]],
        );

        assert!((sums[1] / sums[0] - 0.5).abs() < 1e-6, "g/r = {}", sums[1] / sums[0]);
        assert!((sums[2] / sums[0] - 0.25).abs() < 1e-6, "b/r = {}", sums[2] / sums[0]);
    }

    #[test]
    fn test_for_each_chunk_mut_large() {
        let num_pixels = PARALLEL_THRESHOLD + 1000;
        let mut data: Vec<f32> = vec![1.0; num_pixels * 3];

        parallel_for_each_chunk_mut(&mut data, 3, |px| {
            px[0] *= 2.0;
            px[2] *= 0.5;
        });

        assert!(data.chunks_exact(3).all(|px| px[0] == 2.0 && px[1] == 1.0 && px[2] == 0.5));
    }

    #[test]
    fn test_map_chunks_preserves_order() {
        let data: Vec<f32> = (0..12).map(|v| v as f32).collect();
        let firsts = parallel_map_chunks(&data, 3, |px| px[0]);
        assert_eq!(firsts, vec![0.0, 3.0, 6.0, 9.0]);
    }
}
