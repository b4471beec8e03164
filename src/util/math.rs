//! Numeric helpers for scale sweeps and keypoint geometry.

/// Returns `steps` evenly spaced values over `[start, stop]`, both inclusive.
///
/// A single step yields `start`; zero steps yield an empty vector.
pub(crate) fn linspace(start: f64, stop: f64, steps: usize) -> Vec<f64> {
    match steps {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let delta = (stop - start) / (steps - 1) as f64;
            let mut out: Vec<f64> = (0..steps).map(|i| start + delta * i as f64).collect();
            // Pin the endpoint so accumulated rounding never overshoots it.
            out[steps - 1] = stop;
            out
        }
    }
}

/// Rounds a scaled pixel extent the way resize helpers size their output.
pub(crate) fn scaled_extent(extent: usize, scale: f64) -> usize {
    let scaled = (extent as f64 * scale).round();
    if scaled.is_finite() && scaled > 0.0 {
        scaled as usize
    } else {
        0
    }
}

/// Ceiling division for non-zero divisors.
pub(crate) fn div_ceil(value: usize, divisor: usize) -> usize {
    value.div_ceil(divisor.max(1))
}

#[cfg(test)]
mod tests {
    use super::{div_ceil, linspace, scaled_extent};

    #[test]
    fn linspace_includes_both_endpoints() {
        let values = linspace(0.5, 1.0, 6);
        assert_eq!(values.len(), 6);
        assert!((values[0] - 0.5).abs() < 1e-12);
        assert!((values[1] - 0.6).abs() < 1e-12);
        assert_eq!(values[5], 1.0);
    }

    #[test]
    fn linspace_degenerate_counts() {
        assert!(linspace(0.5, 1.0, 0).is_empty());
        assert_eq!(linspace(0.5, 1.0, 1), vec![0.5]);
    }

    #[test]
    fn scaled_extent_rounds_and_rejects_zero() {
        assert_eq!(scaled_extent(20, 0.5), 10);
        assert_eq!(scaled_extent(15, 0.5), 8);
        assert_eq!(scaled_extent(1, 0.1), 0);
    }

    #[test]
    fn div_ceil_rounds_up() {
        assert_eq!(div_ceil(7, 3), 3);
        assert_eq!(div_ceil(6, 3), 2);
    }
}
