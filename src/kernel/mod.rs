//! Correlation kernel implementations.

use crate::candidate::topk::Peak;
use crate::util::ObjFindResult;
use crate::ImageView;

/// Scan configuration for kernel evaluations.
#[derive(Clone, Copy, Debug)]
pub struct ScanParams {
    /// Maximum number of peaks to retain.
    pub topk: usize,
    /// Masked image-window variance at or below which ZNCC reports `0.0`.
    pub min_var_i: f64,
}

impl Default for ScanParams {
    fn default() -> Self {
        Self {
            topk: 1,
            min_var_i: 1e-8,
        }
    }
}

/// Kernel trait for scoring and scan operations.
pub trait Kernel {
    type Plan;

    /// Computes the ranking score at a single placement (top-left coordinates).
    ///
    /// Returns `None` when the template does not fit at the placement.
    fn score_at(
        image: ImageView<'_, u8>,
        plan: &Self::Plan,
        x: usize,
        y: usize,
        min_var_i: f64,
    ) -> Option<f32>;

    /// Scans the full valid placement range and returns top-K peaks.
    ///
    /// Fails when the template does not fit inside the image.
    fn scan_full(
        image: ImageView<'_, u8>,
        plan: &Self::Plan,
        params: ScanParams,
    ) -> ObjFindResult<Vec<Peak>>;
}

pub mod scalar;
