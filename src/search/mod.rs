//! Multi-scale masked template search.
//!
//! Each template is resized over a linear sweep of scale factors and scored
//! against the whole image with a masked metric. Only the single best
//! placement per template survives: there is no multi-instance detection and
//! no suppression across templates or scales.

use crate::image::Raster;
use crate::util::{ObjFindError, ObjFindResult};

pub(crate) mod multiscale;
pub(crate) mod scan;

pub use multiscale::{match_multiscale, search_template};

/// Scoring metric for template placements.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Metric {
    /// Masked zero-mean normalized cross-correlation; higher is better.
    #[default]
    Zncc,
    /// Masked sum of squared differences; lower is better.
    Ssd,
}

impl Metric {
    /// Returns true when larger raw scores indicate better matches.
    pub fn higher_is_better(self) -> bool {
        matches!(self, Metric::Zncc)
    }

    /// Converts between raw metric values and ranking scores (higher is
    /// better). The mapping is its own inverse.
    pub(crate) fn to_rank(self, score: f32) -> f32 {
        if self.higher_is_better() {
            score
        } else {
            -score
        }
    }
}

/// Configuration for [`match_multiscale`].
#[derive(Clone, Copy, Debug)]
pub struct MultiScaleConfig {
    /// Smallest and largest scale factor, both tested.
    pub scale_range: (f64, f64),
    /// Number of evenly spaced scale factors.
    pub scale_steps: usize,
    /// Threshold for masks derived from color templates.
    pub threshold_value: u8,
    /// Placement metric.
    pub metric: Metric,
    /// Search templates concurrently (requires the `rayon` feature).
    pub parallel: bool,
    /// Window variance at or below which ZNCC scores zero.
    pub min_var_i: f64,
    /// Stroke width of the drawn detection boxes.
    pub box_thickness: i32,
}

impl Default for MultiScaleConfig {
    fn default() -> Self {
        Self {
            scale_range: (0.5, 1.0),
            scale_steps: 10,
            threshold_value: 200,
            metric: Metric::Zncc,
            parallel: false,
            min_var_i: 1e-8,
            box_thickness: 5,
        }
    }
}

impl MultiScaleConfig {
    /// Rejects scale bounds that are not finite and positive.
    pub fn validate(&self) -> ObjFindResult<()> {
        let (lo, hi) = self.scale_range;
        if !(lo.is_finite() && hi.is_finite()) || lo <= 0.0 || hi <= 0.0 {
            return Err(ObjFindError::InvalidInput(
                "scale_range bounds must be finite and positive",
            ));
        }
        Ok(())
    }
}

/// Best placement found for one template.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Detection {
    /// Position of the template in the input list.
    pub template_idx: usize,
    /// Top-left column in image pixels.
    pub x: usize,
    /// Top-left row in image pixels.
    pub y: usize,
    /// Width of the scaled template.
    pub width: usize,
    /// Height of the scaled template.
    pub height: usize,
    /// Scale factor that produced the best score.
    pub scale: f64,
    /// Raw metric value at the placement.
    pub score: f32,
}

/// Result of [`match_multiscale`].
#[derive(Clone, Debug)]
pub struct MultiScaleOutput {
    /// BGR copy of the input with one box per detection.
    pub annotated: Raster,
    /// Top-left corner of every detection, in template order.
    pub locations: Vec<(usize, usize)>,
    /// Full detection records, aligned with `locations`.
    pub detections: Vec<Detection>,
}
