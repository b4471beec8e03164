//! ORB detector and descriptor extractor.

use std::cmp::Ordering;

use crate::features::fast::{harris_response, is_fast_corner, CORNER_MARGIN};
use crate::features::pattern::{brief_pattern, PATTERN_EXTENT};
use crate::features::{Descriptor, Feature, Keypoint};
use crate::image::pyramid::ScalePyramid;
use crate::image::{ImageView, OwnedImage};
use crate::trace::{trace_event, trace_span};
use crate::util::{ObjFindError, ObjFindResult};

/// Radius of the circular patch used for the intensity centroid.
const CENTROID_RADIUS: i32 = 15;

/// ORB detection parameters.
#[derive(Clone, Copy, Debug)]
pub struct OrbConfig {
    /// Maximum number of keypoints kept across all levels.
    pub n_features: usize,
    /// Ratio between consecutive pyramid levels (> 1).
    pub scale_factor: f32,
    /// Maximum number of pyramid levels.
    pub n_levels: usize,
    /// FAST intensity threshold.
    pub fast_threshold: u8,
    /// Keypoints closer than this to a level border are dropped.
    pub edge_threshold: usize,
    /// Diameter of the described patch at level 0.
    pub patch_size: usize,
    /// Harris detector free parameter.
    pub harris_k: f32,
    /// Gaussian sigma applied before sampling descriptors.
    pub blur_sigma: f32,
}

impl Default for OrbConfig {
    fn default() -> Self {
        Self {
            n_features: 1000,
            scale_factor: 1.2,
            n_levels: 8,
            fast_threshold: 20,
            edge_threshold: 31,
            patch_size: 31,
            harris_k: 0.04,
            blur_sigma: 2.0,
        }
    }
}

/// ORB feature extractor.
#[derive(Clone, Debug)]
pub struct Orb {
    cfg: OrbConfig,
}

impl Orb {
    /// Creates an extractor after validating the configuration.
    pub fn new(cfg: OrbConfig) -> ObjFindResult<Self> {
        if !(cfg.scale_factor.is_finite() && cfg.scale_factor > 1.0) {
            return Err(ObjFindError::InvalidInput("scale_factor must be greater than 1"));
        }
        if cfg.n_levels == 0 {
            return Err(ObjFindError::InvalidInput("n_levels must be at least 1"));
        }
        let min_border = PATTERN_EXTENT as usize * 3 / 2 + 1;
        if cfg.edge_threshold < min_border.max(CENTROID_RADIUS as usize + 1) {
            return Err(ObjFindError::InvalidInput(
                "edge_threshold is too small for the descriptor patch",
            ));
        }
        Ok(Self { cfg })
    }

    /// Detects keypoints and computes their descriptors.
    ///
    /// Images too small to hold a patch away from the border yield an empty
    /// list.
    pub fn detect_and_compute(&self, image: ImageView<'_, u8>) -> ObjFindResult<Vec<Feature>> {
        let _span = trace_span!(
            "orb_detect",
            width = image.width(),
            height = image.height()
        )
        .entered();
        if self.cfg.n_features == 0 {
            return Ok(Vec::new());
        }

        let min_side = 2 * self.cfg.edge_threshold + 1;
        let pyramid =
            ScalePyramid::build(image, self.cfg.n_levels, self.cfg.scale_factor, min_side)?;
        let quotas = level_quotas(
            self.cfg.n_features,
            pyramid.levels().len(),
            self.cfg.scale_factor,
        );

        let mut features = Vec::new();
        for (octave, (level, &quota)) in pyramid.levels().iter().zip(&quotas).enumerate() {
            let keypoints = self.detect_level(level.image.view(), quota);
            if keypoints.is_empty() {
                continue;
            }
            let blurred = blur(&level.image, self.cfg.blur_sigma)?;
            for (x, y, response) in keypoints {
                let angle = centroid_angle(level.image.view(), x, y);
                let descriptor = describe(blurred.view(), x, y, angle);
                features.push(Feature {
                    keypoint: Keypoint {
                        x: x as f32 * level.scale,
                        y: y as f32 * level.scale,
                        angle,
                        response,
                        octave: octave as u8,
                        size: self.cfg.patch_size as f32 * level.scale,
                    },
                    descriptor,
                });
            }
        }

        trace_event!("orb_features", count = features.len());
        Ok(features)
    }

    /// FAST corners inside the border, suppressed to 3x3 Harris maxima and
    /// truncated to the strongest `quota`.
    fn detect_level(&self, image: ImageView<'_, u8>, quota: usize) -> Vec<(usize, usize, f32)> {
        let width = image.width();
        let height = image.height();
        let border = self.cfg.edge_threshold.max(CORNER_MARGIN);
        if quota == 0 || width <= 2 * border || height <= 2 * border {
            return Vec::new();
        }

        let mut response = vec![f32::NEG_INFINITY; width * height];
        let mut corners = Vec::new();
        for y in border..height - border {
            for x in border..width - border {
                if is_fast_corner(image, x, y, self.cfg.fast_threshold) {
                    let r = harris_response(image, x, y, self.cfg.harris_k);
                    response[y * width + x] = r;
                    corners.push((x, y, r));
                }
            }
        }

        corners.retain(|&(x, y, r)| {
            for ny in y - 1..=y + 1 {
                for nx in x - 1..=x + 1 {
                    if (nx, ny) == (x, y) {
                        continue;
                    }
                    let other = response[ny * width + nx];
                    // Equal neighbors: the one met first in row-major order wins.
                    let earlier = (ny, nx) < (y, x);
                    if other > r || (other == r && earlier) {
                        return false;
                    }
                }
            }
            true
        });

        corners.sort_by(|a, b| {
            b.2.partial_cmp(&a.2)
                .unwrap_or(Ordering::Equal)
                .then_with(|| (a.1, a.0).cmp(&(b.1, b.0)))
        });
        corners.truncate(quota);
        corners
    }
}

/// Splits `n_features` over `levels` in a geometric series of ratio
/// `1 / scale_factor`; the last level takes the remainder.
pub(crate) fn level_quotas(n_features: usize, levels: usize, scale_factor: f32) -> Vec<usize> {
    if levels == 0 {
        return Vec::new();
    }
    let factor = 1.0 / scale_factor as f64;
    let mut per_level = if levels == 1 {
        n_features as f64
    } else {
        n_features as f64 * (1.0 - factor) / (1.0 - factor.powi(levels as i32))
    };
    let mut quotas = Vec::with_capacity(levels);
    let mut assigned = 0usize;
    for _ in 0..levels - 1 {
        let quota = (per_level.round() as usize).min(n_features - assigned);
        quotas.push(quota);
        assigned += quota;
        per_level *= factor;
    }
    quotas.push(n_features - assigned);
    quotas
}

fn blur(image: &OwnedImage, sigma: f32) -> ObjFindResult<OwnedImage> {
    if sigma <= 0.0 {
        return Ok(image.clone());
    }
    let gray = image.clone().into_gray_image()?;
    OwnedImage::from_gray_image(::image::imageops::blur(&gray, sigma))
}

/// Orientation from the intensity centroid of a circular patch.
fn centroid_angle(image: ImageView<'_, u8>, x: usize, y: usize) -> f32 {
    let mut m01 = 0.0f64;
    let mut m10 = 0.0f64;
    let r2 = CENTROID_RADIUS * CENTROID_RADIUS;
    for dy in -CENTROID_RADIUS..=CENTROID_RADIUS {
        for dx in -CENTROID_RADIUS..=CENTROID_RADIUS {
            if dx * dx + dy * dy > r2 {
                continue;
            }
            let px = (x as i32 + dx) as usize;
            let py = (y as i32 + dy) as usize;
            let value = image.get(px, py).map_or(0.0, |&v| v as f64);
            m10 += dx as f64 * value;
            m01 += dy as f64 * value;
        }
    }
    m01.atan2(m10) as f32
}

/// Rotated BRIEF: bit `i` is set when the first test point of pair `i` is
/// darker than the second.
fn describe(image: ImageView<'_, u8>, x: usize, y: usize, angle: f32) -> Descriptor {
    let (sin_a, cos_a) = angle.sin_cos();
    let sample = |dx: i8, dy: i8| -> u8 {
        let (dx, dy) = (dx as f32, dy as f32);
        let rx = (dx * cos_a - dy * sin_a).round() as i32;
        let ry = (dx * sin_a + dy * cos_a).round() as i32;
        let px = (x as i32 + rx).clamp(0, image.width() as i32 - 1) as usize;
        let py = (y as i32 + ry).clamp(0, image.height() as i32 - 1) as usize;
        image.get(px, py).copied().unwrap_or(0)
    };

    let mut descriptor = [0u8; 32];
    for (byte, tests) in descriptor.iter_mut().zip(brief_pattern().chunks(8)) {
        for (bit, &[x1, y1, x2, y2]) in tests.iter().enumerate() {
            if sample(x1, y1) < sample(x2, y2) {
                *byte |= 1 << bit;
            }
        }
    }
    descriptor
}
