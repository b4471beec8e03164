//! Binary foreground masks from templates.
//!
//! Templates are expected to show a darker subject on a light background.
//! With the default inverted threshold, pixels darker than `threshold_value`
//! become `max_value` (mask-active) and everything else becomes zero.

use crate::image::{OwnedImage, Raster};
use crate::trace::trace_debug;

/// Thresholding parameters for [`binary_mask`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaskConfig {
    /// Intensity cut between background and foreground.
    pub threshold_value: u8,
    /// Value written to mask-active pixels.
    pub max_value: u8,
    /// When true, pixels below the threshold are active.
    pub inverted: bool,
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            threshold_value: 200,
            max_value: 255,
            inverted: true,
        }
    }
}

impl MaskConfig {
    /// Maps one grayscale intensity to its mask value.
    #[inline]
    pub fn apply(&self, value: u8) -> u8 {
        let below = value < self.threshold_value;
        if below == self.inverted {
            self.max_value
        } else {
            0
        }
    }
}

/// Builds a binary mask with the template's spatial dimensions.
///
/// Color templates are converted to grayscale first. The output contains only
/// `0` and `cfg.max_value`.
pub fn binary_mask(template: &Raster, cfg: MaskConfig) -> OwnedImage {
    let mut gray = template.to_gray();
    threshold_in_place(&mut gray, cfg);
    gray
}

/// Applies [`binary_mask`] to every template, keeping list positions.
///
/// `None` entries stand for unreadable templates and are passed through.
pub fn binary_masks(templates: &[Option<Raster>], cfg: MaskConfig) -> Vec<Option<OwnedImage>> {
    templates
        .iter()
        .enumerate()
        .map(|(idx, slot)| match slot {
            Some(template) => Some(binary_mask(template, cfg)),
            None => {
                trace_debug!("no template to mask", template_idx = idx);
                None
            }
        })
        .collect()
}

pub(crate) fn threshold_in_place(img: &mut OwnedImage, cfg: MaskConfig) {
    for value in img.data_mut().iter_mut() {
        *value = cfg.apply(*value);
    }
}
