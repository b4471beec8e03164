//! Scalar reference kernels for masked score evaluation.

use crate::candidate::topk::{Peak, TopK};
use crate::kernel::{Kernel, ScanParams};
use crate::template::{MaskedSsdTemplatePlan, MaskedTemplatePlan};
use crate::util::{ObjFindError, ObjFindResult};
use crate::ImageView;

/// Scalar masked ZNCC kernel.
///
/// Windows whose masked variance is at most `min_var_i` score `0.0`.
pub struct ZnccMaskedScalar;

/// Scalar masked SSD kernel; peaks carry the negated SSD.
pub struct SsdMaskedScalar;

fn placement_range(
    image: ImageView<'_, u8>,
    tpl_width: usize,
    tpl_height: usize,
) -> ObjFindResult<(usize, usize)> {
    let img_width = image.width();
    let img_height = image.height();
    if img_width < tpl_width || img_height < tpl_height {
        return Err(ObjFindError::RoiOutOfBounds {
            x: 0,
            y: 0,
            width: tpl_width,
            height: tpl_height,
            img_width,
            img_height,
        });
    }
    Ok((img_width - tpl_width, img_height - tpl_height))
}

fn fits(image: ImageView<'_, u8>, tpl_width: usize, tpl_height: usize, x: usize, y: usize) -> bool {
    image.width() >= tpl_width
        && image.height() >= tpl_height
        && x <= image.width() - tpl_width
        && y <= image.height() - tpl_height
}

impl ZnccMaskedScalar {
    fn score_unchecked(
        image: ImageView<'_, u8>,
        tpl: &MaskedTemplatePlan,
        x: usize,
        y: usize,
        min_var_i: f64,
    ) -> Option<f32> {
        let tpl_width = tpl.width();
        let t_prime = tpl.t_prime();
        let mask = tpl.mask();

        let mut dot = 0.0f64;
        let mut sum_i = 0.0f64;
        let mut sum_i2 = 0.0f64;
        for ty in 0..tpl.height() {
            let img_row = &image.row(y + ty)?[x..x + tpl_width];
            let base = ty * tpl_width;
            for (tx, &pixel) in img_row.iter().enumerate() {
                let idx = base + tx;
                if mask[idx] == 0 {
                    continue;
                }
                let value = pixel as f64;
                dot += t_prime[idx] as f64 * value;
                sum_i += value;
                sum_i2 += value * value;
            }
        }

        // A flat window carries no correlation signal; it scores zero.
        let var_i = sum_i2 - (sum_i * sum_i) / tpl.sum_w();
        if var_i <= min_var_i {
            return Some(0.0);
        }
        let score = (dot / (tpl.var_t() * var_i).sqrt()) as f32;
        Some(if score.is_finite() { score } else { 0.0 })
    }
}

impl Kernel for ZnccMaskedScalar {
    type Plan = MaskedTemplatePlan;

    fn score_at(
        image: ImageView<'_, u8>,
        tpl: &Self::Plan,
        x: usize,
        y: usize,
        min_var_i: f64,
    ) -> Option<f32> {
        if !fits(image, tpl.width(), tpl.height(), x, y) {
            return None;
        }
        Self::score_unchecked(image, tpl, x, y, min_var_i)
    }

    fn scan_full(
        image: ImageView<'_, u8>,
        tpl: &Self::Plan,
        params: ScanParams,
    ) -> ObjFindResult<Vec<Peak>> {
        let (max_x, max_y) = placement_range(image, tpl.width(), tpl.height())?;
        let mut topk = TopK::new(params.topk);
        for y in 0..=max_y {
            for x in 0..=max_x {
                if let Some(score) = Self::score_unchecked(image, tpl, x, y, params.min_var_i) {
                    topk.push(Peak { x, y, score });
                }
            }
        }
        Ok(topk.into_sorted_desc())
    }
}

impl SsdMaskedScalar {
    fn ssd_unchecked(
        image: ImageView<'_, u8>,
        tpl: &MaskedSsdTemplatePlan,
        x: usize,
        y: usize,
    ) -> Option<f64> {
        let tpl_width = tpl.width();
        let values = tpl.values();
        let mask = tpl.mask();

        let mut ssd = 0.0f64;
        for ty in 0..tpl.height() {
            let img_row = &image.row(y + ty)?[x..x + tpl_width];
            let base = ty * tpl_width;
            for (tx, &pixel) in img_row.iter().enumerate() {
                let idx = base + tx;
                if mask[idx] == 0 {
                    continue;
                }
                let diff = pixel as f64 - values[idx] as f64;
                ssd += diff * diff;
            }
        }
        Some(ssd)
    }
}

impl Kernel for SsdMaskedScalar {
    type Plan = MaskedSsdTemplatePlan;

    fn score_at(
        image: ImageView<'_, u8>,
        tpl: &Self::Plan,
        x: usize,
        y: usize,
        _min_var_i: f64,
    ) -> Option<f32> {
        if !fits(image, tpl.width(), tpl.height(), x, y) {
            return None;
        }
        Self::ssd_unchecked(image, tpl, x, y).map(|ssd| -(ssd as f32))
    }

    fn scan_full(
        image: ImageView<'_, u8>,
        tpl: &Self::Plan,
        params: ScanParams,
    ) -> ObjFindResult<Vec<Peak>> {
        let (max_x, max_y) = placement_range(image, tpl.width(), tpl.height())?;
        let mut topk = TopK::new(params.topk);
        for y in 0..=max_y {
            for x in 0..=max_x {
                if let Some(ssd) = Self::ssd_unchecked(image, tpl, x, y) {
                    topk.push(Peak {
                        x,
                        y,
                        score: -(ssd as f32),
                    });
                }
            }
        }
        Ok(topk.into_sorted_desc())
    }
}
