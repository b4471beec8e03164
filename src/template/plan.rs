//! Template plan precomputation for masked ZNCC and SSD metrics.

use crate::image::ImageView;
use crate::util::{ObjFindError, ObjFindResult};

fn check_same_size(tpl: ImageView<'_, u8>, mask: ImageView<'_, u8>) -> ObjFindResult<()> {
    if tpl.width() != mask.width() || tpl.height() != mask.height() {
        return Err(ObjFindError::InvalidInput(
            "mask dimensions must match the template",
        ));
    }
    Ok(())
}

fn row_of<'a>(view: ImageView<'a, u8>, y: usize) -> ObjFindResult<&'a [u8]> {
    view.row(y).ok_or(ObjFindError::BufferTooSmall {
        needed: (y + 1) * view.stride(),
        got: view.as_slice().len(),
    })
}

/// Collects template pixels and a 0/1 weight per pixel from a mask view.
fn gather(
    tpl: ImageView<'_, u8>,
    mask: ImageView<'_, u8>,
) -> ObjFindResult<(Vec<f32>, Vec<u8>, f64)> {
    check_same_size(tpl, mask)?;
    let count = tpl.width() * tpl.height();
    let mut values = Vec::with_capacity(count);
    let mut weights = Vec::with_capacity(count);
    let mut sum_w = 0.0f64;
    for y in 0..tpl.height() {
        let tpl_row = row_of(tpl, y)?;
        let mask_row = row_of(mask, y)?;
        for (&t, &m) in tpl_row.iter().zip(mask_row) {
            let w = u8::from(m != 0);
            values.push(t as f32);
            weights.push(w);
            sum_w += w as f64;
        }
    }
    if sum_w == 0.0 {
        return Err(ObjFindError::DegenerateTemplate {
            reason: "empty mask",
        });
    }
    Ok((values, weights, sum_w))
}

/// Precomputed statistics for masked zero-mean normalized cross-correlation.
///
/// Only pixels whose mask value is non-zero contribute. `t_prime` holds the
/// zero-mean template with masked-out pixels set to zero, so the correlation
/// numerator reduces to `sum(t_prime * I)`.
#[derive(Clone, Debug)]
pub struct MaskedTemplatePlan {
    width: usize,
    height: usize,
    mask: Vec<u8>,
    t_prime: Vec<f32>,
    sum_w: f64,
    var_t: f64,
}

impl MaskedTemplatePlan {
    /// Builds a plan from a template and a same-sized mask.
    pub fn new(tpl: ImageView<'_, u8>, mask: ImageView<'_, u8>) -> ObjFindResult<Self> {
        let (values, weights, sum_w) = gather(tpl, mask)?;

        let sum_t: f64 = values
            .iter()
            .zip(&weights)
            .map(|(&t, &w)| t as f64 * w as f64)
            .sum();
        let mean = sum_t / sum_w;

        let mut var_t = 0.0f64;
        let t_prime: Vec<f32> = values
            .iter()
            .zip(&weights)
            .map(|(&t, &w)| {
                if w == 0 {
                    return 0.0;
                }
                let d = t as f64 - mean;
                var_t += d * d;
                d as f32
            })
            .collect();
        if var_t <= 1e-8 {
            return Err(ObjFindError::DegenerateTemplate {
                reason: "zero variance",
            });
        }

        Ok(Self {
            width: tpl.width(),
            height: tpl.height(),
            mask: weights,
            t_prime,
            sum_w,
            var_t,
        })
    }

    /// Returns the template width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the template height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the 0/1 mask in row-major order.
    pub fn mask(&self) -> &[u8] {
        &self.mask
    }

    /// Returns the masked zero-mean template in row-major order.
    pub fn t_prime(&self) -> &[f32] {
        &self.t_prime
    }

    /// Returns the number of active mask pixels.
    pub fn sum_w(&self) -> f64 {
        self.sum_w
    }

    /// Returns the sum of squared zero-mean template values.
    pub fn var_t(&self) -> f64 {
        self.var_t
    }
}

/// Precomputed buffers for masked sum of squared differences.
#[derive(Clone, Debug)]
pub struct MaskedSsdTemplatePlan {
    width: usize,
    height: usize,
    mask: Vec<u8>,
    values: Vec<f32>,
}

impl MaskedSsdTemplatePlan {
    /// Builds a plan from a template and a same-sized mask.
    pub fn new(tpl: ImageView<'_, u8>, mask: ImageView<'_, u8>) -> ObjFindResult<Self> {
        let (values, weights, _) = gather(tpl, mask)?;
        Ok(Self {
            width: tpl.width(),
            height: tpl.height(),
            mask: weights,
            values,
        })
    }

    /// Returns the template width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the template height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the 0/1 mask in row-major order.
    pub fn mask(&self) -> &[u8] {
        &self.mask
    }

    /// Returns the template intensities in row-major order.
    pub fn values(&self) -> &[f32] {
        &self.values
    }
}
