//! Dense scan of one template over the whole image.

use crate::candidate::topk::Peak;
use crate::kernel::scalar::{SsdMaskedScalar, ZnccMaskedScalar};
use crate::kernel::{Kernel, ScanParams};
use crate::search::Metric;
use crate::template::{MaskedSsdTemplatePlan, MaskedTemplatePlan, Template};
use crate::util::{ObjFindError, ObjFindResult};
use crate::ImageView;

/// Returns the best placement of `template` over every valid position.
///
/// The peak score is a ranking score (higher is better). Fails when the
/// template is larger than the image, its mask is empty, or (for ZNCC) the
/// masked template is constant.
pub fn best_placement(
    image: ImageView<'_, u8>,
    template: &Template,
    metric: Metric,
    min_var_i: f64,
) -> ObjFindResult<Peak> {
    let params = ScanParams {
        topk: 1,
        min_var_i,
    };
    let peaks = match metric {
        Metric::Zncc => {
            let plan = MaskedTemplatePlan::new(template.view(), template.mask_view())?;
            <ZnccMaskedScalar as Kernel>::scan_full(image, &plan, params)?
        }
        Metric::Ssd => {
            let plan = MaskedSsdTemplatePlan::new(template.view(), template.mask_view())?;
            <SsdMaskedScalar as Kernel>::scan_full(image, &plan, params)?
        }
    };
    peaks
        .into_iter()
        .next()
        .ok_or(ObjFindError::DegenerateTemplate {
            reason: "no scored placement",
        })
}
