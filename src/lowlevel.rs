//! Low-level building blocks for custom matching pipelines.
//!
//! These expose template plans, scoring kernels, and detector primitives for
//! use cases beyond [`match_multiscale`](crate::match_multiscale) and
//! [`match_and_visualize`](crate::match_and_visualize).

pub use crate::candidate::topk::{Peak, TopK};
pub use crate::features::{
    hamming, harris_response, is_fast_corner, knn_match_hamming, ratio_test, Descriptor,
    Feature, GoodMatch, Keypoint, KnnMatch, Orb, OrbConfig,
};
pub use crate::image::resize::resize_u8_bilinear;
pub use crate::kernel::scalar::{SsdMaskedScalar, ZnccMaskedScalar};
pub use crate::kernel::{Kernel, ScanParams};
pub use crate::search::scan::best_placement;
pub use crate::search::search_template;
pub use crate::template::{MaskedSsdTemplatePlan, MaskedTemplatePlan};
