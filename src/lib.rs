//! objfind locates known objects in images.
//!
//! Three complementary routines share one raster model:
//!
//! - [`search::match_multiscale`] sweeps each template over a range of scales
//!   with masked ZNCC (or SSD) and boxes the best placement.
//! - [`features::match_and_visualize`] matches ORB descriptors between each
//!   template and the image and renders the confident pairings.
//! - [`template::binary_masks`] and [`labels::extract_objects`] prepare
//!   inputs: threshold masks for templates and boxes from PASCAL VOC files.
//!
//! Rasters are BGR or grayscale `u8` buffers. Batch inputs are
//! `&[Option<Raster>]` so unreadable files stay as `None` placeholders and are
//! skipped. Optional parallelism is available via the `rayon` feature, image
//! file loading via `image-io`, and structured diagnostics via `tracing`.

mod candidate;
pub mod features;
pub mod image;
pub mod kernel;
pub mod labels;
pub mod lowlevel;
pub mod search;
pub mod template;
mod trace;
pub mod util;

pub use features::{match_and_visualize, FeatureMatchConfig, FeatureMatchOutput, MatchSummary};
pub use image::grid::{compose_grid, mask_comparison_grid, GridConfig, GridLayout};
pub use image::{draw::draw_bounding_box, ImageView, OwnedImage, PixelFormat, Raster};
pub use labels::{extract_objects, extract_objects_from_path, BoundingBox, VocAnnotation, VocObject};
pub use search::{match_multiscale, Detection, Metric, MultiScaleConfig, MultiScaleOutput};
pub use template::{binary_mask, binary_masks, MaskConfig, Template};
pub use util::{ObjFindError, ObjFindResult};
