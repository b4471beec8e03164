//! Template storage, masks and planning utilities.

use crate::image::resize::resize_u8_bilinear;
use crate::image::{ImageView, OwnedImage, PixelFormat, Raster};
use crate::util::math::scaled_extent;
use crate::util::{ObjFindError, ObjFindResult};

mod mask;
mod plan;

pub use mask::{binary_mask, binary_masks, MaskConfig};
pub use plan::{MaskedSsdTemplatePlan, MaskedTemplatePlan};

/// Grayscale template paired with a same-sized mask.
///
/// Mask pixels with a non-zero value take part in matching.
#[derive(Clone, Debug)]
pub struct Template {
    img: OwnedImage,
    mask: OwnedImage,
}

impl Template {
    /// Creates a template from a contiguous grayscale buffer.
    ///
    /// The template doubles as its own mask: zero-valued pixels are ignored.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> ObjFindResult<Self> {
        let img = OwnedImage::new(data, width, height)?;
        let mask = img.clone();
        Ok(Self { img, mask })
    }

    /// Creates a template with an explicit mask.
    pub fn with_mask(img: OwnedImage, mask: OwnedImage) -> ObjFindResult<Self> {
        if img.width() != mask.width() || img.height() != mask.height() {
            return Err(ObjFindError::InvalidInput(
                "mask dimensions must match the template",
            ));
        }
        Ok(Self { img, mask })
    }

    /// Prepares a raster for matching.
    ///
    /// Color templates are converted to grayscale and masked with
    /// [`binary_mask`] at `threshold_value`. Grayscale templates are their own
    /// mask.
    pub fn from_raster(raster: &Raster, threshold_value: u8) -> Self {
        let img = raster.to_gray();
        let mask = match raster.format() {
            PixelFormat::Bgr => binary_mask(
                raster,
                MaskConfig {
                    threshold_value,
                    ..MaskConfig::default()
                },
            ),
            PixelFormat::Gray => img.clone(),
        };
        Self { img, mask }
    }

    /// Returns a borrowed view of the template data.
    pub fn view(&self) -> ImageView<'_, u8> {
        self.img.view()
    }

    /// Returns a borrowed view of the mask.
    pub fn mask_view(&self) -> ImageView<'_, u8> {
        self.mask.view()
    }

    /// Returns the template width in pixels.
    pub fn width(&self) -> usize {
        self.img.width()
    }

    /// Returns the template height in pixels.
    pub fn height(&self) -> usize {
        self.img.height()
    }

    /// Resizes the template by `scale` on both axes.
    ///
    /// The output size is `round(w * scale) x round(h * scale)`; the mask is
    /// resized to exactly that size so the pair always lines up.
    pub fn scaled(&self, scale: f64) -> ObjFindResult<Template> {
        let width = scaled_extent(self.width(), scale);
        let height = scaled_extent(self.height(), scale);
        let img = resize_u8_bilinear(self.view(), width, height)?;
        let mask = resize_u8_bilinear(self.mask_view(), img.width(), img.height())?;
        Ok(Self { img, mask })
    }
}
