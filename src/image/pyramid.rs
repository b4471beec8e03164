//! Geometric scale pyramid for grayscale `u8` images.
//!
//! Level `i` is the base image resized by `1 / scale_factor^i` with bilinear
//! sampling. Construction stops early once a level would fall below
//! `min_side` pixels on either axis.

use crate::image::resize::resize_u8_bilinear;
use crate::image::{ImageView, OwnedImage};
use crate::util::ObjFindResult;

/// A single pyramid level and its scale relative to the base image.
pub(crate) struct PyramidLevel {
    pub(crate) image: OwnedImage,
    /// Multiply level coordinates by this to get base coordinates.
    pub(crate) scale: f32,
}

/// Owned image pyramid built from a base level.
pub(crate) struct ScalePyramid {
    levels: Vec<PyramidLevel>,
}

impl ScalePyramid {
    /// Builds up to `max_levels` levels (at least the base level).
    pub(crate) fn build(
        base: ImageView<'_, u8>,
        max_levels: usize,
        scale_factor: f32,
        min_side: usize,
    ) -> ObjFindResult<Self> {
        let max_levels = max_levels.max(1);
        let mut levels = vec![PyramidLevel {
            image: OwnedImage::from_view(base)?,
            scale: 1.0,
        }];

        let mut scale = 1.0f32;
        while levels.len() < max_levels {
            scale *= scale_factor;
            let width = (base.width() as f32 / scale).round() as usize;
            let height = (base.height() as f32 / scale).round() as usize;
            if width < min_side || height < min_side {
                break;
            }
            let image = resize_u8_bilinear(base, width, height)?;
            levels.push(PyramidLevel { image, scale });
        }

        Ok(Self { levels })
    }

    /// Returns all pyramid levels (level 0 is the base resolution).
    pub(crate) fn levels(&self) -> &[PyramidLevel] {
        &self.levels
    }
}

#[cfg(test)]
mod tests {
    use super::ScalePyramid;
    use crate::image::ImageView;

    #[test]
    fn levels_shrink_by_scale_factor() {
        let data = vec![9u8; 100 * 80];
        let view = ImageView::from_slice(&data, 100, 80).unwrap();
        let pyramid = ScalePyramid::build(view, 3, 2.0, 1).unwrap();
        let sizes: Vec<_> = pyramid
            .levels()
            .iter()
            .map(|l| (l.image.width(), l.image.height()))
            .collect();
        assert_eq!(sizes, vec![(100, 80), (50, 40), (25, 20)]);
        assert!((pyramid.levels()[2].scale - 4.0).abs() < 1e-6);
    }

    #[test]
    fn stops_before_levels_get_too_small() {
        let data = vec![9u8; 40 * 40];
        let view = ImageView::from_slice(&data, 40, 40).unwrap();
        let pyramid = ScalePyramid::build(view, 8, 2.0, 15).unwrap();
        assert_eq!(pyramid.levels().len(), 2);
    }
}
