//! Bilinear resampling for template scale sweeps and ORB pyramids.

use crate::image::{ImageView, OwnedImage};
use crate::util::{ObjFindError, ObjFindResult};

/// Resizes a grayscale image to `dst_width x dst_height` with bilinear sampling.
///
/// Destination pixel centers map back to the source with
/// `src = (dst + 0.5) * (src_len / dst_len) - 0.5`, so a same-size resize is
/// an exact copy. Samples are clamped to the source border and rounded to the
/// nearest integer.
pub fn resize_u8_bilinear(
    src: ImageView<'_, u8>,
    dst_width: usize,
    dst_height: usize,
) -> ObjFindResult<OwnedImage> {
    if dst_width == 0 || dst_height == 0 {
        return Err(ObjFindError::InvalidDimensions {
            width: dst_width,
            height: dst_height,
        });
    }
    let width = src.width();
    let height = src.height();
    if width == dst_width && height == dst_height {
        return OwnedImage::from_view(src);
    }

    let sx = width as f32 / dst_width as f32;
    let sy = height as f32 / dst_height as f32;
    let max_x = width as f32 - 1.0;
    let max_y = height as f32 - 1.0;

    // Horizontal taps are identical for every row.
    let taps: Vec<(usize, usize, f32)> = (0..dst_width)
        .map(|x| {
            let src_x = ((x as f32 + 0.5) * sx - 0.5).clamp(0.0, max_x);
            let x0 = src_x.floor() as usize;
            let x1 = (x0 + 1).min(width - 1);
            (x0, x1, src_x - x0 as f32)
        })
        .collect();

    let mut out = Vec::with_capacity(dst_width * dst_height);
    for y in 0..dst_height {
        let src_y = ((y as f32 + 0.5) * sy - 0.5).clamp(0.0, max_y);
        let y0 = src_y.floor() as usize;
        let y1 = (y0 + 1).min(height - 1);
        let fy = src_y - y0 as f32;

        let row0 = src.row(y0).ok_or(ObjFindError::BufferTooSmall {
            needed: (y0 + 1) * src.stride(),
            got: src.as_slice().len(),
        })?;
        let row1 = src.row(y1).ok_or(ObjFindError::BufferTooSmall {
            needed: (y1 + 1) * src.stride(),
            got: src.as_slice().len(),
        })?;

        for &(x0, x1, fx) in &taps {
            let a = row0[x0] as f32;
            let b = row0[x1] as f32;
            let c = row1[x0] as f32;
            let d = row1[x1] as f32;

            let w00 = (1.0 - fx) * (1.0 - fy);
            let w10 = fx * (1.0 - fy);
            let w01 = (1.0 - fx) * fy;
            let w11 = fx * fy;
            let value = a * w00 + b * w10 + c * w01 + d * w11;
            out.push(value.round().clamp(0.0, 255.0) as u8);
        }
    }

    OwnedImage::new(out, dst_width, dst_height)
}
