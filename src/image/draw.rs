//! Annotation primitives drawn with `imageproc`.
//!
//! Canvases are `image::ImageBuffer<Rgb<u8>, _>` holding BGR bytes; the `Rgb`
//! pixel type only serves as a three-channel container here, so colors below
//! are written in B, G, R order.

use image::{imageops, ImageBuffer, Rgb};
use imageproc::drawing::{draw_hollow_circle_mut, draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;

use crate::image::{PixelFormat, Raster};
use crate::util::{ObjFindError, ObjFindResult};

/// Three-channel canvas in BGR byte order.
pub type BgrCanvas = ImageBuffer<Rgb<u8>, Vec<u8>>;

/// Pure red in BGR order.
pub const RED: [u8; 3] = [0, 0, 255];

/// Line thickness used by [`draw_bounding_box`].
pub const BOX_THICKNESS: i32 = 2;

const KEYPOINT_RADIUS: i32 = 4;

const MATCH_PALETTE: [[u8; 3]; 8] = [
    [0, 255, 0],
    [255, 128, 0],
    [0, 200, 255],
    [255, 0, 255],
    [0, 255, 255],
    [255, 255, 0],
    [128, 0, 255],
    [0, 128, 255],
];

/// Converts a raster into a BGR canvas, promoting grayscale.
pub fn canvas_from_raster(raster: &Raster) -> ObjFindResult<BgrCanvas> {
    let width = raster.width();
    let height = raster.height();
    BgrCanvas::from_raw(width as u32, height as u32, raster.to_bgr().into_data())
        .ok_or(ObjFindError::InvalidDimensions { width, height })
}

/// Converts a canvas back into a BGR raster.
pub fn raster_from_canvas(canvas: BgrCanvas) -> ObjFindResult<Raster> {
    let width = canvas.width() as usize;
    let height = canvas.height() as usize;
    Raster::new(canvas.into_raw(), width, height, PixelFormat::Bgr)
}

/// Draws an axis-aligned rectangle between two inclusive corners.
///
/// The stroke is `thickness` pixels wide and centered on the nominal edge;
/// parts falling outside the canvas are clipped.
pub fn draw_rectangle_mut(
    canvas: &mut BgrCanvas,
    top_left: (i32, i32),
    bottom_right: (i32, i32),
    color: [u8; 3],
    thickness: i32,
) {
    let thickness = thickness.max(1);
    let (x1, y1) = top_left;
    let (x2, y2) = bottom_right;
    for offset in -(thickness / 2)..=((thickness - 1) / 2) {
        let w = x2 - x1 + 2 * offset + 1;
        let h = y2 - y1 + 2 * offset + 1;
        if w <= 0 || h <= 0 {
            continue;
        }
        let rect = Rect::at(x1 - offset, y1 - offset).of_size(w as u32, h as u32);
        draw_hollow_rect_mut(canvas, rect, Rgb(color));
    }
}

/// Returns a BGR copy of `raster` with a red box between two corners.
pub fn draw_bounding_box(
    raster: &Raster,
    top_left: (i32, i32),
    bottom_right: (i32, i32),
) -> ObjFindResult<Raster> {
    let mut canvas = canvas_from_raster(raster)?;
    draw_rectangle_mut(&mut canvas, top_left, bottom_right, RED, BOX_THICKNESS);
    raster_from_canvas(canvas)
}

/// Places `left` and `right` side by side and connects matched points.
///
/// Each pair holds a point in `left` coordinates and a point in `right`
/// coordinates. Only the paired points are marked; the canvas height is the
/// taller of the two inputs and uncovered pixels are black.
pub fn draw_match_pairs(
    left: &Raster,
    right: &Raster,
    pairs: &[((f32, f32), (f32, f32))],
) -> ObjFindResult<Raster> {
    let left_canvas = canvas_from_raster(left)?;
    let right_canvas = canvas_from_raster(right)?;
    let width = left.width() + right.width();
    let height = left.height().max(right.height());
    let mut canvas = BgrCanvas::new(width as u32, height as u32);
    imageops::replace(&mut canvas, &left_canvas, 0, 0);
    imageops::replace(&mut canvas, &right_canvas, left.width() as i64, 0);

    let offset = left.width() as f32;
    for (idx, &((lx, ly), (rx, ry))) in pairs.iter().enumerate() {
        let color = Rgb(MATCH_PALETTE[idx % MATCH_PALETTE.len()]);
        let start = (lx, ly);
        let end = (rx + offset, ry);
        draw_hollow_circle_mut(
            &mut canvas,
            (start.0.round() as i32, start.1.round() as i32),
            KEYPOINT_RADIUS,
            color,
        );
        draw_hollow_circle_mut(
            &mut canvas,
            (end.0.round() as i32, end.1.round() as i32),
            KEYPOINT_RADIUS,
            color,
        );
        draw_line_segment_mut(&mut canvas, start, end, color);
    }

    raster_from_canvas(canvas)
}

#[cfg(test)]
mod tests {
    use super::{draw_bounding_box, draw_match_pairs, RED};
    use crate::image::{PixelFormat, Raster};

    #[test]
    fn bounding_box_marks_corners_and_keeps_interior() {
        let raster = Raster::filled(20, 20, PixelFormat::Gray, [0, 0, 0]).unwrap();
        let boxed = draw_bounding_box(&raster, (5, 5), (14, 14)).unwrap();
        assert_eq!(boxed.format(), PixelFormat::Bgr);
        assert_eq!(boxed.pixel(5, 5).unwrap(), &RED);
        assert_eq!(boxed.pixel(14, 9).unwrap(), &RED);
        assert_eq!(boxed.pixel(10, 10).unwrap(), &[0, 0, 0]);
        assert_eq!(boxed.pixel(0, 0).unwrap(), &[0, 0, 0]);
    }

    #[test]
    fn match_canvas_spans_both_inputs() {
        let left = Raster::filled(10, 6, PixelFormat::Gray, [200, 0, 0]).unwrap();
        let right = Raster::filled(15, 12, PixelFormat::Bgr, [1, 2, 3]).unwrap();
        let out = draw_match_pairs(&left, &right, &[]).unwrap();
        assert_eq!(out.width(), 25);
        assert_eq!(out.height(), 12);
        assert_eq!(out.pixel(0, 0).unwrap(), &[200, 200, 200]);
        assert_eq!(out.pixel(0, 11).unwrap(), &[0, 0, 0]);
        assert_eq!(out.pixel(10, 0).unwrap(), &[1, 2, 3]);
    }
}
