//! FAST-9 corner test and Harris corner response.

use crate::ImageView;

/// Bresenham circle of radius 3 used by the FAST segment test.
const CIRCLE: [(i32, i32); 16] = [
    (0, -3),
    (1, -3),
    (2, -2),
    (3, -1),
    (3, 0),
    (3, 1),
    (2, 2),
    (1, 3),
    (0, 3),
    (-1, 3),
    (-2, 2),
    (-3, 1),
    (-3, 0),
    (-3, -1),
    (-2, -2),
    (-1, -3),
];

/// Contiguous arc length required by FAST-9.
const ARC_LEN: usize = 9;

const HARRIS_BLOCK_RADIUS: i32 = 3;

/// Distance from the pixel to the image border that both tests need.
pub(crate) const CORNER_MARGIN: usize = 4;

fn px(image: ImageView<'_, u8>, x: i32, y: i32) -> i32 {
    image.get(x as usize, y as usize).map_or(0, |&v| v as i32)
}

/// Returns true when at least 9 contiguous circle pixels are all brighter than
/// `center + threshold` or all darker than `center - threshold`.
///
/// Pixels closer than 3 to the border are never corners.
pub fn is_fast_corner(image: ImageView<'_, u8>, x: usize, y: usize, threshold: u8) -> bool {
    if x < 3 || y < 3 || x + 3 >= image.width() || y + 3 >= image.height() {
        return false;
    }
    let (cx, cy) = (x as i32, y as i32);
    let center = px(image, cx, cy);
    let t = threshold as i32;

    // -1 darker, 1 brighter, 0 similar.
    let mut states = [0i8; 16];
    for (state, &(dx, dy)) in states.iter_mut().zip(CIRCLE.iter()) {
        let v = px(image, cx + dx, cy + dy);
        *state = if v > center + t {
            1
        } else if v < center - t {
            -1
        } else {
            0
        };
    }

    for target in [1i8, -1] {
        let mut run = 0usize;
        // Walk the circle twice so arcs that wrap around are counted.
        for i in 0..32 {
            if states[i % 16] == target {
                run += 1;
                if run >= ARC_LEN {
                    return true;
                }
            } else {
                run = 0;
            }
        }
    }
    false
}

/// Harris corner response over a 7x7 block of Sobel gradients.
///
/// Returns `0.0` when the block does not fit inside the image.
pub fn harris_response(image: ImageView<'_, u8>, x: usize, y: usize, k: f32) -> f32 {
    let reach = HARRIS_BLOCK_RADIUS as usize + 1;
    if x < reach || y < reach || x + reach >= image.width() || y + reach >= image.height() {
        return 0.0;
    }
    let (cx, cy) = (x as i32, y as i32);
    let mut a = 0.0f32;
    let mut b = 0.0f32;
    let mut c = 0.0f32;
    for dy in -HARRIS_BLOCK_RADIUS..=HARRIS_BLOCK_RADIUS {
        for dx in -HARRIS_BLOCK_RADIUS..=HARRIS_BLOCK_RADIUS {
            let (u, v) = (cx + dx, cy + dy);
            let gx = (px(image, u + 1, v - 1) + 2 * px(image, u + 1, v) + px(image, u + 1, v + 1))
                - (px(image, u - 1, v - 1) + 2 * px(image, u - 1, v) + px(image, u - 1, v + 1));
            let gy = (px(image, u - 1, v + 1) + 2 * px(image, u, v + 1) + px(image, u + 1, v + 1))
                - (px(image, u - 1, v - 1) + 2 * px(image, u, v - 1) + px(image, u + 1, v - 1));
            let (gx, gy) = (gx as f32, gy as f32);
            a += gx * gx;
            b += gy * gy;
            c += gx * gy;
        }
    }
    // Normalize so responses stay in a comfortable f32 range.
    let norm = 1.0 / (4.0 * 255.0 * 49.0);
    let (a, b, c) = (a * norm * norm, b * norm * norm, c * norm * norm);
    a * b - c * c - k * (a + b) * (a + b)
}
