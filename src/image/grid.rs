//! Mosaic composition for batches of result images.
//!
//! A grid gathers optional rasters (for example a template list that contains
//! unreadable entries) into a single BGR image that can be saved or shown.

use image::imageops;

use crate::image::draw::{canvas_from_raster, raster_from_canvas, BgrCanvas};
use crate::image::Raster;
use crate::trace::trace_debug;
use crate::util::math::div_ceil;
use crate::util::{ObjFindError, ObjFindResult};

/// Resolved number of rows and columns for a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridLayout {
    pub rows: usize,
    pub cols: usize,
}

impl GridLayout {
    /// Resolves a layout for `count` cells.
    ///
    /// With neither dimension given, `cols = ceil(sqrt(count))` and rows follow.
    /// With one given, the other is derived by ceiling division. Both given are
    /// used as-is. Every dimension is at least 1.
    pub fn resolve(count: usize, rows: Option<usize>, cols: Option<usize>) -> Self {
        let (rows, cols) = match (rows, cols) {
            (Some(rows), Some(cols)) => (rows, cols),
            (Some(rows), None) => (rows, div_ceil(count, rows)),
            (None, Some(cols)) => (div_ceil(count, cols), cols),
            (None, None) => {
                let cols = (count as f64).sqrt().ceil() as usize;
                (div_ceil(count, cols), cols)
            }
        };
        Self {
            rows: rows.max(1),
            cols: cols.max(1),
        }
    }

    /// Returns the number of cells.
    pub fn capacity(&self) -> usize {
        self.rows * self.cols
    }
}

/// Grid composition parameters.
#[derive(Clone, Copy, Debug)]
pub struct GridConfig {
    /// Fixed row count, derived when `None`.
    pub rows: Option<usize>,
    /// Fixed column count, derived when `None`.
    pub cols: Option<usize>,
    /// Gap between cells in pixels.
    pub spacing: usize,
    /// Background color in BGR order.
    pub background: [u8; 3],
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: None,
            cols: None,
            spacing: 8,
            background: [255, 255, 255],
        }
    }
}

/// Tiles rasters row-major into one BGR image.
///
/// Cells are as large as the largest input. `None` entries leave their cell
/// blank, and entries beyond the layout capacity are ignored.
pub fn compose_grid(images: &[Option<Raster>], cfg: GridConfig) -> ObjFindResult<Raster> {
    if images.is_empty() {
        return Err(ObjFindError::InvalidInput("grid needs at least one image slot"));
    }
    let layout = GridLayout::resolve(images.len(), cfg.rows, cfg.cols);
    let cell_w = images.iter().flatten().map(Raster::width).max().unwrap_or(1);
    let cell_h = images.iter().flatten().map(Raster::height).max().unwrap_or(1);

    let width = layout.cols * cell_w + (layout.cols - 1) * cfg.spacing;
    let height = layout.rows * cell_h + (layout.rows - 1) * cfg.spacing;
    let mut canvas =
        BgrCanvas::from_pixel(width as u32, height as u32, image::Rgb(cfg.background));

    for (idx, slot) in images.iter().enumerate().take(layout.capacity()) {
        let Some(raster) = slot else {
            trace_debug!("grid cell left blank", cell = idx);
            continue;
        };
        let row = idx / layout.cols;
        let col = idx % layout.cols;
        let x = col * (cell_w + cfg.spacing);
        let y = row * (cell_h + cfg.spacing);
        let tile = canvas_from_raster(raster)?;
        imageops::replace(&mut canvas, &tile, x as i64, y as i64);
    }

    raster_from_canvas(canvas)
}

/// Lays out templates next to their masks, one pair per row.
///
/// At most `max_display` pairs are shown. Pairs where either side is `None`
/// are left blank.
pub fn mask_comparison_grid(
    templates: &[Option<Raster>],
    masks: &[Option<Raster>],
    max_display: usize,
) -> ObjFindResult<Raster> {
    let count = templates.len().min(masks.len()).min(max_display);
    let mut cells = Vec::with_capacity(count * 2);
    for (template, mask) in templates.iter().zip(masks).take(count) {
        match (template, mask) {
            (Some(template), Some(mask)) => {
                cells.push(Some(template.clone()));
                cells.push(Some(mask.clone()));
            }
            _ => {
                cells.push(None);
                cells.push(None);
            }
        }
    }
    compose_grid(
        &cells,
        GridConfig {
            cols: Some(2),
            ..GridConfig::default()
        },
    )
}
