//! Scale sweep driver and result annotation.

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::image::draw::{canvas_from_raster, draw_rectangle_mut, raster_from_canvas, RED};
use crate::image::Raster;
use crate::search::scan::best_placement;
use crate::search::{Detection, MultiScaleConfig, MultiScaleOutput};
use crate::template::Template;
use crate::trace::{trace_event, trace_span, trace_warn};
use crate::util::math::linspace;
use crate::util::ObjFindResult;
use crate::ImageView;

/// Locates each template in `image` at its best scale and draws the boxes.
///
/// `None` templates are skipped. A template whose every scale fails to
/// produce a score (too large, empty mask, flat template) yields no detection.
/// Errors are returned only for invalid configuration.
pub fn match_multiscale(
    image: &Raster,
    templates: &[Option<Raster>],
    cfg: &MultiScaleConfig,
) -> ObjFindResult<MultiScaleOutput> {
    cfg.validate()?;
    let _span = trace_span!(
        "match_multiscale",
        templates = templates.len(),
        steps = cfg.scale_steps
    )
    .entered();

    let gray = image.to_gray();
    let scales = linspace(cfg.scale_range.0, cfg.scale_range.1, cfg.scale_steps);
    let found = search_all(gray.view(), templates, &scales, cfg);

    let mut canvas = canvas_from_raster(image)?;
    let mut locations = Vec::new();
    let mut detections = Vec::new();
    for det in found.into_iter().flatten() {
        let top_left = (det.x as i32, det.y as i32);
        let bottom_right = ((det.x + det.width) as i32, (det.y + det.height) as i32);
        draw_rectangle_mut(&mut canvas, top_left, bottom_right, RED, cfg.box_thickness);
        locations.push((det.x, det.y));
        detections.push(det);
    }

    trace_event!("multiscale_done", detections = detections.len());
    Ok(MultiScaleOutput {
        annotated: raster_from_canvas(canvas)?,
        locations,
        detections,
    })
}

fn search_all(
    image: ImageView<'_, u8>,
    templates: &[Option<Raster>],
    scales: &[f64],
    cfg: &MultiScaleConfig,
) -> Vec<Option<Detection>> {
    #[cfg(feature = "rayon")]
    if cfg.parallel {
        return templates
            .par_iter()
            .enumerate()
            .map(|(idx, slot)| {
                slot.as_ref()
                    .and_then(|raster| search_template(image, idx, raster, scales, cfg))
            })
            .collect();
    }

    templates
        .iter()
        .enumerate()
        .map(|(idx, slot)| {
            slot.as_ref()
                .and_then(|raster| search_template(image, idx, raster, scales, cfg))
        })
        .collect()
}

/// Sweeps `scales` for one template and returns its best placement.
///
/// Scales are tried in order and a later scale replaces the current best
/// only with a strictly better score. A scale that cannot be scored is
/// skipped.
pub fn search_template(
    image: ImageView<'_, u8>,
    template_idx: usize,
    raster: &Raster,
    scales: &[f64],
    cfg: &MultiScaleConfig,
) -> Option<Detection> {
    let template = Template::from_raster(raster, cfg.threshold_value);
    let mut best: Option<(f32, Detection)> = None;

    for &scale in scales {
        let scored = template.scaled(scale).and_then(|scaled| {
            let peak = best_placement(image, &scaled, cfg.metric, cfg.min_var_i)?;
            Ok((scaled.width(), scaled.height(), peak))
        });
        let (width, height, peak) = match scored {
            Ok(scored) => scored,
            Err(err) => {
                trace_warn!(
                    "scale skipped",
                    template_idx = template_idx,
                    scale = scale,
                    reason = err.to_string().as_str(),
                );
                continue;
            }
        };
        if best.as_ref().is_some_and(|(rank, _)| peak.score <= *rank) {
            continue;
        }
        best = Some((
            peak.score,
            Detection {
                template_idx,
                x: peak.x,
                y: peak.y,
                width,
                height,
                scale,
                score: cfg.metric.to_rank(peak.score),
            },
        ));
    }

    match best {
        Some((_, det)) => {
            trace_event!(
                "template_located",
                template_idx = template_idx,
                x = det.x,
                y = det.y,
                scale = det.scale,
                score = det.score as f64,
            );
            Some(det)
        }
        None => {
            trace_warn!("template not located", template_idx = template_idx);
            None
        }
    }
}
