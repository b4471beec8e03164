//! Template-versus-image feature matching with side-by-side visualization.

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::features::matcher::{knn_match_hamming, ratio_test, GoodMatch};
use crate::features::orb::{Orb, OrbConfig};
use crate::features::{Descriptor, Feature};
use crate::image::draw::draw_match_pairs;
use crate::image::Raster;
use crate::trace::{trace_event, trace_span, trace_warn};
use crate::util::{ObjFindError, ObjFindResult};

/// Configuration for [`match_and_visualize`].
#[derive(Clone, Copy, Debug)]
pub struct FeatureMatchConfig {
    /// Detector settings shared by the image and every template.
    pub orb: OrbConfig,
    /// Minimum template keypoints and minimum good matches for an output.
    pub min_good_match_count: usize,
    /// Lowe ratio threshold; any finite positive value is accepted.
    pub ratio_test_thresh: f32,
    /// Match templates concurrently (requires the `rayon` feature).
    pub parallel: bool,
}

impl Default for FeatureMatchConfig {
    fn default() -> Self {
        Self {
            orb: OrbConfig::default(),
            min_good_match_count: 10,
            ratio_test_thresh: 0.75,
            parallel: false,
        }
    }
}

impl FeatureMatchConfig {
    /// Rejects a ratio threshold that is not finite and positive.
    pub fn validate(&self) -> ObjFindResult<()> {
        if !(self.ratio_test_thresh.is_finite() && self.ratio_test_thresh > 0.0) {
            return Err(ObjFindError::InvalidInput("ratio_test_thresh must be positive"));
        }
        Ok(())
    }
}

/// Counts reported for a template that produced a visualization.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchSummary {
    /// Position of the template in the input list.
    pub template_idx: usize,
    /// Keypoints detected on the template.
    pub num_keypoints_template: usize,
    /// Keypoints detected on the image.
    pub num_keypoints_image: usize,
    /// Matches that passed the ratio test.
    pub num_good_matches: usize,
}

/// Result of [`match_and_visualize`]. The three vectors are index-aligned.
#[derive(Clone, Debug, Default)]
pub struct FeatureMatchOutput {
    /// Template on the left, image on the right, matches joined by lines.
    pub visualizations: Vec<Raster>,
    /// Per-template counts.
    pub summaries: Vec<MatchSummary>,
    /// Ratio-test survivors; `query_idx` indexes template keypoints and
    /// `train_idx` image keypoints.
    pub good_matches: Vec<Vec<GoodMatch>>,
}

struct TemplateMatch {
    visualization: Raster,
    summary: MatchSummary,
    good: Vec<GoodMatch>,
}

/// Matches every template against `image` and visualizes the confident ones.
///
/// An image without keypoints yields an empty output. Templates that are
/// `None`, have too few keypoints, or too few good matches are omitted, as are
/// templates whose matching fails. Errors are returned only for invalid
/// configuration or an image that cannot be processed.
pub fn match_and_visualize(
    image: &Raster,
    templates: &[Option<Raster>],
    cfg: &FeatureMatchConfig,
) -> ObjFindResult<FeatureMatchOutput> {
    cfg.validate()?;
    let _span = trace_span!("match_and_visualize", templates = templates.len()).entered();

    let orb = Orb::new(cfg.orb)?;
    let image_features = orb.detect_and_compute(image.to_gray().view())?;
    if image_features.is_empty() {
        trace_warn!("no keypoints in image");
        return Ok(FeatureMatchOutput::default());
    }
    let image_descriptors: Vec<Descriptor> =
        image_features.iter().map(|f| f.descriptor).collect();

    let results = match_all(
        &orb,
        image,
        &image_features,
        &image_descriptors,
        templates,
        cfg,
    );

    let mut output = FeatureMatchOutput::default();
    for found in results.into_iter().flatten() {
        output.visualizations.push(found.visualization);
        output.summaries.push(found.summary);
        output.good_matches.push(found.good);
    }
    trace_event!("feature_matching_done", matched = output.summaries.len());
    Ok(output)
}

fn match_all(
    orb: &Orb,
    image: &Raster,
    image_features: &[Feature],
    image_descriptors: &[Descriptor],
    templates: &[Option<Raster>],
    cfg: &FeatureMatchConfig,
) -> Vec<Option<TemplateMatch>> {
    let run = |(idx, slot): (usize, &Option<Raster>)| -> Option<TemplateMatch> {
        let template = slot.as_ref()?;
        let matched = match_template(
            orb,
            image,
            image_features,
            image_descriptors,
            idx,
            template,
            cfg,
        );
        match matched {
            Ok(found) => found,
            Err(err) => {
                trace_warn!(
                    "template matching failed",
                    template_idx = idx,
                    reason = err.to_string().as_str(),
                );
                None
            }
        }
    };

    #[cfg(feature = "rayon")]
    if cfg.parallel {
        return templates.par_iter().enumerate().map(run).collect();
    }

    templates.iter().enumerate().map(run).collect()
}

fn match_template(
    orb: &Orb,
    image: &Raster,
    image_features: &[Feature],
    image_descriptors: &[Descriptor],
    template_idx: usize,
    template: &Raster,
    cfg: &FeatureMatchConfig,
) -> ObjFindResult<Option<TemplateMatch>> {
    let features = orb.detect_and_compute(template.to_gray().view())?;
    if features.is_empty() {
        trace_warn!("template has no descriptors", template_idx = template_idx);
        return Ok(None);
    }
    if features.len() < cfg.min_good_match_count {
        trace_warn!(
            "template has too few keypoints",
            template_idx = template_idx,
            keypoints = features.len(),
        );
        return Ok(None);
    }

    let descriptors: Vec<Descriptor> = features.iter().map(|f| f.descriptor).collect();
    let knn = knn_match_hamming(&descriptors, image_descriptors, 2);
    let good = ratio_test(&knn, cfg.ratio_test_thresh);
    if good.len() < cfg.min_good_match_count {
        trace_warn!(
            "not enough good matches",
            template_idx = template_idx,
            good = good.len(),
            required = cfg.min_good_match_count,
        );
        return Ok(None);
    }

    let pairs: Vec<_> = good
        .iter()
        .map(|m| {
            let t = features[m.query_idx].keypoint;
            let i = image_features[m.train_idx].keypoint;
            ((t.x, t.y), (i.x, i.y))
        })
        .collect();
    let visualization = draw_match_pairs(template, image, &pairs)?;

    trace_event!(
        "template_matched",
        template_idx = template_idx,
        keypoints = features.len(),
        good = good.len(),
    );
    Ok(Some(TemplateMatch {
        visualization,
        summary: MatchSummary {
            template_idx,
            num_keypoints_template: features.len(),
            num_keypoints_image: image_features.len(),
            num_good_matches: good.len(),
        },
        good,
    }))
}
