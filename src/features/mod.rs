//! ORB keypoints, binary descriptors and descriptor matching.
//!
//! Keypoints are FAST-9 corners ranked by Harris response on a geometric
//! scale pyramid, oriented by intensity centroid and described by a rotated
//! 256-bit BRIEF test pattern.

mod fast;
mod matcher;
mod orb;
mod pattern;
mod pipeline;

pub use fast::{harris_response, is_fast_corner};
pub use matcher::{hamming, knn_match_hamming, ratio_test, GoodMatch, KnnMatch};
pub use orb::{Orb, OrbConfig};
pub use pipeline::{match_and_visualize, FeatureMatchConfig, FeatureMatchOutput, MatchSummary};

/// 256-bit binary descriptor = 32 bytes.
pub type Descriptor = [u8; 32];

/// Oriented keypoint in base-image pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keypoint {
    /// Column in base-image pixels.
    pub x: f32,
    /// Row in base-image pixels.
    pub y: f32,
    /// Orientation in radians.
    pub angle: f32,
    /// Harris corner response at the detection level.
    pub response: f32,
    /// Pyramid level the keypoint was detected on.
    pub octave: u8,
    /// Diameter of the described patch in base-image pixels.
    pub size: f32,
}

/// A keypoint and its descriptor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Feature {
    /// Detected keypoint.
    pub keypoint: Keypoint,
    /// Rotated BRIEF descriptor of the keypoint's patch.
    pub descriptor: Descriptor,
}
