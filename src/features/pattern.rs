//! Sampling pattern for rotated BRIEF.

use std::sync::OnceLock;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Number of intensity comparisons per descriptor.
pub(crate) const PATTERN_LEN: usize = 256;

/// Largest absolute offset of a test point from the keypoint.
pub(crate) const PATTERN_EXTENT: i8 = 13;

const PATTERN_SEED: u64 = 0x0b5e_55ed_0f0b_0001;

/// Point pairs `(x1, y1, x2, y2)` relative to the keypoint.
///
/// The pattern is drawn once from a fixed seed, so every descriptor in a
/// process (and across runs of the same build) uses identical tests.
pub(crate) fn brief_pattern() -> &'static [[i8; 4]; PATTERN_LEN] {
    static PATTERN: OnceLock<[[i8; 4]; PATTERN_LEN]> = OnceLock::new();
    PATTERN.get_or_init(|| {
        let mut rng = StdRng::seed_from_u64(PATTERN_SEED);
        let mut pattern = [[0i8; 4]; PATTERN_LEN];
        for pair in pattern.iter_mut() {
            loop {
                for coord in pair.iter_mut() {
                    *coord = rng.random_range(-PATTERN_EXTENT..=PATTERN_EXTENT);
                }
                if pair[0..2] != pair[2..4] {
                    break;
                }
            }
        }
        pattern
    })
}
