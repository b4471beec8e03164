//! Top-K candidate tracking for match peaks.

use std::cmp::Ordering;

/// Peak candidate: a template placement and its ranking score.
///
/// Higher `score` is always better; metrics where lower is better store a
/// negated value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Peak {
    /// X coordinate (column) of the placement's top-left corner.
    pub x: usize,
    /// Y coordinate (row) of the placement's top-left corner.
    pub y: usize,
    /// Ranking score at the placement.
    pub score: f32,
}

/// Orders by descending score, then row-major position.
///
/// Equal scores resolve to the placement a row-major scan meets first.
fn peak_cmp_desc(a: &Peak, b: &Peak) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.y.cmp(&b.y))
        .then_with(|| a.x.cmp(&b.x))
}

/// Sorts peaks by descending score with deterministic tie-breaking.
pub(crate) fn sort_peaks_desc(peaks: &mut [Peak]) {
    peaks.sort_by(peak_cmp_desc);
}

/// Top-K container with O(k) insertion cost.
pub struct TopK<T> {
    k: usize,
    items: Vec<T>,
}

impl TopK<Peak> {
    /// Creates a new Top-K collector.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            items: Vec::with_capacity(k),
        }
    }

    /// Pushes a peak, evicting the lowest score if at capacity.
    pub fn push(&mut self, peak: Peak) {
        if self.k == 0 {
            return;
        }
        if self.items.len() < self.k {
            self.items.push(peak);
            return;
        }

        let mut worst_idx = 0usize;
        for (idx, item) in self.items.iter().enumerate().skip(1) {
            if peak_cmp_desc(item, &self.items[worst_idx]) == Ordering::Greater {
                worst_idx = idx;
            }
        }

        if peak_cmp_desc(&peak, &self.items[worst_idx]) == Ordering::Less {
            self.items[worst_idx] = peak;
        }
    }

    /// Returns peaks sorted by descending score.
    pub fn into_sorted_desc(mut self) -> Vec<Peak> {
        sort_peaks_desc(&mut self.items);
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::{Peak, TopK};

    fn peak(x: usize, y: usize, score: f32) -> Peak {
        Peak { x, y, score }
    }

    #[test]
    fn keeps_highest_scores() {
        let mut topk = TopK::new(2);
        topk.push(peak(0, 0, 0.1));
        topk.push(peak(1, 0, 0.9));
        topk.push(peak(2, 0, 0.5));
        let kept = topk.into_sorted_desc();
        assert_eq!(kept, vec![peak(1, 0, 0.9), peak(2, 0, 0.5)]);
    }

    #[test]
    fn ties_keep_first_in_row_major_order() {
        let mut topk = TopK::new(1);
        topk.push(peak(3, 1, 0.5));
        topk.push(peak(0, 2, 0.5));
        topk.push(peak(5, 1, 0.5));
        assert_eq!(topk.into_sorted_desc(), vec![peak(3, 1, 0.5)]);
    }
}
