//! Brute-force Hamming matching and the ratio test.

use crate::features::Descriptor;

/// Number of differing bits between two descriptors.
#[inline]
pub fn hamming(a: &Descriptor, b: &Descriptor) -> u32 {
    a.iter().zip(b).map(|(x, y)| (x ^ y).count_ones()).sum()
}

/// One neighbour of a query descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KnnMatch {
    /// Index into the query descriptors.
    pub query_idx: usize,
    /// Index into the train descriptors.
    pub train_idx: usize,
    /// Hamming distance between the two.
    pub distance: u32,
}

/// A match that passed the ratio test.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GoodMatch {
    /// Index into the query descriptors.
    pub query_idx: usize,
    /// Index of the best train descriptor.
    pub train_idx: usize,
    /// Distance to the best neighbour.
    pub distance: u32,
    /// Distance to the runner-up neighbour.
    pub second_distance: u32,
}

/// Returns up to `k` nearest train descriptors for every query descriptor.
///
/// Neighbours are ordered by ascending distance, ties by ascending train
/// index. The outer vector is indexed by query.
pub fn knn_match_hamming(
    query: &[Descriptor],
    train: &[Descriptor],
    k: usize,
) -> Vec<Vec<KnnMatch>> {
    query
        .iter()
        .enumerate()
        .map(|(query_idx, q)| {
            let mut neighbours: Vec<KnnMatch> = train
                .iter()
                .enumerate()
                .map(|(train_idx, t)| KnnMatch {
                    query_idx,
                    train_idx,
                    distance: hamming(q, t),
                })
                .collect();
            neighbours.sort_by_key(|m| (m.distance, m.train_idx));
            neighbours.truncate(k);
            neighbours
        })
        .collect()
}

/// Keeps queries whose best distance is strictly below `thresh` times the
/// second best. Queries with fewer than two neighbours are dropped.
pub fn ratio_test(knn: &[Vec<KnnMatch>], thresh: f32) -> Vec<GoodMatch> {
    knn.iter()
        .filter_map(|neighbours| match neighbours.as_slice() {
            [best, second, ..] if (best.distance as f32) < thresh * second.distance as f32 => {
                Some(GoodMatch {
                    query_idx: best.query_idx,
                    train_idx: best.train_idx,
                    distance: best.distance,
                    second_distance: second.distance,
                })
            }
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desc(fill: u8) -> Descriptor {
        [fill; 32]
    }

    fn knn(query_idx: usize, train_idx: usize, distance: u32) -> KnnMatch {
        KnnMatch {
            query_idx,
            train_idx,
            distance,
        }
    }

    #[test]
    fn hamming_counts_bits() {
        assert_eq!(hamming(&desc(0), &desc(0)), 0);
        assert_eq!(hamming(&desc(0), &desc(0xff)), 256);
        assert_eq!(hamming(&desc(0b1010), &desc(0)), 64);
    }

    #[test]
    fn knn_orders_by_distance_then_index() {
        let train = [desc(0xff), desc(0x01), desc(0x01), desc(0x00)];
        let knn = knn_match_hamming(&[desc(0)], &train, 2);
        assert_eq!(knn.len(), 1);
        let ids: Vec<_> = knn[0].iter().map(|m| m.train_idx).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn ratio_test_is_strict_and_needs_two_neighbours() {
        let neighbours = vec![
            vec![knn(0, 4, 10), knn(0, 2, 40)],
            vec![knn(1, 0, 30), knn(1, 1, 40)],
            vec![knn(2, 3, 1)],
        ];
        let good = ratio_test(&neighbours, 0.75);
        assert_eq!(good.len(), 1);
        assert_eq!(good[0].query_idx, 0);
        assert_eq!(good[0].train_idx, 4);
        assert_eq!(good[0].second_distance, 40);
    }
}
