// Nearest-neighbour search over a small normalized feature space.

use crate::player::PlayerRecord;

/// Mean and standard deviation of one feature across a candidate pool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoolStats {
    pub mean: f64,
    pub stdev: f64,
}

/// Threshold below which standard deviation is treated as zero.
const STDEV_EPSILON: f64 = 1e-9;

/// Number of features compared.
pub const FEATURE_COUNT: usize = 5;

/// Mean and population standard deviation of a slice of values.
///
/// Returns zeros for an empty slice.
pub fn compute_pool_stats(values: &[f64]) -> PoolStats {
    if values.is_empty() {
        return PoolStats {
            mean: 0.0,
            stdev: 0.0,
        };
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    PoolStats {
        mean,
        stdev: variance.sqrt(),
    }
}

/// Z-score of a value; zero when the pool has no spread.
pub fn compute_zscore(value: f64, stats: &PoolStats) -> f64 {
    if stats.stdev < STDEV_EPSILON {
        return 0.0;
    }
    (value - stats.mean) / stats.stdev
}

/// Raw feature vector: points, rebounds, assists, efficiency, usage.
pub fn feature_vector(p: &PlayerRecord) -> [f64; FEATURE_COUNT] {
    [
        p.stats.pts,
        p.stats.trb,
        p.stats.ast,
        p.efficiency_rating,
        p.usage_rate,
    ]
}

fn normalize(raw: &[f64; FEATURE_COUNT], stats: &[PoolStats; FEATURE_COUNT]) -> [f64; FEATURE_COUNT] {
    std::array::from_fn(|i| compute_zscore(raw[i], &stats[i]))
}

/// A neighbour and its distance from the reference player.
#[derive(Debug, Clone, Copy)]
pub struct SimilarPlayer<'a> {
    pub player: &'a PlayerRecord,
    pub distance: f64,
}

/// The `k` players in `pool` closest to `reference`.
///
/// Features are z-scored with the pool's own mean and spread, computed on
/// each call. The reference player (matched by name) never appears in the
/// result. Equal distances are ordered by name.
pub fn find_similar<'a, I>(reference: &PlayerRecord, pool: I, k: usize) -> Vec<SimilarPlayer<'a>>
where
    I: IntoIterator<Item = &'a PlayerRecord>,
{
    let pool: Vec<&PlayerRecord> = pool.into_iter().collect();
    if k == 0 || pool.is_empty() {
        return Vec::new();
    }

    let raw: Vec<[f64; FEATURE_COUNT]> = pool.iter().map(|p| feature_vector(p)).collect();
    let stats: [PoolStats; FEATURE_COUNT] = std::array::from_fn(|i| {
        let column: Vec<f64> = raw.iter().map(|v| v[i]).collect();
        compute_pool_stats(&column)
    });

    let target = normalize(&feature_vector(reference), &stats);

    let mut neighbours: Vec<SimilarPlayer<'a>> = pool
        .iter()
        .zip(&raw)
        .filter(|(p, _)| p.name != reference.name)
        .map(|(p, v)| {
            let z = normalize(v, &stats);
            let distance = z
                .iter()
                .zip(&target)
                .map(|(a, b)| (a - b).powi(2))
                .sum::<f64>()
                .sqrt();
            SimilarPlayer {
                player: *p,
                distance,
            }
        })
        .collect();

    neighbours.sort_by(|a, b| {
        a.distance
            .total_cmp(&b.distance)
            .then_with(|| a.player.name.cmp(&b.player.name))
    });
    neighbours.truncate(k);
    neighbours
}
