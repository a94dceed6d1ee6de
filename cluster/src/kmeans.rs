use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Default RNG seed, fixed for reproducible partitions.
pub const DEFAULT_SEED: u64 = 42;

/// Default auto-selection policy for the cluster count: at least three
/// items per cluster on average, capped at ten clusters. A coarse
/// heuristic, not a model-selection procedure.
pub fn default_auto_k(count: usize) -> usize {
    (count / 3).clamp(1, 10)
}

/// Configuration for [cluster_by_kmeans].
#[derive(Debug, Clone)]
pub struct KMeansConfig {
    /// Explicit cluster count. None selects k via `auto_k`.
    pub k: Option<usize>,

    /// RNG seed; restarts derive their seeds from it.
    pub seed: u64,

    /// Number of restarts; the partition with the lowest inertia wins.
    pub n_init: usize,

    /// Iteration cap per restart.
    pub max_iter: usize,

    /// Policy mapping item count to cluster count when `k` is None.
    pub auto_k: fn(usize) -> usize,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            k: None,
            seed: DEFAULT_SEED,
            n_init: 10,
            max_iter: 100,
            auto_k: default_auto_k,
        }
    }
}

impl KMeansConfig {
    fn set_defaults(&mut self) {
        if self.n_init == 0 {
            self.n_init = 10;
        }
        if self.max_iter == 0 {
            self.max_iter = 100;
        }
    }
}

/// Partition items into k clusters with Lloyd's algorithm (k-means++
/// seeding, multiple seeded restarts).
///
/// The output maps the winning restart's centroid index to member
/// identifiers in input order. Centroids that end up with no members
/// are omitted, so keys need not be contiguous. An empty batch yields
/// an empty map (logged, not an error).
pub fn cluster_by_kmeans(
    items: &[(String, Vec<f32>)],
    config: &KMeansConfig,
) -> BTreeMap<u32, Vec<String>> {
    let mut clusters = BTreeMap::new();
    if items.is_empty() {
        tracing::error!("no vectors to cluster");
        return clusters;
    }

    let mut cfg = config.clone();
    cfg.set_defaults();

    let n = items.len();
    let k = cfg.k.unwrap_or_else(|| (cfg.auto_k)(n)).clamp(1, n);
    let vectors: Vec<&[f32]> = items.iter().map(|(_, v)| v.as_slice()).collect();

    let mut best: Option<(f64, Vec<usize>)> = None;
    for restart in 0..cfg.n_init {
        let mut rng = StdRng::seed_from_u64(cfg.seed.wrapping_add(restart as u64));
        let centroids = init_plus_plus(&vectors, k, &mut rng);
        let (assignments, inertia) = run_lloyd(&vectors, centroids, cfg.max_iter);
        if best.as_ref().is_none_or(|(b, _)| inertia < *b) {
            best = Some((inertia, assignments));
        }
    }

    let (_, assignments) = best.unwrap_or((0.0, vec![0; n]));
    for (i, &label) in assignments.iter().enumerate() {
        clusters
            .entry(label as u32)
            .or_insert_with(Vec::new)
            .push(items[i].0.clone());
    }
    clusters
}

/// K-means++ seeding: first centroid uniform, each further centroid
/// sampled with probability proportional to squared distance from the
/// nearest chosen centroid.
fn init_plus_plus(vectors: &[&[f32]], k: usize, rng: &mut StdRng) -> Vec<Vec<f32>> {
    let n = vectors.len();
    let mut centroids: Vec<Vec<f32>> = Vec::with_capacity(k);
    centroids.push(vectors[rng.gen_range(0..n)].to_vec());

    let mut min_dist = vec![f64::MAX; n];
    while centroids.len() < k {
        let last = centroids.last().unwrap();
        for (i, v) in vectors.iter().enumerate() {
            let d = dist_sq(v, last);
            if d < min_dist[i] {
                min_dist[i] = d;
            }
        }

        let total: f64 = min_dist.iter().sum();
        if total == 0.0 {
            // Every point already coincides with a centroid; duplicates
            // are fine, the empty clusters drop out of the result.
            centroids.push(vectors[rng.gen_range(0..n)].to_vec());
            continue;
        }

        let mut target = rng.gen_range(0.0..total);
        let mut chosen = n - 1;
        for (i, &d) in min_dist.iter().enumerate() {
            if target < d {
                chosen = i;
                break;
            }
            target -= d;
        }
        centroids.push(vectors[chosen].to_vec());
    }
    centroids
}

/// Lloyd iterations until assignments stabilize or the cap is hit.
/// Returns the final assignments and their inertia (total squared
/// distance to assigned centroids).
fn run_lloyd(vectors: &[&[f32]], mut centroids: Vec<Vec<f32>>, max_iter: usize) -> (Vec<usize>, f64) {
    let n = vectors.len();
    let k = centroids.len();
    let dim = vectors[0].len();
    let mut assignments = vec![0usize; n];

    for iter in 0..max_iter {
        let mut changed = false;
        for (i, v) in vectors.iter().enumerate() {
            let nearest = nearest_centroid(v, &centroids);
            if nearest != assignments[i] || iter == 0 {
                assignments[i] = nearest;
                changed = true;
            }
        }
        if !changed {
            break;
        }

        // Recompute centroids as member means; empty centroids keep
        // their previous position.
        let mut sums = vec![vec![0.0f64; dim]; k];
        let mut counts = vec![0usize; k];
        for (i, v) in vectors.iter().enumerate() {
            counts[assignments[i]] += 1;
            for (d, &x) in v.iter().enumerate() {
                sums[assignments[i]][d] += x as f64;
            }
        }
        for c in 0..k {
            if counts[c] == 0 {
                continue;
            }
            for d in 0..dim {
                centroids[c][d] = (sums[c][d] / counts[c] as f64) as f32;
            }
        }
    }

    let inertia = vectors
        .iter()
        .enumerate()
        .map(|(i, v)| dist_sq(v, &centroids[assignments[i]]))
        .sum();
    (assignments, inertia)
}

fn nearest_centroid(v: &[f32], centroids: &[Vec<f32>]) -> usize {
    let mut best = 0;
    let mut best_d = f64::MAX;
    for (c, centroid) in centroids.iter().enumerate() {
        let d = dist_sq(v, centroid);
        if d < best_d {
            best_d = d;
            best = c;
        }
    }
    best
}

fn dist_sq(a: &[f32], b: &[f32]) -> f64 {
    let mut sum = 0.0f64;
    for i in 0..a.len() {
        let d = a[i] as f64 - b[i] as f64;
        sum += d * d;
    }
    sum
}
