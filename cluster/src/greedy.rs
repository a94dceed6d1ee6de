use std::collections::BTreeMap;

use pixsort_vecsim::{score, Method};

/// Default similarity threshold for cosine vectors.
pub const DEFAULT_THRESHOLD: f32 = 0.85;

/// Greedy single-pass clustering against a similarity threshold.
///
/// Items are processed in input order. Each unassigned item opens a new
/// cluster and becomes its seed; every later unassigned item whose
/// score against the SEED reaches the threshold joins that cluster.
/// Membership is therefore not pairwise-complete: members are only
/// guaranteed to be within the threshold of the seed, and the grouping
/// depends on input order. Downstream consumers rely on exactly this
/// behavior, so it is kept as-is rather than widened to transitive
/// closure.
///
/// Comparison uses the "higher is better" [score] ordering, so for
/// `Method::Euclidean` the threshold is a negated distance.
///
/// Cluster ids are sequential from 0 in creation order. An empty batch
/// yields an empty map (logged, not an error).
pub fn cluster_by_similarity(
    items: &[(String, Vec<f32>)],
    threshold: f32,
    method: Method,
) -> BTreeMap<u32, Vec<String>> {
    let mut clusters = BTreeMap::new();
    if items.is_empty() {
        tracing::error!("no vectors to cluster");
        return clusters;
    }

    let mut assigned = vec![false; items.len()];
    let mut next_id: u32 = 0;

    for i in 0..items.len() {
        if assigned[i] {
            continue;
        }
        let mut members = vec![items[i].0.clone()];
        assigned[i] = true;

        for j in (i + 1)..items.len() {
            if assigned[j] {
                continue;
            }
            if score(&items[i].1, &items[j].1, method) >= threshold {
                members.push(items[j].0.clone());
                assigned[j] = true;
            }
        }

        clusters.insert(next_id, members);
        next_id += 1;
    }

    clusters
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(named: &[(&str, &[f32])]) -> Vec<(String, Vec<f32>)> {
        named
            .iter()
            .map(|(id, v)| (id.to_string(), v.to_vec()))
            .collect()
    }

    #[test]
    fn test_empty_batch() {
        let clusters = cluster_by_similarity(&[], DEFAULT_THRESHOLD, Method::Cosine);
        assert!(clusters.is_empty());
    }

    #[test]
    fn test_pair_above_threshold_groups() {
        let batch = items(&[("a", &[1.0, 0.0]), ("b", &[0.98, 0.199])]);
        let clusters = cluster_by_similarity(&batch, 0.9, Method::Cosine);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[&0], vec!["a", "b"]);
    }

    #[test]
    fn test_pair_below_threshold_splits() {
        let batch = items(&[("a", &[1.0, 0.0]), ("b", &[0.0, 1.0])]);
        let clusters = cluster_by_similarity(&batch, 0.9, Method::Cosine);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[&0], vec!["a"]);
        assert_eq!(clusters[&1], vec!["b"]);
    }

    #[test]
    fn test_members_compared_against_seed_not_last_member() {
        // A at 0 deg, B at 30 deg, C at 60 deg:
        //   sim(A,B) = cos(30) = 0.866 >= 0.8
        //   sim(B,C) = cos(30) = 0.866 >= 0.8
        //   sim(A,C) = cos(60) = 0.5   <  0.8
        // B joins A's cluster, then C is evaluated against the seed A
        // (not against B) and must open its own cluster.
        let deg30 = 30f32.to_radians();
        let deg60 = 60f32.to_radians();
        let batch = items(&[
            ("a", &[1.0, 0.0]),
            ("b", &[deg30.cos(), deg30.sin()]),
            ("c", &[deg60.cos(), deg60.sin()]),
        ]);

        let clusters = cluster_by_similarity(&batch, 0.8, Method::Cosine);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[&0], vec!["a", "b"]);
        assert_eq!(clusters[&1], vec!["c"]);
    }

    #[test]
    fn test_grouping_is_order_dependent() {
        // Same three vectors led by B instead: both A and C are within
        // the threshold of seed B, so everything collapses into one
        // cluster.
        let deg30 = 30f32.to_radians();
        let deg60 = 60f32.to_radians();
        let batch = items(&[
            ("b", &[deg30.cos(), deg30.sin()]),
            ("a", &[1.0, 0.0]),
            ("c", &[deg60.cos(), deg60.sin()]),
        ]);

        let clusters = cluster_by_similarity(&batch, 0.8, Method::Cosine);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[&0], vec!["b", "a", "c"]);
    }

    #[test]
    fn test_euclidean_uses_negated_threshold() {
        let batch = items(&[("a", &[0.0, 0.0]), ("b", &[0.0, 0.5]), ("c", &[0.0, 9.0])]);
        // Distance <= 1.0 groups; score = -distance, threshold -1.0.
        let clusters = cluster_by_similarity(&batch, -1.0, Method::Euclidean);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[&0], vec!["a", "b"]);
        assert_eq!(clusters[&1], vec!["c"]);
    }
}
