use std::cmp::Ordering;
use std::collections::BTreeMap;

use pixsort_vecsim::{score, Method};

use crate::error::CaseError;
use crate::library::CaseLibrary;

/// Bucket label for items whose best match falls below the threshold or
/// whose embedding failed.
pub const UNCLASSIFIED: &str = "unclassified";

/// Case-based classifier over a [CaseLibrary].
///
/// A category's score against a query is the maximum over its entries
/// ("best sample wins"), so a category tolerates visual variance across
/// its references without being penalized by averaging.
pub struct Classifier<'a> {
    library: &'a CaseLibrary,
    method: Method,
}

impl<'a> Classifier<'a> {
    pub fn new(library: &'a CaseLibrary) -> Self {
        Self {
            library,
            method: Method::Cosine,
        }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Score every category against the query, sorted by descending
    /// score. Tie order between equal-scoring categories is unspecified.
    pub fn classify_one(&self, query: &[f32]) -> Vec<(String, f32)> {
        let mut scores: Vec<(String, f32)> = self
            .library
            .iter()
            .map(|(label, entries)| {
                let best = entries
                    .iter()
                    .map(|e| score(query, &e.vector, self.method))
                    .fold(f32::NEG_INFINITY, f32::max);
                (label.to_string(), best)
            })
            .collect();
        scores.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        scores
    }

    /// The top-k categories for the query.
    pub fn classify_top_k(&self, query: &[f32], k: usize) -> Vec<(String, f32)> {
        let mut scores = self.classify_one(query);
        scores.truncate(k);
        scores
    }

    /// Classify a batch of (identifier, vector) items.
    ///
    /// Items whose best score is below the threshold, and items whose
    /// embedding failed (`None` vector), land in the [UNCLASSIFIED]
    /// bucket. The default threshold of 0.0 accepts any non-negative
    /// best match.
    pub fn classify_batch(
        &self,
        items: &[(String, Option<Vec<f32>>)],
        threshold: f32,
    ) -> Result<BTreeMap<String, Vec<String>>, CaseError> {
        if self.library.is_empty() {
            return Err(CaseError::EmptyLibrary);
        }

        let mut out: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (id, vector) in items {
            let label = match vector {
                Some(v) => match self.classify_one(v).into_iter().next() {
                    Some((label, best)) if best >= threshold => label,
                    _ => UNCLASSIFIED.to_string(),
                },
                None => UNCLASSIFIED.to_string(),
            };
            out.entry(label).or_default().push(id.clone());
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CaseEntry;

    fn library() -> CaseLibrary {
        let mut lib = CaseLibrary::new();
        lib.add_case("home", CaseEntry::new("h1.jpg", vec![1.0, 0.0, 0.0], ""));
        lib.add_case("home", CaseEntry::new("h2.jpg", vec![0.0, 1.0, 0.0], ""));
        lib.add_case("search", CaseEntry::new("s1.jpg", vec![0.0, 0.0, 1.0], ""));
        lib
    }

    #[test]
    fn test_identical_query_scores_one() {
        let lib = library();
        let ranked = Classifier::new(&lib).classify_one(&[0.0, 1.0, 0.0]);
        assert_eq!(ranked[0].0, "home");
        assert!((ranked[0].1 - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_max_over_entries_wins() {
        // Query is far from home's first entry but close to its second;
        // max-over-entries must still put home first.
        let lib = library();
        let mut q = vec![0.1, 0.95, 0.0];
        pixsort_vecsim::normalize(&mut q);
        let ranked = Classifier::new(&lib).classify_one(&q);
        assert_eq!(ranked[0].0, "home");
        assert!(ranked[0].1 > ranked[1].1);
    }

    #[test]
    fn test_classify_top_k() {
        let lib = library();
        let ranked = Classifier::new(&lib).classify_top_k(&[1.0, 0.0, 0.0], 1);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].0, "home");
    }

    #[test]
    fn test_batch_threshold_routing() {
        let lib = library();
        let items = vec![
            ("close.jpg".to_string(), Some(vec![0.0, 1.0, 0.0])),
            ("far.jpg".to_string(), Some(vec![-1.0, 0.0, 0.0])),
            ("broken.jpg".to_string(), None),
        ];
        let result = Classifier::new(&lib).classify_batch(&items, 0.5).unwrap();

        assert_eq!(result["home"], vec!["close.jpg"]);
        assert_eq!(result[UNCLASSIFIED], vec!["far.jpg", "broken.jpg"]);
    }

    #[test]
    fn test_batch_negative_score_passes_low_threshold() {
        // A degenerate library where the best match is negative: the
        // item is still assigned as long as the threshold sits below
        // that score, not auto-routed to unclassified.
        let mut lib = CaseLibrary::new();
        lib.add_case("home", CaseEntry::new("h.jpg", vec![1.0, 0.0], ""));
        let items = vec![("q.jpg".to_string(), Some(vec![-1.0, 0.0]))];

        let result = Classifier::new(&lib).classify_batch(&items, -1.5).unwrap();
        assert_eq!(result["home"], vec!["q.jpg"]);
        assert!(!result.contains_key(UNCLASSIFIED));

        let strict = Classifier::new(&lib).classify_batch(&items, 0.0).unwrap();
        assert_eq!(strict[UNCLASSIFIED], vec!["q.jpg"]);
    }

    #[test]
    fn test_batch_empty_library() {
        let lib = CaseLibrary::new();
        let err = Classifier::new(&lib)
            .classify_batch(&[("q.jpg".to_string(), Some(vec![1.0]))], 0.0)
            .unwrap_err();
        assert!(matches!(err, CaseError::EmptyLibrary));
    }

    #[test]
    fn test_best_sample_wins_scenario() {
        // home has two entries; the query matches the second at 0.9 and
        // the first at ~0.3, search at ~0.1. With threshold 0.5 the item
        // must land in home.
        let mut lib = CaseLibrary::new();
        let mut v1 = vec![1.0, 0.3, 0.0];
        let mut v2 = vec![0.0, 1.0, 0.1];
        let mut v3 = vec![0.1, 0.0, -1.0];
        let mut q = vec![0.05, 0.9, 0.2];
        for v in [&mut v1, &mut v2, &mut v3, &mut q] {
            pixsort_vecsim::normalize(v);
        }
        assert!(pixsort_vecsim::similarity(&q, &v2, Method::Cosine) > 0.5);
        assert!(pixsort_vecsim::similarity(&q, &v1, Method::Cosine) < 0.5);
        assert!(pixsort_vecsim::similarity(&q, &v3, Method::Cosine) < 0.5);

        lib.add_case("home", CaseEntry::new("v1.jpg", v1, ""));
        lib.add_case("home", CaseEntry::new("v2.jpg", v2, ""));
        lib.add_case("search", CaseEntry::new("v3.jpg", v3, ""));

        let items = vec![("q.jpg".to_string(), Some(q))];
        let result = Classifier::new(&lib).classify_batch(&items, 0.5).unwrap();
        assert_eq!(result["home"], vec!["q.jpg"]);
    }

    #[test]
    fn test_euclidean_method() {
        let lib = library();
        let ranked = Classifier::new(&lib)
            .with_method(Method::Euclidean)
            .classify_one(&[0.0, 0.0, 1.0]);
        // Scores are negated distances, so the exact match ranks first
        // with score 0.
        assert_eq!(ranked[0].0, "search");
        assert!(ranked[0].1.abs() < 1e-6);
    }
}
