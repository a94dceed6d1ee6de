//! Bounded-concurrency embedding of image batches.

use std::path::PathBuf;

use futures::StreamExt;
use pixsort_embed::ImageEmbedder;

/// Default number of in-flight embedding requests.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Per-item embedding results for a batch, in input order.
///
/// A failed item keeps its slot with a `None` vector; failures never
/// abort the batch.
#[derive(Debug, Clone)]
pub struct EmbeddedBatch {
    pub results: Vec<(String, Option<Vec<f32>>)>,
}

impl EmbeddedBatch {
    /// Successfully embedded (identifier, vector) pairs.
    pub fn embedded(&self) -> Vec<(String, Vec<f32>)> {
        self.results
            .iter()
            .filter_map(|(id, v)| v.as_ref().map(|v| (id.clone(), v.clone())))
            .collect()
    }

    /// Identifiers of items whose embedding failed.
    pub fn failed(&self) -> Vec<String> {
        self.results
            .iter()
            .filter(|(_, v)| v.is_none())
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub fn embedded_count(&self) -> usize {
        self.results.iter().filter(|(_, v)| v.is_some()).count()
    }
}

/// Embed a batch of image files with at most `concurrency` requests in
/// flight. Output order matches input order regardless of completion
/// order. Per-item failures are logged and recorded, not propagated.
pub async fn embed_batch(
    embedder: &dyn ImageEmbedder,
    paths: &[PathBuf],
    concurrency: usize,
) -> EmbeddedBatch {
    let results = futures::stream::iter(paths.iter().map(|path| async move {
        let id = path.display().to_string();
        match embedder.embed_path(path).await {
            Ok(vector) => (id, Some(vector)),
            Err(e) => {
                tracing::warn!(image = %id, error = %e, "embedding failed, item excluded");
                (id, None)
            }
        }
    }))
    .buffered(concurrency.max(1))
    .collect::<Vec<_>>()
    .await;

    EmbeddedBatch { results }
}
