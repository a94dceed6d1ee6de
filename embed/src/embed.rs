use std::path::Path;

use crate::error::EmbedError;

/// ImageEmbedder converts images into dense float32 vectors.
///
/// Returned vectors are unit-L2-normalized, so cosine similarity between
/// them reduces to a dot product.
///
/// Implementations must be safe for concurrent use (Send + Sync).
#[async_trait::async_trait]
pub trait ImageEmbedder: Send + Sync {
    /// Return the embedding vector for raw image bytes.
    async fn embed_bytes(&self, image: &[u8]) -> Result<Vec<f32>, EmbedError>;

    /// Return the embedding vector for an image file on disk.
    async fn embed_path(&self, path: &Path) -> Result<Vec<f32>, EmbedError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| EmbedError::Io(format!("{}: {e}", path.display())))?;
        self.embed_bytes(&bytes).await
    }

    /// Return the dimensionality of the output vectors.
    fn dimension(&self) -> usize;
}
