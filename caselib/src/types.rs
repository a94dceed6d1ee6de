use serde::{Deserialize, Serialize};

/// A single reference example inside a category.
///
/// Field names on the wire (`path`, `embedding`) match the original
/// library document so existing files keep loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseEntry {
    /// Where the reference vector came from (file path or URL).
    #[serde(rename = "path", default, skip_serializing_if = "String::is_empty")]
    pub source: String,

    /// Embedding vector, unit-L2-normalized.
    #[serde(rename = "embedding")]
    pub vector: Vec<f32>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl CaseEntry {
    pub fn new(source: &str, vector: Vec<f32>, description: &str) -> Self {
        Self {
            source: source.to_string(),
            vector,
            description: description.to_string(),
        }
    }
}
