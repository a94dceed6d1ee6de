use std::time::Duration;

use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::EmbedConfig;
use crate::embed::ImageEmbedder;
use crate::error::EmbedError;

/// Vision embedding models.
pub const MODEL_DINOV2_SMALL: &str = "dinov2-small";
pub const MODEL_DINOV2_BASE: &str = "dinov2-base";

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8200/v1";
const DEFAULT_DIM: usize = 384;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_RETRIES: u32 = 2;

/// Image embedder backed by an OpenAI-compatible embeddings endpoint that
/// accepts base64 `data:` URIs as input.
///
/// Works with any service exposing the `/embeddings` request/response
/// format; base_url, model and dimension come from `EmbedConfig`.
pub struct VisionApi {
    client: Client,
    api_key: String,
    model: String,
    dim: usize,
    base_url: String,
    timeout: Duration,
    max_retries: u32,
}

impl VisionApi {
    pub fn new(api_key: &str) -> Self {
        Self::with_config(api_key, EmbedConfig::default())
    }

    pub fn with_config(api_key: &str, cfg: EmbedConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            model: if cfg.model.is_empty() {
                MODEL_DINOV2_SMALL.to_string()
            } else {
                cfg.model
            },
            dim: if cfg.dimension == 0 {
                DEFAULT_DIM
            } else {
                cfg.dimension
            },
            base_url: if cfg.base_url.is_empty() {
                DEFAULT_BASE_URL.to_string()
            } else {
                cfg.base_url
            },
            timeout: Duration::from_secs(if cfg.timeout_secs == 0 {
                DEFAULT_TIMEOUT_SECS
            } else {
                cfg.timeout_secs
            }),
            max_retries: if cfg.max_retries == 0 {
                DEFAULT_MAX_RETRIES
            } else {
                cfg.max_retries
            },
        }
    }

    async fn call_api(&self, image: &[u8]) -> Result<Vec<f32>, EmbedError> {
        let url = format!("{}/embeddings", self.base_url);
        let input = vec![data_uri(image)];
        let body = EmbeddingRequest {
            model: &self.model,
            input: &input,
            dimensions: self.dim,
            encoding_format: "float",
        };

        // Transport errors (timeout, refused connection) are retried;
        // HTTP error statuses fail immediately.
        let mut attempt = 0;
        let resp = loop {
            let mut req = self
                .client
                .post(&url)
                .header("Content-Type", "application/json")
                .timeout(self.timeout)
                .json(&body);
            if !self.api_key.is_empty() {
                req = req.header("Authorization", format!("Bearer {}", self.api_key));
            }

            match req.send().await {
                Ok(resp) => break resp,
                Err(e) if attempt < self.max_retries => {
                    attempt += 1;
                    tracing::warn!(attempt, error = %e, "embedding request failed, retrying");
                }
                Err(e) => return Err(EmbedError::Api(e.to_string())),
            }
        };

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(EmbedError::Api(format!("HTTP {status}: {body}")));
        }

        let data: EmbeddingResponse = resp
            .json()
            .await
            .map_err(|e| EmbedError::Api(e.to_string()))?;

        let item = data
            .data
            .into_iter()
            .next()
            .ok_or(EmbedError::MissingIndex(0))?;
        if item.index != 0 {
            return Err(EmbedError::UnexpectedIndex {
                index: item.index,
                batch_size: 1,
            });
        }

        // float64 -> f32, then enforce the unit-norm contract locally
        // rather than trusting the service.
        let mut vector: Vec<f32> = item.embedding.iter().map(|&v| v as f32).collect();
        pixsort_vecsim::normalize(&mut vector);
        Ok(vector)
    }
}

#[async_trait::async_trait]
impl ImageEmbedder for VisionApi {
    async fn embed_bytes(&self, image: &[u8]) -> Result<Vec<f32>, EmbedError> {
        if image.is_empty() {
            return Err(EmbedError::EmptyInput);
        }
        self.call_api(image).await
    }

    fn dimension(&self) -> usize {
        self.dim
    }
}

/// Embedding request body (OpenAI-compatible).
#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
    dimensions: usize,
    encoding_format: &'a str,
}

/// Embedding response body (OpenAI-compatible).
#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f64>,
}

fn data_uri(image: &[u8]) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(image);
    format!("data:{};base64,{encoded}", sniff_mime(image))
}

/// Guess the image MIME type from magic bytes. Unknown formats are
/// reported as JPEG, which the backends accept as a default.
fn sniff_mime(image: &[u8]) -> &'static str {
    if image.starts_with(&[0x89, b'P', b'N', b'G']) {
        "image/png"
    } else if image.starts_with(b"GIF8") {
        "image/gif"
    } else if image.starts_with(b"BM") {
        "image/bmp"
    } else if image.len() >= 12 && &image[0..4] == b"RIFF" && &image[8..12] == b"WEBP" {
        "image/webp"
    } else {
        "image/jpeg"
    }
}
