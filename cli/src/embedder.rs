//! Embedder construction from flags and environment.

use pixsort_embed::{EmbedConfig, VisionApi};

pub const ENV_EMBED_URL: &str = "PIXSORT_EMBED_URL";
pub const ENV_API_KEY: &str = "PIXSORT_API_KEY";

/// Build the HTTP embedder from optional CLI flags, falling back to
/// `PIXSORT_EMBED_URL` / `PIXSORT_API_KEY` and then the provider
/// defaults.
pub fn build_embedder(embed_url: Option<&str>, model: Option<&str>) -> VisionApi {
    let mut cfg = EmbedConfig::default();
    let url = embed_url
        .map(str::to_string)
        .or_else(|| std::env::var(ENV_EMBED_URL).ok());
    if let Some(url) = url {
        cfg = cfg.with_base_url(&url);
    }
    if let Some(model) = model {
        cfg = cfg.with_model(model);
    }
    let api_key = std::env::var(ENV_API_KEY).unwrap_or_default();
    VisionApi::with_config(&api_key, cfg)
}
