pub mod batch;
pub mod embedder;
pub mod output;
pub mod paths;

pub use batch::{embed_batch, EmbeddedBatch, DEFAULT_CONCURRENCY};
pub use embedder::build_embedder;
pub use output::{resolve_output_path, ClassifyReport, ClusterReport, OutputFormat};
pub use paths::{collect_images, IMAGE_EXTENSIONS};
