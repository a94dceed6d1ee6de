pub mod algorithm;
pub mod error;
pub mod greedy;
pub mod kmeans;

pub use algorithm::Algorithm;
pub use error::ClusterError;
pub use greedy::{cluster_by_similarity, DEFAULT_THRESHOLD};
pub use kmeans::{cluster_by_kmeans, default_auto_k, KMeansConfig};
