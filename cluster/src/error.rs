use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClusterError {
    #[error("cluster: unsupported clustering method: {0}")]
    UnsupportedMethod(String),
}
