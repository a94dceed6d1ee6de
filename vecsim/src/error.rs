use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    #[error("vecsim: unsupported similarity method: {0}")]
    UnsupportedMethod(String),
}
