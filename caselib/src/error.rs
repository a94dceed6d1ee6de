use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaseError {
    #[error("caselib: not found: {0}")]
    NotFound(String),

    #[error("caselib: case index {index} out of range (category has {len} entries)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("caselib: case library is empty")]
    EmptyLibrary,

    #[error("caselib: {0}")]
    Io(String),

    #[error("caselib: invalid library document: {0}")]
    InvalidFormat(String),
}
