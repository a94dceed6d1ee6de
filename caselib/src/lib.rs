pub mod classify;
pub mod error;
pub mod library;
pub mod types;

pub use classify::{Classifier, UNCLASSIFIED};
pub use error::CaseError;
pub use library::CaseLibrary;
pub use types::CaseEntry;
