pub mod error;
pub mod method;
pub mod similarity;

pub use error::SimError;
pub use method::Method;
pub use similarity::{normalize, score, similarity};
