use std::fmt;
use std::str::FromStr;

use crate::error::SimError;

/// Similarity metric over dense f32 vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    /// Dot product of unit vectors. Range [-1, 1], higher is more similar.
    #[default]
    Cosine,
    /// L2 distance. Range [0, inf), lower is more similar.
    Euclidean,
    /// Raw dot product. Identical to cosine for unit-normalized inputs.
    Dot,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Cosine => "cosine",
            Method::Euclidean => "euclidean",
            Method::Dot => "dot",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cosine" => Ok(Method::Cosine),
            "euclidean" => Ok(Method::Euclidean),
            "dot" => Ok(Method::Dot),
            other => Err(SimError::UnsupportedMethod(other.to_string())),
        }
    }
}
