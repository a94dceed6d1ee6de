use std::fmt;
use std::str::FromStr;

use crate::error::ClusterError;

/// Selectable clustering algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    /// Greedy single-pass grouping against a similarity threshold.
    #[default]
    Similarity,
    /// Partitioning via k-means.
    Kmeans,
}

impl Algorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Similarity => "similarity",
            Algorithm::Kmeans => "kmeans",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = ClusterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "similarity" => Ok(Algorithm::Similarity),
            "kmeans" => Ok(Algorithm::Kmeans),
            other => Err(ClusterError::UnsupportedMethod(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("similarity".parse::<Algorithm>().unwrap(), Algorithm::Similarity);
        assert_eq!("kmeans".parse::<Algorithm>().unwrap(), Algorithm::Kmeans);
    }

    #[test]
    fn test_parse_unknown() {
        let err = "dbscan".parse::<Algorithm>().unwrap_err();
        assert_eq!(err, ClusterError::UnsupportedMethod("dbscan".to_string()));
    }
}
