use crate::config::{MergeError, WeightParseError};
use crate::fetch::FetchError;

/// Stage of a build that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStage {
    Fetch,
    Weight,
    Merge,
}

/// Environment build errors
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("failed to get config from reference '{name}': {source}")]
    Fetch {
        name: String,
        #[source]
        source: FetchError,
    },

    #[error("failed to parse weight of environment config: {0}")]
    Weight(#[from] WeightParseError),

    #[error("failed to merge data: {0}")]
    Merge(#[from] MergeError),
}

impl BuildError {
    pub fn stage(&self) -> BuildStage {
        match self {
            Self::Fetch { .. } => BuildStage::Fetch,
            Self::Weight(_) => BuildStage::Weight,
            Self::Merge(_) => BuildStage::Merge,
        }
    }

    /// True if the build stopped because its context was cancelled or timed out
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Fetch { source, .. } if source.is_cancelled())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Fetch { source, .. } if source.is_not_found())
    }
}
