//! Run options and result types.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// How source repositories materialize on the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MirrorStrategy {
    /// Continuously-syncing pull mirror.
    #[default]
    Mirror,
    /// One-time copy with no ongoing synchronization.
    Clone,
}

impl MirrorStrategy {
    /// The `mirror` flag sent to the migrate endpoint.
    #[must_use]
    pub fn as_mirror_flag(self) -> bool {
        matches!(self, MirrorStrategy::Mirror)
    }
}

impl fmt::Display for MirrorStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MirrorStrategy::Mirror => f.write_str("mirror"),
            MirrorStrategy::Clone => f.write_str("clone"),
        }
    }
}

/// A strategy value that is neither `mirror` nor `clone`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid strategy {0:?}: expected \"mirror\" or \"clone\"")]
pub struct InvalidStrategy(pub String);

impl FromStr for MirrorStrategy {
    type Err = InvalidStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mirror" => Ok(MirrorStrategy::Mirror),
            "clone" => Ok(MirrorStrategy::Clone),
            _ => Err(InvalidStrategy(s.to_string())),
        }
    }
}

/// Options for one mirror run.
#[derive(Debug, Clone, Default)]
pub struct MirrorOptions {
    /// Mirror or one-time clone.
    pub strategy: MirrorStrategy,
    /// Delete destination mirrors whose source repository is gone.
    pub force_sync: bool,
}

/// Result of a mirror run.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Number of source repositories fetched.
    pub fetched: usize,
    /// Number of repositories newly migrated.
    pub migrated: usize,
    /// Number of repositories the destination already had.
    pub already_present: usize,
    /// Number of private repositories skipped for lack of a source token.
    pub skipped_private: usize,
    /// Number of repositories whose migration failed.
    pub failed: usize,
    /// Number of stale destination mirrors deleted by force-sync.
    pub mirrors_deleted: usize,
    /// Number of force-sync deletions that failed.
    pub delete_errors: usize,
    /// Errors encountered (non-fatal), one line per repository.
    pub errors: Vec<String>,
}

impl RunSummary {
    /// Whether anything at all went wrong during the run.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.failed > 0 || self.delete_errors > 0
    }
}
