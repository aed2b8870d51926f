//! Gitea API data types.

use serde::{Deserialize, Serialize};

/// Gitea repository - fields we need from the API response.
///
/// Only the fields used for reconciliation are declared, which keeps the
/// deserializer resilient to API changes across Gitea/Forgejo versions.
#[derive(Debug, Clone, Deserialize)]
pub struct GiteaRepo {
    /// Repository name.
    pub name: String,
    /// Full name including owner (e.g., "owner/repo").
    pub full_name: String,
    /// Whether the repository is a pull mirror.
    pub mirror: bool,
    /// Whether the repository is private.
    pub private: bool,
}

impl GiteaRepo {
    /// Split the full name into owner and repository name.
    ///
    /// Falls back to the bare name when the full name carries no owner
    /// segment.
    #[must_use]
    pub fn owner_and_name(&self) -> (&str, &str) {
        match self.full_name.split_once('/') {
            Some((owner, name)) => (owner, name),
            None => ("", self.name.as_str()),
        }
    }
}

/// Request body for `POST /api/v1/repos/migrate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrateRequest {
    /// Address the destination will clone (and, for mirrors, re-pull) from.
    pub clone_addr: String,
    /// True for a continuously-syncing mirror, false for a one-time clone.
    pub mirror: bool,
    /// Whether the destination repository is created private.
    pub private: bool,
    /// Destination owner (user or organization).
    pub repo_owner: String,
    /// Destination repository name.
    pub repo_name: String,
}

/// Classified result of one migrate call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrateOutcome {
    /// The repository was created on the destination.
    Migrated,
    /// The destination already has a repository by this name.
    AlreadyPresent,
}

/// Error payload shape shared by Gitea endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ApiMessage {
    #[serde(default)]
    pub message: Option<String>,
}
