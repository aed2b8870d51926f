//! Forgemirror - mirror a GitHub account onto a self-hosted forge.
//!
//! This library lists every repository owned by a GitHub account and
//! recreates each one on a Gitea-compatible instance (Gitea, Forgejo,
//! Codeberg), either as a continuously-syncing pull mirror or as a one-time
//! clone. An optional force-sync pass deletes destination mirrors whose
//! source repository has disappeared.
//!
//! # Example
//!
//! ```ignore
//! use forgemirror::{mirror, GiteaClient, GithubClient, MirrorOptions};
//!
//! let github = GithubClient::new(Some("ghp_..."))?;
//! let gitea = GiteaClient::new("https://git.example.com", "token")?;
//!
//! let summary = mirror::run(
//!     &github,
//!     &gitea,
//!     "alice",
//!     "alice",
//!     &MirrorOptions::default(),
//!     None,
//! )
//! .await?;
//!
//! println!("{} migrated, {} already present", summary.migrated, summary.already_present);
//! ```

pub mod gitea;
pub mod github;
pub mod http;
pub mod mirror;

pub use gitea::GiteaClient;
pub use github::GithubClient;
pub use mirror::{
    MirrorError, MirrorOptions, MirrorProgress, MirrorStrategy, ProgressCallback, RunSummary,
};
