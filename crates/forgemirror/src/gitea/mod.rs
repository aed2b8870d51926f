//! Gitea destination host: listing, deletion, and the migrate endpoint.
//!
//! Compatible with Gitea, Forgejo, and other Gitea API forges.

mod client;
mod error;
mod types;

pub use client::GiteaClient;
pub use error::{short_error_message, GiteaError};
pub use types::{GiteaRepo, MigrateOutcome, MigrateRequest};
