//! GitHub source host: repository listing for one account.

mod client;
mod error;
mod types;

pub use client::{GithubClient, GITHUB_API_HOST};
pub use error::{short_error_message, GithubError};
pub use types::{GithubRepo, GithubUser};
