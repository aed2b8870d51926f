//! Error types for Gitea API operations.

use thiserror::Error;

/// Errors that can occur when interacting with the Gitea API.
#[derive(Debug, Error)]
pub enum GiteaError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// API returned an error response.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Get a short error message suitable for display.
pub fn short_error_message(err: &GiteaError) -> String {
    match err {
        GiteaError::Http(_) => "Network error".to_string(),
        GiteaError::Json(_) => "JSON parse error".to_string(),
        GiteaError::Api { status, message } => {
            if message.len() > 50 {
                let truncated: String = message.chars().take(47).collect();
                format!("HTTP {}: {}...", status, truncated)
            } else {
                format!("HTTP {}: {}", status, message)
            }
        }
        GiteaError::Config(msg) => format!("Config: {}", msg),
    }
}
