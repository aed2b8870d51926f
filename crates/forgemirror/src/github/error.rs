//! Error types for GitHub API operations.

use thiserror::Error;

/// Errors that can occur when listing repositories from GitHub.
#[derive(Debug, Error)]
pub enum GithubError {
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
pub fn short_error_message(err: &GithubError) -> String {
    match err {
        GithubError::Http(_) => "Network error".to_string(),
        GithubError::Json(_) => "JSON parse error".to_string(),
        GithubError::Api { status, message } => {
            if message.len() > 50 {
                let truncated: String = message.chars().take(47).collect();
                format!("HTTP {}: {}...", status, truncated)
            } else {
                format!("HTTP {}: {}", status, message)
            }
        }
        GithubError::Config(msg) => format!("Config: {}", msg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_error_message() {
        let err = GithubError::Http("connection refused".to_string());
        assert_eq!(short_error_message(&err), "Network error");

        let err = GithubError::Api {
            status: 404,
            message: "Not Found".to_string(),
        };
        assert_eq!(short_error_message(&err), "HTTP 404: Not Found");
    }

    #[test]
    fn test_short_error_message_truncates_long_bodies() {
        let err = GithubError::Api {
            status: 500,
            message: "x".repeat(120),
        };
        let short = short_error_message(&err);
        assert!(short.starts_with("HTTP 500: "));
        assert!(short.ends_with("..."));
        assert!(short.len() < 70);
    }
}
