//! GitHub API data types.

use serde::Deserialize;

/// GitHub repository - fields we need from the API response.
///
/// This struct is used to deserialize GitHub API responses. We define only
/// the fields we need, which makes the code resilient to API changes.
#[derive(Debug, Clone, Deserialize)]
pub struct GithubRepo {
    /// Repository name.
    pub name: String,
    /// Full name including owner (e.g., "owner/repo").
    pub full_name: String,
    /// Browsable URL, also usable as an HTTPS clone address.
    pub html_url: String,
    /// Whether the repository is private.
    pub private: bool,
    /// Owner information.
    pub owner: GithubUser,
}

/// GitHub user/organization.
#[derive(Debug, Clone, Deserialize)]
pub struct GithubUser {
    /// Username/login.
    pub login: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_deserializes_from_api_subset() {
        let json = r#"{
            "id": 42,
            "name": "demo",
            "full_name": "alice/demo",
            "html_url": "https://github.com/alice/demo",
            "private": true,
            "fork": false,
            "owner": {"login": "alice", "id": 7}
        }"#;

        let repo: GithubRepo = serde_json::from_str(json).unwrap();
        assert_eq!(repo.name, "demo");
        assert_eq!(repo.full_name, "alice/demo");
        assert_eq!(repo.html_url, "https://github.com/alice/demo");
        assert!(repo.private);
        assert_eq!(repo.owner.login, "alice");
    }
}
