//! Gitea API client: destination listing, deletion, and migration.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use super::error::GiteaError;
use super::types::{ApiMessage, GiteaRepo, MigrateOutcome, MigrateRequest};
use crate::http::{HttpMethod, HttpRequest, HttpTransport, ReqwestTransport};

/// Page size for listing requests.
const PAGE_SIZE: u32 = 50;

/// Older Gitea versions report a duplicate migration as a plain error whose
/// message carries this phrase instead of a 409 status.
const ALREADY_EXISTS_MARKER: &str = "already exists";

/// Gitea API client.
///
/// Works against any Gitea-compatible forge (Gitea, Forgejo, Codeberg).
#[derive(Clone)]
pub struct GiteaClient {
    transport: Arc<dyn HttpTransport>,
    host: String,
    token: String,
}

impl GiteaClient {
    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `host` - base URL of the instance (e.g., "https://git.example.com");
    ///   trailing slashes are stripped
    /// * `token` - personal access token
    pub fn new(host: &str, token: &str) -> Result<Self, GiteaError> {
        let transport = ReqwestTransport::with_timeout(StdDuration::from_secs(30))
            .map_err(|e| GiteaError::Config(e.to_string()))?;
        Ok(Self::new_with_transport(host, token, Arc::new(transport)))
    }

    pub fn new_with_transport(
        host: &str,
        token: &str,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            transport,
            host: host.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    /// Get the host URL.
    pub fn host(&self) -> &str {
        &self.host
    }

    fn request(&self, method: HttpMethod, path: &str) -> HttpRequest {
        HttpRequest::new(method, format!("{}/api/v1{}", self.host, path))
            .header("Accept", "application/json")
            .header("User-Agent", "forgemirror")
            .header("Authorization", format!("token {}", self.token))
    }

    /// Make an authenticated GET request.
    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, GiteaError> {
        let response = self
            .transport
            .send(self.request(HttpMethod::Get, path))
            .await
            .map_err(|e| GiteaError::Http(e.to_string()))?;

        if !response.is_success() {
            let message = String::from_utf8_lossy(&response.body).to_string();
            return Err(GiteaError::Api {
                status: response.status,
                message,
            });
        }

        serde_json::from_slice(&response.body).map_err(GiteaError::Json)
    }

    /// List all repositories of the authenticated user, with pagination.
    pub async fn list_my_repos(&self) -> Result<Vec<GiteaRepo>, GiteaError> {
        let mut all_repos = Vec::new();
        let mut page = 1u32;

        loop {
            let repos: Vec<GiteaRepo> = self
                .get(&format!("/user/repos?page={}&limit={}", page, PAGE_SIZE))
                .await?;

            let count = repos.len();
            all_repos.extend(repos);

            // Fewer than PAGE_SIZE means the last page.
            if count < PAGE_SIZE as usize {
                break;
            }
            page += 1;
        }

        Ok(all_repos)
    }

    /// Delete a repository. The response body is ignored.
    pub async fn delete_repo(&self, owner: &str, name: &str) -> Result<(), GiteaError> {
        let response = self
            .transport
            .send(self.request(HttpMethod::Delete, &format!("/repos/{}/{}", owner, name)))
            .await
            .map_err(|e| GiteaError::Http(e.to_string()))?;

        if !response.is_success() && response.status != 204 {
            let message = String::from_utf8_lossy(&response.body).to_string();
            return Err(GiteaError::Api {
                status: response.status,
                message,
            });
        }

        Ok(())
    }

    /// Submit a migration request and classify the response.
    ///
    /// A 2xx status is a successful migration and a 409 a pre-existing
    /// repository. Any other status whose message mentions an existing
    /// repository is treated as pre-existing as well, for instances that
    /// predate the 409 response.
    pub async fn migrate_repo(
        &self,
        request: &MigrateRequest,
    ) -> Result<MigrateOutcome, GiteaError> {
        let http_request = self
            .request(HttpMethod::Post, "/repos/migrate")
            .json(request)
            .map_err(|e| GiteaError::Http(e.to_string()))?;

        let response = self
            .transport
            .send(http_request)
            .await
            .map_err(|e| GiteaError::Http(e.to_string()))?;

        if response.is_success() {
            return Ok(MigrateOutcome::Migrated);
        }
        if response.status == 409 {
            return Ok(MigrateOutcome::AlreadyPresent);
        }

        let payload: ApiMessage = serde_json::from_slice(&response.body).unwrap_or_default();
        match payload.message {
            Some(message) if message.contains(ALREADY_EXISTS_MARKER) => {
                Ok(MigrateOutcome::AlreadyPresent)
            }
            Some(message) => Err(GiteaError::Api {
                status: response.status,
                message,
            }),
            None => Err(GiteaError::Api {
                status: response.status,
                message: String::from_utf8_lossy(&response.body).to_string(),
            }),
        }
    }
}
