//! GitHub API client: paginated listing of one account's repositories.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use super::error::GithubError;
use super::types::GithubRepo;
use crate::http::{HttpMethod, HttpRequest, HttpTransport, ReqwestTransport};
use crate::mirror::{emit, MirrorProgress, ProgressCallback};

/// Default GitHub API host.
pub const GITHUB_API_HOST: &str = "https://api.github.com";

/// Page size for listing requests.
const PAGE_SIZE: u32 = 100;

/// GitHub API client.
///
/// Holds an optional personal access token. With a token the client lists
/// through the authenticated endpoint and therefore sees private
/// repositories; without one it is restricted to the account's public
/// repositories.
#[derive(Clone)]
pub struct GithubClient {
    transport: Arc<dyn HttpTransport>,
    api_host: String,
    token: Option<String>,
}

impl GithubClient {
    /// Create a client against the public GitHub API.
    pub fn new(token: Option<&str>) -> Result<Self, GithubError> {
        let transport = ReqwestTransport::with_timeout(StdDuration::from_secs(30))
            .map_err(|e| GithubError::Config(e.to_string()))?;
        Ok(Self::new_with_transport(
            GITHUB_API_HOST,
            token,
            Arc::new(transport),
        ))
    }

    pub fn new_with_transport(
        api_host: &str,
        token: Option<&str>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            transport,
            api_host: api_host.trim_end_matches('/').to_string(),
            token: token.map(str::to_string),
        }
    }

    /// The configured token, if any.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Whether the client is authenticated.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Make a GET request, authenticated when a token is configured.
    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, GithubError> {
        let url = format!("{}{}", self.api_host, path);

        let mut request = HttpRequest::new(HttpMethod::Get, url)
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", "forgemirror");
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| GithubError::Http(e.to_string()))?;

        if !response.is_success() {
            let message = String::from_utf8_lossy(&response.body).to_string();
            return Err(GithubError::Api {
                status: response.status,
                message,
            });
        }

        serde_json::from_slice(&response.body).map_err(GithubError::Json)
    }

    /// List every repository owned by `account`.
    ///
    /// Pages through the listing endpoint, keeping only records whose owner
    /// login equals `account`. The authenticated endpoint returns repos the
    /// token holder can see across organizations, so the filter is applied
    /// to every page. Pagination stops at the first page that is shorter
    /// than the requested size or that contributes no matching records.
    pub async fn list_account_repos(
        &self,
        account: &str,
        on_progress: Option<&ProgressCallback>,
    ) -> Result<Vec<GithubRepo>, GithubError> {
        emit(
            on_progress,
            MirrorProgress::FetchingRepos {
                account: account.to_string(),
            },
        );

        let mut all_repos: Vec<GithubRepo> = Vec::new();
        let mut page = 1u32;

        loop {
            let path = if self.token.is_some() {
                format!("/user/repos?per_page={}&page={}", PAGE_SIZE, page)
            } else {
                format!("/users/{}/repos?per_page={}&page={}", account, PAGE_SIZE, page)
            };

            let repos: Vec<GithubRepo> = self.get(&path).await?;
            let raw_count = repos.len();

            let mut matched: Vec<GithubRepo> = repos
                .into_iter()
                .filter(|repo| repo.owner.login == account)
                .collect();
            let matched_count = matched.len();
            all_repos.append(&mut matched);

            tracing::debug!(page, raw_count, matched_count, "fetched repository page");
            emit(
                on_progress,
                MirrorProgress::FetchedPage {
                    page,
                    count: matched_count,
                    total_so_far: all_repos.len(),
                },
            );

            if matched_count == 0 || raw_count < PAGE_SIZE as usize {
                break;
            }
            page += 1;
        }

        emit(
            on_progress,
            MirrorProgress::FetchComplete {
                total: all_repos.len(),
            },
        );

        Ok(all_repos)
    }
}
