//! GitHub REST client: paginated repository listing and single-repository lookup.

use std::sync::Arc;
use std::time::Duration;

use url::Url;

use super::error::GitHubError;
use super::types::{GitHubOptions, RemoteRepository};
use crate::http::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};

/// Repositories requested per page; a shorter page ends the listing.
pub const PAGE_SIZE: usize = 100;

/// Wait applied on a rate-limit response without a usable `Retry-After`.
pub const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(60);

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// GitHub API client.
#[derive(Clone)]
pub struct GitHubClient {
    transport: Arc<dyn HttpTransport>,
    api_base: Url,
    token: Option<String>,
    user_agent: String,
}

impl GitHubClient {
    /// Create a client backed by reqwest.
    ///
    /// ```ignore
    /// let client = GitHubClient::new(&GitHubOptions::default().with_token(token))?;
    /// let repos = client.list_user_repos("octocat").await?;
    /// ```
    pub fn new(options: &GitHubOptions) -> Result<Self, GitHubError> {
        let transport = ReqwestTransport::with_timeout(REQUEST_TIMEOUT)
            .map_err(|e| GitHubError::Config(e.to_string()))?;
        Self::new_with_transport(options, Arc::new(transport))
    }

    pub fn new_with_transport(
        options: &GitHubOptions,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, GitHubError> {
        let api_base = Url::parse(options.api_base.trim())
            .map_err(|e| GitHubError::Config(format!("invalid API base URL: {e}")))?;
        if api_base.cannot_be_a_base() {
            return Err(GitHubError::Config(format!(
                "API base URL cannot carry a path: {api_base}"
            )));
        }

        Ok(Self {
            transport,
            api_base,
            token: options.token.clone(),
            user_agent: options.user_agent.clone(),
        })
    }

    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// `{api}/<segments...>` with the base path preserved.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn user_repos_url(&self, username: &str, page: u32) -> Url {
        let mut url = self.endpoint(&["users", username, "repos"]);
        url.query_pairs_mut()
            .append_pair("type", "public")
            .append_pair("per_page", &PAGE_SIZE.to_string())
            .append_pair("page", &page.to_string());
        url
    }

    fn repo_url(&self, owner: &str, repo: &str) -> Url {
        self.endpoint(&["repos", owner, repo])
    }

    async fn send(&self, url: &Url) -> Result<HttpResponse, GitHubError> {
        let mut request = HttpRequest::get(url.as_str())
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", &self.user_agent);
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        self.transport
            .send(request)
            .await
            .map_err(|e| GitHubError::Http(e.to_string()))
    }

    /// List every public repository owned by `username`.
    ///
    /// Pages are requested sequentially until one comes back with fewer than
    /// [`PAGE_SIZE`] entries. Any failing page aborts the listing.
    pub async fn list_user_repos(
        &self,
        username: &str,
    ) -> Result<Vec<RemoteRepository>, GitHubError> {
        let mut repos = Vec::new();
        let mut page = 1u32;

        loop {
            let url = self.user_repos_url(username, page);
            let response = self.send(&url).await?;
            if !response.is_success() {
                return Err(GitHubError::Api {
                    status: response.status,
                    body: response.body_text(),
                });
            }

            let batch: Vec<serde_json::Value> = serde_json::from_slice(&response.body)?;
            let count = batch.len();
            for item in batch {
                repos.push(RemoteRepository::from_value(item)?);
            }
            tracing::debug!(username, page, count, "Fetched repository page");

            if count < PAGE_SIZE {
                break;
            }
            page += 1;
        }

        tracing::info!(username, total = repos.len(), pages = page, "Listed repositories");
        Ok(repos)
    }

    /// Fetch one repository as its raw JSON payload.
    ///
    /// The payload is not decoded into [`RemoteRepository`], so a body missing
    /// `id` is still returned. A 403 or 429 response waits for `Retry-After`
    /// seconds (default [`DEFAULT_RETRY_AFTER`]) and retries once. Any other
    /// non-success status, or a second failure, yields `Ok(None)`.
    pub async fn get_repo(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Option<serde_json::Value>, GitHubError> {
        let url = self.repo_url(owner, repo);
        let mut response = self.send(&url).await?;

        if is_rate_limit_status(response.status) {
            let wait = retry_after(&response);
            tracing::warn!(
                owner,
                repo,
                status = response.status,
                wait_secs = wait.as_secs(),
                "Rate limited, waiting before retrying once"
            );
            tokio::time::sleep(wait).await;
            response = self.send(&url).await?;
        }

        if !response.is_success() {
            tracing::debug!(owner, repo, status = response.status, "Repository unavailable");
            return Ok(None);
        }

        Ok(Some(serde_json::from_slice(&response.body)?))
    }
}

fn is_rate_limit_status(status: u16) -> bool {
    status == 403 || status == 429
}

fn retry_after(response: &HttpResponse) -> Duration {
    response
        .header("retry-after")
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_RETRY_AFTER)
}
