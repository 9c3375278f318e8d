//! Public GitHub repository listing.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::config::GithubConfig;
use crate::error::ImportError;
use crate::models::portfolio::Project;

/// The subset of GitHub's repository object the importer reads.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepoSummary {
    pub name: String,
    #[serde(default)]
    pub homepage: Option<String>,
    pub html_url: String,
}

impl RepoSummary {
    /// Link to the live site when the repository advertises one, otherwise to the repository.
    pub fn into_project(self) -> Project {
        let url = self
            .homepage
            .filter(|h| !h.trim().is_empty())
            .unwrap_or(self.html_url);
        Project {
            name: self.name,
            url,
            selected: false,
        }
    }
}

/// A paged listing of an account's repositories. An empty page marks the end.
#[async_trait]
pub trait RepoSource: Send + Sync {
    async fn list_repos(
        &self,
        handle: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<RepoSummary>, ImportError>;
}

/// GitHub logins are ASCII alphanumerics and single hyphens, at most 39 characters.
pub fn is_valid_handle(handle: &str) -> bool {
    !handle.is_empty()
        && handle.len() <= 39
        && !handle.starts_with('-')
        && handle.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Unauthenticated client for `GET /users/{handle}/repos`.
#[derive(Clone)]
pub struct GithubClient {
    client: reqwest::Client,
    api_url: String,
}

impl GithubClient {
    pub fn new(config: &GithubConfig) -> Result<Self, ImportError> {
        // GitHub rejects API requests without a User-Agent.
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl RepoSource for GithubClient {
    async fn list_repos(
        &self,
        handle: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<RepoSummary>, ImportError> {
        if !is_valid_handle(handle) {
            return Err(ImportError::InvalidHandle(handle.to_string()));
        }

        let url = format!("{}/users/{handle}/repos", self.api_url);
        debug!("Fetching {url} page {page}");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .query(&[
                ("sort", "updated".to_string()),
                ("per_page", per_page.to_string()),
                ("page", page.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImportError::Status(status.as_u16()));
        }

        Ok(response.json::<Vec<RepoSummary>>().await?)
    }
}
