use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::changeset::{Changeset, Commit, FileDiff};
use crate::domain::repo::RepoId;
use crate::error::{AppError, AppResult};
use crate::services::HistoryService;

const API_BASE: &str = "https://api.github.com";
const PAGE_SIZE: usize = 100;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// GitHub REST client backing the history seam. Authenticates with a bearer
/// token; every call is a single attempt with a bounded timeout.
pub struct GitHubClient {
    http: Client,
    token: String,
    base_url: String,
}

impl GitHubClient {
    pub fn new(token: String) -> AppResult<Self> {
        Self::with_base_url(token, API_BASE.to_string())
    }

    pub fn with_base_url(token: String, base_url: String) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| AppError::Configuration(format!("failed to build HTTP client: {err}")))?;
        Ok(Self {
            http,
            token,
            base_url,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> AppResult<T> {
        let url = format!("{}{path}", self.base_url.trim_end_matches('/'));
        let response = self
            .http
            .get(&url)
            .query(query)
            .header(USER_AGENT, "mergemail")
            .header(ACCEPT, "application/vnd.github+json")
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::RemoteQuery {
                status: Some(status.as_u16()),
                message: body,
            });
        }

        response.json::<T>().await.map_err(|err| AppError::RemoteQuery {
            status: None,
            message: format!("failed to parse response from {url}: {err}"),
        })
    }

    /// Walks pages until the service returns a short page.
    async fn get_paginated<T: DeserializeOwned>(
        &self,
        path: &str,
        base_query: &[(&str, String)],
    ) -> AppResult<Vec<T>> {
        let mut items = Vec::new();
        for page in 1.. {
            let mut query = base_query.to_vec();
            query.push(("per_page", PAGE_SIZE.to_string()));
            query.push(("page", page.to_string()));
            let batch: Vec<T> = self.get_json(path, &query).await?;
            let batch_len = batch.len();
            items.extend(batch);
            if batch_len < PAGE_SIZE {
                break;
            }
        }
        Ok(items)
    }
}

fn request_error(err: reqwest::Error) -> AppError {
    AppError::RemoteQuery {
        status: err.status().map(|status| status.as_u16()),
        message: err.to_string(),
    }
}

#[async_trait]
impl HistoryService for GitHubClient {
    async fn closed_changesets(&self, repo: &RepoId) -> AppResult<Vec<Changeset>> {
        let path = format!("/repos/{}/{}/pulls", repo.owner, repo.name);
        let query = [
            ("state", "closed".to_string()),
            ("sort", "updated".to_string()),
            ("direction", "desc".to_string()),
        ];
        let pulls: Vec<PullItem> = self.get_paginated(&path, &query).await?;
        debug!(count = pulls.len(), %repo, "listed closed pull requests");
        Ok(pulls
            .into_iter()
            .map(|pull| Changeset {
                number: pull.number,
                merged_at: pull.merged_at,
            })
            .collect())
    }

    async fn changeset_commits(&self, repo: &RepoId, number: u64) -> AppResult<Vec<Commit>> {
        let path = format!("/repos/{}/{}/pulls/{number}/commits", repo.owner, repo.name);
        let commits: Vec<CommitItem> = self.get_paginated(&path, &[]).await?;
        debug!(count = commits.len(), number, "listed pull request commits");
        Ok(commits
            .into_iter()
            .map(|commit| Commit { sha: commit.sha })
            .collect())
    }

    async fn commit_files(&self, repo: &RepoId, sha: &str) -> AppResult<Vec<FileDiff>> {
        let path = format!("/repos/{}/{}/commits/{sha}", repo.owner, repo.name);
        let detail: CommitDetail = self.get_json(&path, &[]).await?;
        // Empty commits come back without a files collection.
        Ok(detail
            .files
            .unwrap_or_default()
            .into_iter()
            .map(|file| FileDiff {
                filename: file.filename,
                patch: file.patch,
            })
            .collect())
    }
}

#[derive(Deserialize)]
struct PullItem {
    number: u64,
    merged_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct CommitItem {
    sha: String,
}

#[derive(Deserialize)]
struct CommitDetail {
    files: Option<Vec<FileEntry>>,
}

#[derive(Deserialize)]
struct FileEntry {
    filename: String,
    patch: Option<String>,
}
