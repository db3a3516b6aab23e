use async_trait::async_trait;

use crate::domain::changeset::{Changeset, Commit, FileDiff};
use crate::domain::repo::RepoId;
use crate::error::AppResult;

/// Read-only view of the source-control history for one repository.
/// Implementations return results in the order the service supplies them;
/// the pipeline relies on that order and never re-sorts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HistoryService: Send + Sync {
    /// Closed pull requests, most recently updated first, across all pages.
    async fn closed_changesets(&self, repo: &RepoId) -> AppResult<Vec<Changeset>>;

    /// Commits belonging to one pull request, in history-service order.
    async fn changeset_commits(&self, repo: &RepoId, number: u64) -> AppResult<Vec<Commit>>;

    /// Per-file diff detail for one commit. An empty commit yields an empty
    /// vector, not an error.
    async fn commit_files(&self, repo: &RepoId, sha: &str) -> AppResult<Vec<FileDiff>>;
}
