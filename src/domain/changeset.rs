use chrono::{DateTime, Utc};

/// A closed pull request as returned by the history service.
/// `merged_at` is absent for pull requests closed without merging.
#[derive(Debug, Clone)]
pub struct Changeset {
    pub number: u64,
    pub merged_at: Option<DateTime<Utc>>,
}

/// One commit inside a changeset; only the sha is needed to fetch its files.
#[derive(Debug, Clone)]
pub struct Commit {
    pub sha: String,
}

/// A modified file inside one commit. The patch is absent for binary files
/// and renames without content changes; that means zero modified lines, not
/// an error.
#[derive(Debug, Clone)]
pub struct FileDiff {
    pub filename: String,
    pub patch: Option<String>,
}
