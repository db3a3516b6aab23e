use crate::domain::changeset::FileDiff;
use crate::domain::diff::{self, DiffLine};

/// The ordered textual record of every diff considered for one report.
/// Block order follows fetch order exactly; building the same inputs twice
/// produces byte-identical text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript(String);

impl Transcript {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Appends one block at a time, in the order the collector walks the window.
#[derive(Debug, Default)]
pub struct TranscriptBuilder {
    buf: String,
}

impl TranscriptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Header for one changeset. Emitted even when the changeset turns out to
    /// have no commits.
    pub fn open_changeset(&mut self, number: u64) {
        self.buf.push_str(&format!("---> Pull Request #{number}:\n"));
    }

    /// Header for one commit. Emitted even when the commit modifies no files.
    pub fn open_commit(&mut self, sha: &str) {
        self.buf.push_str(&format!("--> Commit {sha}:\n"));
    }

    /// Header plus changed lines for one file. A file without patch text
    /// contributes the header and nothing else.
    pub fn push_file(&mut self, file: &FileDiff) {
        self.buf
            .push_str(&format!("-> File modified: {}:\n", file.filename));
        let Some(patch) = file.patch.as_deref() else {
            return;
        };
        for line in diff::changed_lines(patch) {
            match line {
                DiffLine::Added(content) => self.buf.push_str(&format!("+ {content}\n")),
                DiffLine::Removed(content) => self.buf.push_str(&format!("- {content}\n")),
            }
        }
    }

    pub fn finish(self) -> Transcript {
        Transcript(self.buf)
    }
}
