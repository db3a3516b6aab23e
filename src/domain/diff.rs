/// A changed line extracted from unified-diff patch text. Context lines are
/// dropped at classification time and never reach the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffLine {
    Added(String),
    Removed(String),
}

/// Classify the lines of a unified-diff patch by their first character.
/// The three-character file markers `+++` and `---` are headers, not changes.
pub fn changed_lines(patch: &str) -> Vec<DiffLine> {
    patch
        .lines()
        .filter_map(|line| {
            if line.starts_with("+++") || line.starts_with("---") {
                None
            } else if let Some(content) = line.strip_prefix('+') {
                Some(DiffLine::Added(content.to_string()))
            } else if let Some(content) = line.strip_prefix('-') {
                Some(DiffLine::Removed(content.to_string()))
            } else {
                None
            }
        })
        .collect()
}
