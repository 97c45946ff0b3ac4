//! Index (staging area) data structures
//!
//! - `index_entry`: a single `path → blob hash` association and its line format

pub mod index_entry;

/// Result of staging one `(path, blob)` pair.
///
/// Staging an identical pair twice is reported as `Unchanged` so callers can tell
/// a no-op from a genuine update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    Added,
    Updated,
    Unchanged,
}

impl StageOutcome {
    pub fn as_str(&self) -> &str {
        match self {
            StageOutcome::Added => "added",
            StageOutcome::Updated => "updated",
            StageOutcome::Unchanged => "unchanged",
        }
    }
}
