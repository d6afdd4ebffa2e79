//! Enumeration normalizers
//!
//! The backend stores priorities and kanban labels as free text, sometimes in
//! Spanish and in any case. These functions map that text onto the closed
//! enums the rest of the crate works with. They are total: unknown input maps
//! to a default instead of failing.

use std::cmp::Ordering;

use crate::models::{KanbanStatus, Priority};

/// Maps a free-form priority onto `Low`, `Medium` or `High`
///
/// Matching is case-insensitive and accepts the Spanish labels
/// (`alta`, `media`, `baja`). Anything else, including the empty string,
/// is `Medium`.
pub fn normalize_priority(raw: &str) -> Priority {
    match raw.trim().to_lowercase().as_str() {
        "high" | "alta" => Priority::High,
        "medium" | "media" => Priority::Medium,
        "low" | "baja" => Priority::Low,
        "" => Priority::Medium,
        other => {
            log::debug!("Unrecognized priority '{}', using Medium", other);
            Priority::Medium
        }
    }
}

/// Normalizes every entry of a list of priorities
pub fn normalize_priorities<S: AsRef<str>>(raw: &[S]) -> Vec<Priority> {
    raw.iter().map(|p| normalize_priority(p.as_ref())).collect()
}

/// Lookup key for a kanban label: lower case, all whitespace removed
pub fn status_key(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Maps a free-form kanban label onto its board column
///
/// "In Review", " in review" and "inreview" all land in `InReview`.
/// Unknown or empty labels land in `Backlog`.
pub fn normalize_status(raw: &str) -> KanbanStatus {
    match status_key(raw).as_str() {
        "todo" => KanbanStatus::Todo,
        "inprogress" => KanbanStatus::InProgress,
        "inreview" => KanbanStatus::InReview,
        "done" => KanbanStatus::Done,
        _ => KanbanStatus::Backlog,
    }
}

/// Orders human-readable identifiers the way a locale-aware string
/// comparison does
///
/// Letters compare case-insensitively first; when two strings differ only in
/// case, lower case sorts first.
pub fn collate(a: &str, b: &str) -> Ordering {
    let folded_a = a.chars().flat_map(char::to_lowercase);
    let folded_b = b.chars().flat_map(char::to_lowercase);

    folded_a.cmp(folded_b).then_with(|| {
        a.chars()
            .zip(b.chars())
            .map(|(x, y)| x.is_uppercase().cmp(&y.is_uppercase()))
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    })
}
