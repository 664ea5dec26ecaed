//! Read and write operations over the portfolio tables.
//!
//! Queries return entity models or public projections ([`ProjectSummary`],
//! [`BlogSummary`]) ready to be serialized by the HTTP API.

mod blogs;
mod documents;
mod errors;
mod feeds;
mod notes;
mod projects;

pub use blogs::{BlogFilter, BlogSummary, find_blog, list_blogs};
pub use documents::find_document;
pub use errors::{RepositoryError, Result};
pub use feeds::{
    FunctionLogFilter, NotificationFilter, list_function_logs, list_highlights,
    list_notifications,
};
pub use notes::{create_note, delete_note, list_notes, update_note};
pub use projects::{
    ProjectFilter, ProjectSummary, find_missing_github_raw, find_project, list_projects,
    set_github_raw,
};

/// Whether a JSON array holds the string `needle`.
pub(crate) fn json_array_contains(labels: &serde_json::Value, needle: &str) -> bool {
    labels
        .as_array()
        .is_some_and(|items| items.iter().any(|v| v.as_str() == Some(needle)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_array_contains_matches_strings_only() {
        let labels = json!(["rust", 3, "cli"]);
        assert!(json_array_contains(&labels, "rust"));
        assert!(!json_array_contains(&labels, "3"));
        assert!(!json_array_contains(&json!("rust"), "rust"));
        assert!(!json_array_contains(&json!(null), "rust"));
    }

    #[test]
    fn not_found_message_names_entity() {
        let err = RepositoryError::not_found("Note", "abc");
        assert_eq!(err.to_string(), "Note not found: abc");
    }
}
