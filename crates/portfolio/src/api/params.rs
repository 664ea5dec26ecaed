//! Query-string parsing.
//!
//! Parameters arrive as raw strings and are coerced leniently: a malformed value
//! falls back to its default instead of rejecting the request.

use serde::Deserialize;

use crate::repository::{BlogFilter, FunctionLogFilter, NotificationFilter, ProjectFilter};

/// `1`, `true` and `yes` (any case) are true; missing or empty is `default`.
pub fn to_boolean(value: Option<&str>, default: bool) -> bool {
    match value {
        None | Some("") => default,
        Some(v) => matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"),
    }
}

/// A positive integer capped at `max`; missing, malformed or < 1 is `fallback`.
///
/// Only the leading digits count, and a value too large for `u64` saturates to `max`.
pub fn to_positive_int(value: Option<&str>, fallback: u64, max: u64) -> u64 {
    let Some(v) = value.map(str::trim) else {
        return fallback;
    };
    let (negative, rest) = match v.as_bytes().first() {
        Some(b'-') => (true, &v[1..]),
        Some(b'+') => (false, &v[1..]),
        _ => (false, v),
    };
    let digits = rest
        .find(|c: char| !c.is_ascii_digit())
        .map_or(rest, |end| &rest[..end]);
    if digits.is_empty() {
        return fallback;
    }

    let n = digits.parse::<u64>().unwrap_or(u64::MAX);
    if negative || n < 1 { fallback } else { n.min(max) }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[derive(Debug, Default, Deserialize)]
pub struct ProjectsQuery {
    #[serde(rename = "includeDrafts")]
    pub include_drafts: Option<String>,
    pub is_published: Option<String>,
    pub slug: Option<String>,
    pub limit: Option<String>,
}

impl ProjectsQuery {
    pub fn into_filter(self) -> ProjectFilter {
        ProjectFilter {
            include_drafts: to_boolean(self.include_drafts.as_deref(), false),
            is_published: self
                .is_published
                .as_deref()
                .map(|v| to_boolean(Some(v), true)),
            slug: non_empty(self.slug),
            limit: to_positive_int(self.limit.as_deref(), 100, 500),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct BlogsQuery {
    #[serde(rename = "includeDrafts")]
    pub include_drafts: Option<String>,
    pub featured: Option<String>,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub limit: Option<String>,
}

impl BlogsQuery {
    pub fn into_filter(self) -> BlogFilter {
        BlogFilter {
            include_drafts: to_boolean(self.include_drafts.as_deref(), false),
            featured_only: to_boolean(self.featured.as_deref(), false),
            category: non_empty(self.category),
            tag: non_empty(self.tag),
            limit: to_positive_int(self.limit.as_deref(), 50, 200),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct NotificationsQuery {
    pub limit: Option<String>,
    pub tag: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl NotificationsQuery {
    pub fn into_filter(self) -> NotificationFilter {
        NotificationFilter {
            tag: non_empty(self.tag),
            kind: non_empty(self.kind),
            limit: to_positive_int(self.limit.as_deref(), 100, 500),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct FunctionLogsQuery {
    pub limit: Option<String>,
    pub success: Option<String>,
}

impl FunctionLogsQuery {
    pub fn into_filter(self) -> FunctionLogFilter {
        FunctionLogFilter {
            success: self.success.as_deref().map(|v| to_boolean(Some(v), false)),
            limit: to_positive_int(self.limit.as_deref(), 50, 500),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boolean_values() {
        assert!(to_boolean(Some("1"), false));
        assert!(to_boolean(Some("TRUE"), false));
        assert!(to_boolean(Some("Yes"), false));
        assert!(!to_boolean(Some("on"), true));
        assert!(to_boolean(Some(""), true));
        assert!(!to_boolean(None, false));
    }

    #[test]
    fn positive_int_values() {
        assert_eq!(to_positive_int(Some("25"), 50, 200), 25);
        assert_eq!(to_positive_int(Some("25abc"), 50, 200), 25);
        assert_eq!(to_positive_int(Some("9999"), 50, 200), 200);
        assert_eq!(to_positive_int(Some("0"), 50, 200), 50);
        assert_eq!(to_positive_int(Some("-4"), 50, 200), 50);
        assert_eq!(to_positive_int(Some("ten"), 50, 200), 50);
        assert_eq!(to_positive_int(None, 50, 200), 50);
    }

    #[test]
    fn oversized_positive_int_saturates_to_max() {
        assert_eq!(to_positive_int(Some("99999999999999999999"), 100, 500), 500);
        assert_eq!(to_positive_int(Some("+99999999999999999999x"), 100, 500), 500);
        assert_eq!(to_positive_int(Some("-99999999999999999999"), 100, 500), 100);
    }

    #[test]
    fn projects_query_defaults() {
        let filter = ProjectsQuery::default().into_filter();
        assert!(!filter.include_drafts);
        assert_eq!(filter.is_published, None);
        assert_eq!(filter.limit, 100);
    }

    #[test]
    fn projects_query_empty_is_published_means_true() {
        let filter = ProjectsQuery {
            is_published: Some(String::new()),
            ..ProjectsQuery::default()
        }
        .into_filter();
        assert_eq!(filter.is_published, Some(true));
    }

    #[test]
    fn function_logs_success_present_but_empty_is_false() {
        let filter = FunctionLogsQuery {
            success: Some(String::new()),
            limit: Some("1000".to_string()),
        }
        .into_filter();
        assert_eq!(filter.success, Some(false));
        assert_eq!(filter.limit, 500);
    }

    #[test]
    fn blank_text_filters_are_ignored() {
        let filter = BlogsQuery {
            tag: Some(String::new()),
            category: Some("eng".to_string()),
            ..BlogsQuery::default()
        }
        .into_filter();
        assert_eq!(filter.tag, None);
        assert_eq!(filter.category.as_deref(), Some("eng"));
        assert_eq!(filter.limit, 50);
    }
}
