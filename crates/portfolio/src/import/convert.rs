//! Lenient field coercion and row builders for the JSON fixtures.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use sea_orm::ActiveValue::{NotSet, Set};
use serde_json::{Value, json};

use crate::entity::project_status::ProjectStatus;
use crate::entity::{
    blog_post, content_document, function_log, highlight, notification_item, portfolio_project,
};

const SLUG_MAX: usize = 80;

/// Lowercase, collapse every non-alphanumeric run into `-`, trim dashes, cap at 80 chars.
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut pending_dash = false;
    for c in value.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }
    slug.chars().take(SLUG_MAX).collect()
}

/// `value` if it is an array, otherwise an empty array.
pub fn as_array(value: Option<&Value>) -> Value {
    match value {
        Some(Value::Array(items)) => Value::Array(items.clone()),
        _ => json!([]),
    }
}

/// Items of an array field, or nothing.
pub fn array_items<'a>(value: Option<&'a Value>) -> &'a [Value] {
    value.and_then(Value::as_array).map(Vec::as_slice).unwrap_or_default()
}

/// Parse a timestamp leniently; anything unrecognized becomes `None`.
///
/// Accepts RFC 3339, naive date-times and dates (taken as UTC), and epoch milliseconds.
pub fn to_timestamp(value: Option<&Value>) -> Option<DateTime<FixedOffset>> {
    match value? {
        Value::String(s) => parse_timestamp_str(s.trim()),
        Value::Number(n) => n
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
            .map(|dt| dt.fixed_offset()),
        _ => None,
    }
}

fn parse_timestamp_str(s: &str) -> Option<DateTime<FixedOffset>> {
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc().fixed_offset());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().fixed_offset())
}

/// Leading integer of a number or string (`"12px"` is 12); anything else is `None`.
pub fn to_integer(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => leading_integer(s.trim()),
        _ => None,
    }
}

fn leading_integer(s: &str) -> Option<i64> {
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

fn to_i32(value: Option<&Value>) -> Option<i32> {
    to_integer(value).and_then(|n| i32::try_from(n).ok())
}

/// Loose truthiness: `null`, `false`, `0`, `""` and missing are false.
pub fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => true,
    }
}

/// A present, non-null field.
fn present<'a>(row: &'a Value, field: &str) -> Option<&'a Value> {
    row.get(field).filter(|v| !v.is_null())
}

fn string_field(row: &Value, field: &str) -> Option<String> {
    present(row, field).and_then(Value::as_str).map(String::from)
}

/// A key fragment from a string or number field.
fn key_fragment(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn content_document(
    key: &str,
    payload: Value,
    source_file: &str,
    now: DateTime<FixedOffset>,
) -> content_document::ActiveModel {
    content_document::ActiveModel {
        key: Set(key.to_string()),
        payload: Set(payload),
        source_file: Set(Some(source_file.to_string())),
        updated_at: Set(now),
    }
}

pub fn highlight(index: usize, row: &Value) -> highlight::ActiveModel {
    highlight::ActiveModel {
        id: NotSet,
        title: Set(string_field(row, "title").unwrap_or_default()),
        tag: Set(string_field(row, "tag")),
        year: Set(to_i32(present(row, "year"))),
        technologies: Set(as_array(row.get("technologies"))),
        description: Set(string_field(row, "description")),
        links: Set(as_array(row.get("links"))),
        sort_order: Set(i32::try_from(index).unwrap_or(i32::MAX)),
        raw: Set(row.clone()),
    }
}

/// Which fixture file a project came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectSource {
    Legacy,
    Personal,
}

impl ProjectSource {
    pub fn key_prefix(self) -> &'static str {
        match self {
            ProjectSource::Legacy => "legacy",
            ProjectSource::Personal => "personal",
        }
    }

    pub fn source_label(self) -> &'static str {
        match self {
            ProjectSource::Legacy => "legacy-projects",
            ProjectSource::Personal => "personal-projects",
        }
    }

    fn default_title(self, index: usize) -> String {
        match self {
            ProjectSource::Legacy => format!("Legacy Project {}", index + 1),
            ProjectSource::Personal => format!("Personal Project {}", index + 1),
        }
    }

    /// Legacy rows prefer `id` over `slug`; personal rows the reverse.
    fn key_base(self, index: usize, row: &Value) -> String {
        let (first, second) = match self {
            ProjectSource::Legacy => ("id", "slug"),
            ProjectSource::Personal => ("slug", "id"),
        };
        key_fragment(present(row, first))
            .or_else(|| key_fragment(present(row, second)))
            .unwrap_or_else(|| {
                let fallback = string_field(row, "title")
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| format!("{}-{index}", self.key_prefix()));
                slugify(&fallback)
            })
    }
}

pub fn project(
    source: ProjectSource,
    index: usize,
    row: &Value,
    now: DateTime<FixedOffset>,
) -> portfolio_project::ActiveModel {
    let (status, updated_at, priority_score, tech, github_id) = match source {
        ProjectSource::Legacy => (string_field(row, "status"), None, None, json!([]), None),
        ProjectSource::Personal => (
            string_field(row, "draft_or_published").or_else(|| string_field(row, "status")),
            to_timestamp(present(row, "updated_at")),
            to_i32(present(row, "priority_score")),
            as_array(row.get("tech")),
            to_integer(row.get("github").and_then(|g| g.get("id"))),
        ),
    };

    portfolio_project::ActiveModel {
        project_key: Set(format!(
            "{}:{}",
            source.key_prefix(),
            source.key_base(index, row)
        )),
        source: Set(Some(source.source_label().to_string())),
        external_id: Set(to_integer(present(row, "id"))),
        github_id: Set(github_id),
        slug: Set(string_field(row, "slug")),
        title: Set(string_field(row, "title").unwrap_or_else(|| source.default_title(index))),
        description: Set(string_field(row, "description")),
        body: Set(string_field(row, "body")),
        thumbnail: Set(string_field(row, "thumbnail")),
        repo_url: Set(string_field(row, "repo")),
        tech: Set(tech),
        links: Set(as_array(row.get("links"))),
        status: Set(status.and_then(|s| s.parse::<ProjectStatus>().ok())),
        visibility_private: Set(truthy(row.get("private"))),
        priority_score: Set(priority_score),
        updated_at: Set(updated_at),
        created_at: Set(now),
        raw: Set(Some(row.clone())),
        github_raw: Set(None),
    }
}

/// Build a blog row from its index entry and detail document.
pub fn blog_post(
    slug: &str,
    item: &Value,
    detail: &Value,
    now: DateTime<FixedOffset>,
) -> blog_post::ActiveModel {
    let either = |field: &str| present(detail, field).or_else(|| present(item, field));

    let status = string_field(detail, "status").unwrap_or_else(|| {
        if truthy(item.get("draft")) {
            "draft".to_string()
        } else {
            "published".to_string()
        }
    });

    blog_post::ActiveModel {
        slug: Set(slug.to_string()),
        title: Set(either("title")
            .and_then(Value::as_str)
            .unwrap_or(slug)
            .to_string()),
        excerpt: Set(string_field(detail, "excerpt")),
        author: Set(string_field(detail, "author")),
        content: Set(string_field(detail, "content")),
        body: Set(string_field(detail, "body")),
        status: Set(Some(status)),
        visibility_private: Set(truthy(detail.get("private"))),
        featured: Set(truthy(either("featured"))),
        draft: Set(truthy(either("draft"))),
        thumbnail: Set(either("thumbnail").and_then(Value::as_str).map(String::from)),
        load_readme_from_this_repo: Set(string_field(detail, "load_readme_from_this_repo")),
        categories: Set(as_array(item.get("categories"))),
        tags: Set(as_array(detail.get("tags"))),
        published_at: Set(to_timestamp(either("date"))),
        raw: Set(json!({ "index": item, "detail": detail })),
        updated_at: Set(now),
    }
}

/// `YYYY-MM-DD` from a `YYYY-MM-DD.json` batch file name.
pub fn batch_date(file_name: &str) -> Option<String> {
    let stem = file_name.strip_suffix(".json")?;
    NaiveDate::parse_from_str(stem, "%Y-%m-%d").ok()?;
    (stem.len() == 10).then(|| stem.to_string())
}

pub fn notification(file_name: &str, row: &Value) -> notification_item::ActiveModel {
    let id = key_fragment(present(row, "id")).unwrap_or_else(|| {
        let label = string_field(row, "title")
            .or_else(|| string_field(row, "message"))
            .unwrap_or_else(|| "notification".to_string());
        format!("{file_name}:{}", slugify(&label))
    });

    notification_item::ActiveModel {
        id: Set(id),
        kind: Set(string_field(row, "type")),
        title: Set(string_field(row, "title").unwrap_or_default()),
        message: Set(string_field(row, "message").unwrap_or_default()),
        persistent: Set(truthy(row.get("persistent"))),
        tags: Set(as_array(row.get("tags"))),
        occurred_at: Set(to_timestamp(present(row, "timestamp"))),
        batch_date: Set(batch_date(file_name)),
        source_file: Set(Some(file_name.to_string())),
        raw: Set(row.clone()),
    }
}

pub fn function_log(row: &Value) -> function_log::ActiveModel {
    function_log::ActiveModel {
        id: NotSet,
        logged_at: Set(to_timestamp(present(row, "timestamp"))),
        environment: Set(string_field(row, "environment")),
        node_version: Set(string_field(row, "nodeVersion")),
        region: Set(string_field(row, "region")),
        function_instance_id: Set(string_field(row, "functionInstanceId")),
        memory_limit: Set(to_i32(present(row, "memoryLimit"))),
        success: Set(row.get("success").map(|v| truthy(Some(v)))),
        error: Set(string_field(row, "error")),
        stats: Set(present(row, "stats").cloned().unwrap_or_else(|| json!({}))),
        raw: Set(row.clone()),
    }
}
