//! Conversion from GitHub repositories to portfolio project rows.

use chrono::{DateTime, FixedOffset};
use sea_orm::ActiveValue::Set;
use serde_json::{Value, json};

use super::types::RemoteRepository;
use crate::entity::portfolio_project::{
    ActiveModel as PortfolioProjectActiveModel, GITHUB_SOURCE, github_project_key,
};
use crate::entity::project_status::ProjectStatus;

/// Fields of a repository payload kept in `github_raw`.
pub const GITHUB_RAW_FIELDS: [&str; 6] = [
    "fork",
    "id",
    "html_url",
    "created_at",
    "updated_at",
    "pushed_at",
];

/// Curated subset of a repository payload. Missing fields become `null`.
pub fn github_raw_subset(payload: &Value) -> Value {
    let subset: serde_json::Map<String, Value> = GITHUB_RAW_FIELDS
        .iter()
        .map(|field| {
            let value = payload.get(field).cloned().unwrap_or(Value::Null);
            (field.to_string(), value)
        })
        .collect();
    Value::Object(subset)
}

/// Curated subset, or `None` when the payload carries none of the curated fields.
pub fn curated_github_raw(payload: &Value) -> Option<Value> {
    let has_any = GITHUB_RAW_FIELDS.iter().any(|field| match payload.get(field) {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    });
    has_any.then(|| github_raw_subset(payload))
}

fn parse_timestamp(value: Option<&str>) -> Option<DateTime<FixedOffset>> {
    value.and_then(|v| DateTime::parse_from_rfc3339(v).ok())
}

fn tech_labels(repo: &RemoteRepository) -> Value {
    json!(repo.topics)
}

/// Build a new project row for a repository seen for the first time.
///
/// `now` stands in for `created_at` when the payload has no creation time.
pub fn to_new_project(
    repo: &RemoteRepository,
    now: DateTime<FixedOffset>,
) -> PortfolioProjectActiveModel {
    PortfolioProjectActiveModel {
        project_key: Set(github_project_key(repo.id)),
        source: Set(Some(GITHUB_SOURCE.to_string())),
        external_id: Set(None),
        github_id: Set(Some(repo.id)),
        slug: Set(repo.name.clone()),
        title: Set(repo.title().to_string()),
        description: Set(repo.description.clone()),
        body: Set(None),
        thumbnail: Set(None),
        repo_url: Set(repo.html_url.clone()),
        tech: Set(tech_labels(repo)),
        links: Set(json!([])),
        status: Set(Some(ProjectStatus::Published)),
        visibility_private: Set(repo.private),
        priority_score: Set(None),
        updated_at: Set(parse_timestamp(repo.updated_at.as_deref())),
        created_at: Set(parse_timestamp(repo.created_at.as_deref()).unwrap_or(now)),
        raw: Set(Some(repo.raw.clone())),
        github_raw: Set(Some(github_raw_subset(&repo.raw))),
    }
}

/// Overwrite the GitHub-sourced fields of an existing row.
///
/// `project_key`, `github_id`, `slug` and the hand-curated columns are left alone.
pub fn apply_repo_update(model: &mut PortfolioProjectActiveModel, repo: &RemoteRepository) {
    model.title = Set(repo.title().to_string());
    model.description = Set(repo.description.clone());
    model.repo_url = Set(repo.html_url.clone());
    model.status = Set(Some(ProjectStatus::Published));
    model.visibility_private = Set(repo.private);
    model.tech = Set(tech_labels(repo));
    model.raw = Set(Some(repo.raw.clone()));
    model.github_raw = Set(Some(github_raw_subset(&repo.raw)));
    if let Some(updated_at) = parse_timestamp(repo.updated_at.as_deref()) {
        model.updated_at = Set(Some(updated_at));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn repo(value: Value) -> RemoteRepository {
        RemoteRepository::from_value(value).unwrap()
    }

    #[test]
    fn new_project_from_minimal_repo() {
        let r = repo(json!({ "id": 42, "name": "demo", "private": false, "topics": ["cli"] }));
        let now = Utc::now().fixed_offset();
        let am = to_new_project(&r, now);

        assert_eq!(am.project_key.clone().unwrap(), "github:42");
        assert_eq!(am.github_id.clone().unwrap(), Some(42));
        assert_eq!(am.source.clone().unwrap().as_deref(), Some("github"));
        assert_eq!(am.slug.clone().unwrap().as_deref(), Some("demo"));
        assert_eq!(am.title.clone().unwrap(), "demo");
        assert_eq!(am.status.clone().unwrap(), Some(ProjectStatus::Published));
        assert!(!am.visibility_private.clone().unwrap());
        assert_eq!(am.tech.clone().unwrap(), json!(["cli"]));
        assert_eq!(am.created_at.clone().unwrap(), now);
    }

    #[test]
    fn new_project_uses_payload_timestamps() {
        let r = repo(json!({
            "id": 7,
            "created_at": "2021-03-04T05:06:07Z",
            "updated_at": "2024-01-02T03:04:05Z"
        }));
        let am = to_new_project(&r, Utc::now().fixed_offset());
        assert_eq!(am.title.clone().unwrap(), "Untitled");
        assert_eq!(
            am.created_at.clone().unwrap().to_rfc3339(),
            "2021-03-04T05:06:07+00:00"
        );
        assert!(am.updated_at.clone().unwrap().is_some());
    }

    #[test]
    fn github_raw_subset_has_exactly_curated_fields() {
        let payload = json!({
            "id": 1,
            "fork": true,
            "html_url": "https://github.com/a/b",
            "stargazers_count": 3
        });
        let subset = github_raw_subset(&payload);
        let obj = subset.as_object().unwrap();
        assert_eq!(obj.len(), GITHUB_RAW_FIELDS.len());
        assert_eq!(obj["fork"], json!(true));
        assert_eq!(obj["pushed_at"], Value::Null);
        assert!(!obj.contains_key("stargazers_count"));
    }

    #[test]
    fn curated_github_raw_requires_some_field() {
        assert!(curated_github_raw(&json!({ "message": "Not Found" })).is_none());
        assert!(curated_github_raw(&json!({ "html_url": "", "id": null })).is_none());
        assert!(curated_github_raw(&json!({ "fork": false })).is_some());
    }

    #[test]
    fn update_keeps_identity_and_slug() {
        let original = repo(json!({ "id": 42, "name": "demo" }));
        let mut am = to_new_project(&original, Utc::now().fixed_offset());

        let renamed = repo(json!({ "id": 42, "name": "demo-renamed", "private": true }));
        apply_repo_update(&mut am, &renamed);

        assert_eq!(am.project_key.clone().unwrap(), "github:42");
        assert_eq!(am.slug.clone().unwrap().as_deref(), Some("demo"));
        assert_eq!(am.title.clone().unwrap(), "demo-renamed");
        assert!(am.visibility_private.clone().unwrap());
    }
}
