//! GitHub API data types.

use serde::{Deserialize, Deserializer};

/// Default REST API root.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Default `User-Agent` sent with every request.
pub const DEFAULT_USER_AGENT: &str = "portfolio-sync";

/// Connection settings for [`super::GitHubClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubOptions {
    /// API root, e.g. `https://api.github.com` or `https://ghe.example.com/api/v3`.
    pub api_base: String,
    /// Optional bearer token; raises the rate limit when present.
    pub token: Option<String>,
    pub user_agent: String,
}

impl Default for GitHubOptions {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            token: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl GitHubOptions {
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }
}

/// A repository as returned by the GitHub REST API.
///
/// Only the fields the portfolio uses are decoded; the complete payload is kept
/// in [`RemoteRepository::raw`].
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteRepository {
    pub id: i64,
    pub name: Option<String>,
    pub description: Option<String>,
    pub html_url: Option<String>,
    pub private: bool,
    pub fork: Option<bool>,
    /// Topic labels in API order. Empty when absent or malformed.
    pub topics: Vec<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub pushed_at: Option<String>,
    /// Verbatim JSON object the repository was decoded from.
    pub raw: serde_json::Value,
}

#[derive(Deserialize)]
struct RepoFields {
    id: i64,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    html_url: Option<String>,
    #[serde(default)]
    private: Option<bool>,
    #[serde(default)]
    fork: Option<bool>,
    #[serde(default, deserialize_with = "lenient_topics")]
    topics: Vec<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
    #[serde(default)]
    pushed_at: Option<String>,
}

/// Accept any JSON for `topics`; keep only string entries of an array.
fn lenient_topics<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

impl RemoteRepository {
    /// Decode a repository from its JSON object, keeping the payload verbatim.
    pub fn from_value(raw: serde_json::Value) -> Result<Self, serde_json::Error> {
        let fields = RepoFields::deserialize(&raw)?;
        Ok(Self {
            id: fields.id,
            name: fields.name,
            description: fields.description,
            html_url: fields.html_url,
            private: fields.private.unwrap_or(false),
            fork: fields.fork,
            topics: fields.topics,
            created_at: fields.created_at,
            updated_at: fields.updated_at,
            pushed_at: fields.pushed_at,
            raw,
        })
    }

    /// Title shown for the project: the repository name, or `Untitled`.
    pub fn title(&self) -> &str {
        self.name.as_deref().unwrap_or("Untitled")
    }
}
