//! HTTP API over the portfolio tables.
//!
//! [`router`] builds the axum application; [`serve`] runs it on a bound
//! listener until the shutdown future resolves.
//!
//! ```ignore
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//! portfolio::api::serve(listener, Arc::new(db), async { let _ = tokio::signal::ctrl_c().await; }).await?;
//! ```

mod error;
mod handlers;
mod params;

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use axum::http::HeaderValue;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};
use axum::middleware;
use axum::response::Response;
use axum::routing::{get, put};
use sea_orm::DatabaseConnection;
use tokio::net::TcpListener;

pub use error::ApiError;
pub use handlers::NoteInput;
pub use params::{
    BlogsQuery, FunctionLogsQuery, NotificationsQuery, ProjectsQuery, to_boolean,
    to_positive_int,
};

/// Shared state handed to every handler.
///
/// The connection sits behind an `Arc` because `DatabaseConnection` is not
/// `Clone` when SeaORM's `mock` feature is enabled.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
}

/// Build the API router.
pub fn router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/projects", get(handlers::list_projects))
        .route("/projects/{key}", get(handlers::get_project))
        .route("/blogs", get(handlers::list_blogs))
        .route("/blogs/{slug}", get(handlers::get_blog))
        .route("/highlights", get(handlers::list_highlights))
        .route("/notifications", get(handlers::list_notifications))
        .route("/function-logs", get(handlers::list_function_logs))
        .route("/profile", get(handlers::get_profile))
        .route("/resume", get(handlers::get_resume))
        .route("/content/{key}", get(handlers::get_content_document))
        .route("/notes", get(handlers::list_notes).post(handlers::create_note))
        .route(
            "/notes/{id}",
            put(handlers::update_note).delete(handlers::delete_note),
        )
        .fallback(handlers::fallback)
        .method_not_allowed_fallback(handlers::fallback)
        .layer(middleware::map_response(cors_headers))
        .with_state(AppState { db })
}

async fn cors_headers(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET,POST,PUT,DELETE,OPTIONS"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    response
}

/// Serve the API on `listener` until `shutdown` resolves.
pub async fn serve<F>(
    listener: TcpListener,
    db: Arc<DatabaseConnection>,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "API listening");
    }
    axum::serve(listener, router(db))
        .with_graceful_shutdown(shutdown)
        .await
}

#[cfg(all(test, feature = "sqlite", feature = "migrate"))]
mod tests {
    use chrono::{TimeZone, Utc};
    use reqwest::StatusCode;
    use sea_orm::{EntityTrait, Set};
    use serde_json::{Value, json};
    use tokio::sync::oneshot;

    use super::*;
    use crate::connect_and_migrate;
    use crate::entity::project_status::ProjectStatus;
    use crate::entity::{content_document, portfolio_project};

    struct TestServer {
        base: String,
        client: reqwest::Client,
        stop: Option<oneshot::Sender<()>>,
        handle: tokio::task::JoinHandle<std::io::Result<()>>,
    }

    impl TestServer {
        async fn start(db: DatabaseConnection) -> Self {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let base = format!("http://{}", listener.local_addr().unwrap());
            let (tx, rx) = oneshot::channel::<()>();
            let handle = tokio::spawn(serve(listener, Arc::new(db), async move {
                let _ = rx.await;
            }));
            Self {
                base,
                client: reqwest::Client::new(),
                stop: Some(tx),
                handle,
            }
        }

        fn url(&self, path: &str) -> String {
            format!("{}{}", self.base, path)
        }

        async fn get(&self, path: &str) -> (StatusCode, Value) {
            let response = self.client.get(self.url(path)).send().await.unwrap();
            let status = response.status();
            (status, response.json().await.unwrap())
        }

        async fn shutdown(mut self) {
            if let Some(stop) = self.stop.take() {
                let _ = stop.send(());
            }
            self.handle.await.unwrap().unwrap();
        }
    }

    async fn seeded_db() -> DatabaseConnection {
        let db = connect_and_migrate("sqlite::memory:").await.unwrap();
        let at = |day| Utc.with_ymd_and_hms(2024, 2, day, 8, 0, 0).unwrap().fixed_offset();
        let project = |key: &str, slug: &str, status, day| portfolio_project::ActiveModel {
            project_key: Set(key.to_string()),
            source: Set(Some("github".to_string())),
            external_id: Set(None),
            github_id: Set(None),
            slug: Set(Some(slug.to_string())),
            title: Set(slug.to_string()),
            description: Set(None),
            body: Set(None),
            thumbnail: Set(None),
            repo_url: Set(None),
            tech: Set(json!(["rust"])),
            links: Set(json!([])),
            status: Set(status),
            visibility_private: Set(false),
            priority_score: Set(None),
            updated_at: Set(Some(at(day))),
            created_at: Set(at(1)),
            raw: Set(Some(json!({"private": "payload"}))),
            github_raw: Set(None),
        };
        portfolio_project::Entity::insert_many([
            project("github:1", "older", Some(ProjectStatus::Published), 2),
            project("github:2", "newer", Some(ProjectStatus::Published), 6),
            project("github:3", "hidden", Some(ProjectStatus::Draft), 9),
        ])
        .exec(&db)
        .await
        .unwrap();

        content_document::Entity::insert(content_document::ActiveModel {
            key: Set("profile".to_string()),
            payload: Set(json!({"name": "Ada"})),
            source_file: Set(Some("profile.json".to_string())),
            updated_at: Set(at(1)),
        })
        .exec(&db)
        .await
        .unwrap();
        db
    }

    #[tokio::test]
    async fn router_releases_shared_connection_when_dropped() {
        let db = Arc::new(connect_and_migrate("sqlite::memory:").await.unwrap());

        let app = router(Arc::clone(&db));
        assert!(Arc::strong_count(&db) >= 2);
        drop(app);

        let db = Arc::try_unwrap(db).expect("router held the last clone");
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn projects_list_hides_drafts_and_raw() {
        let server = TestServer::start(seeded_db().await).await;

        let (status, body) = server.get("/projects").await;
        assert_eq!(status, StatusCode::OK);
        let keys: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["project_key"].as_str().unwrap())
            .collect();
        assert_eq!(keys, vec!["github:2", "github:1"]);
        assert!(body[0].get("raw").is_none());

        let (_, body) = server.get("/projects?includeDrafts=yes&limit=1").await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["project_key"], "github:3");

        server.shutdown().await;
    }

    #[tokio::test]
    async fn project_lookup_by_key_then_slug() {
        let server = TestServer::start(seeded_db().await).await;

        let (status, body) = server.get("/projects/github:1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["slug"], "older");

        let (status, body) = server.get("/projects/newer").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["project_key"], "github:2");

        let (status, body) = server.get("/projects/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Project not found"}));

        server.shutdown().await;
    }

    #[tokio::test]
    async fn documents_return_payload_or_404() {
        let server = TestServer::start(seeded_db().await).await;

        let (status, body) = server.get("/profile").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"name": "Ada"}));

        let (status, body) = server.get("/resume").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Resume not found");

        let (status, body) = server.get("/content/profile").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["key"], "profile");
        assert_eq!(body["source_file"], "profile.json");

        let (status, body) = server.get("/content/missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Document not found");

        server.shutdown().await;
    }

    #[tokio::test]
    async fn notes_crud_round() {
        let server = TestServer::start(seeded_db().await).await;
        let client = &server.client;

        let response = client
            .post(server.url("/notes"))
            .json(&json!({"content": "  first note  "}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created: Value = response.json().await.unwrap();
        assert_eq!(created["content"], "first note");
        let id = created["id"].as_str().unwrap().to_string();

        let response = client
            .post(server.url("/notes"))
            .json(&json!({"content": "   "}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = client
            .put(server.url(&format!("/notes/{id}")))
            .json(&json!({"content": "edited"}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let updated: Value = response.json().await.unwrap();
        assert_eq!(updated["content"], "edited");

        let (_, list) = server.get("/notes").await;
        assert_eq!(list.as_array().unwrap().len(), 1);

        let response = client
            .delete(server.url(&format!("/notes/{id}")))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = client
            .delete(server.url(&format!("/notes/{id}")))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = client
            .put(server.url("/notes/not-a-uuid"))
            .json(&json!({"content": "x"}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        server.shutdown().await;
    }

    #[tokio::test]
    async fn options_and_unknown_routes() {
        let server = TestServer::start(seeded_db().await).await;

        let response = server
            .client
            .request(reqwest::Method::OPTIONS, server.url("/anything/at/all"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "*"
        );
        let body: Value = response.json().await.unwrap();
        assert_eq!(body, json!({"ok": true}));

        let response = server
            .client
            .request(reqwest::Method::OPTIONS, server.url("/notes"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let (status, body) = server.get("/does-not-exist").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Not Found"}));

        let response = server.client.delete(server.url("/projects")).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        server.shutdown().await;
    }
}
