//! Route handlers.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use super::AppState;
use super::error::ApiError;
use super::params::{BlogsQuery, FunctionLogsQuery, NotificationsQuery, ProjectsQuery};
use crate::entity::content_document::{PROFILE_KEY, RESUME_KEY};
use crate::entity::{blog_post, content_document, function_log, highlight, note, notification_item};
use crate::repository::{self, BlogSummary, ProjectSummary};

type ApiResult<T> = Result<Json<T>, ApiError>;

pub async fn list_projects(
    State(state): State<AppState>,
    Query(query): Query<ProjectsQuery>,
) -> ApiResult<Vec<ProjectSummary>> {
    let filter = query.into_filter();
    Ok(Json(repository::list_projects(&state.db, &filter).await?))
}

pub async fn get_project(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<ProjectSummary> {
    repository::find_project(&state.db, &key)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Project not found"))
}

pub async fn list_blogs(
    State(state): State<AppState>,
    Query(query): Query<BlogsQuery>,
) -> ApiResult<Vec<BlogSummary>> {
    let filter = query.into_filter();
    Ok(Json(repository::list_blogs(&state.db, &filter).await?))
}

pub async fn get_blog(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<blog_post::Model> {
    repository::find_blog(&state.db, &slug)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Blog not found"))
}

pub async fn list_highlights(State(state): State<AppState>) -> ApiResult<Vec<highlight::Model>> {
    Ok(Json(repository::list_highlights(&state.db).await?))
}

pub async fn list_notifications(
    State(state): State<AppState>,
    Query(query): Query<NotificationsQuery>,
) -> ApiResult<Vec<notification_item::Model>> {
    let filter = query.into_filter();
    Ok(Json(repository::list_notifications(&state.db, &filter).await?))
}

pub async fn list_function_logs(
    State(state): State<AppState>,
    Query(query): Query<FunctionLogsQuery>,
) -> ApiResult<Vec<function_log::Model>> {
    let filter = query.into_filter();
    Ok(Json(repository::list_function_logs(&state.db, &filter).await?))
}

async fn document_payload(state: &AppState, key: &str, missing: &str) -> ApiResult<Value> {
    repository::find_document(&state.db, key)
        .await?
        .map(|doc| Json(doc.payload))
        .ok_or_else(|| ApiError::not_found(missing))
}

pub async fn get_profile(State(state): State<AppState>) -> ApiResult<Value> {
    document_payload(&state, PROFILE_KEY, "Profile not found").await
}

pub async fn get_resume(State(state): State<AppState>) -> ApiResult<Value> {
    document_payload(&state, RESUME_KEY, "Resume not found").await
}

pub async fn get_content_document(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<content_document::Model> {
    repository::find_document(&state.db, &key)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Document not found"))
}

#[derive(Debug, Deserialize)]
pub struct NoteInput {
    #[serde(default)]
    pub content: String,
}

fn note_body(body: Result<Json<NoteInput>, JsonRejection>) -> Result<NoteInput, ApiError> {
    body.map(|Json(input)| input)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

/// Unparseable ids cannot name an existing note.
fn note_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found("Note not found"))
}

pub async fn list_notes(State(state): State<AppState>) -> ApiResult<Vec<note::Model>> {
    Ok(Json(repository::list_notes(&state.db).await?))
}

pub async fn create_note(
    State(state): State<AppState>,
    body: Result<Json<NoteInput>, JsonRejection>,
) -> Result<(StatusCode, Json<note::Model>), ApiError> {
    let input = note_body(body)?;
    let note = repository::create_note(&state.db, &input.content).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

pub async fn update_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<NoteInput>, JsonRejection>,
) -> ApiResult<note::Model> {
    let id = note_id(&id)?;
    let input = note_body(body)?;
    Ok(Json(repository::update_note(&state.db, id, &input.content).await?))
}

pub async fn delete_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let id = note_id(&id)?;
    repository::delete_note(&state.db, id).await?;
    Ok(Json(json!({ "ok": true, "id": id })))
}

/// Preflight requests succeed on every path; anything else unrouted is a 404.
pub async fn fallback(method: Method) -> Response {
    if method == Method::OPTIONS {
        return (StatusCode::OK, Json(json!({ "ok": true }))).into_response();
    }
    ApiError::not_found("Not Found").into_response()
}
