use std::collections::HashMap;

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;
use serde_json::{Value, json};

use masterblog_api::{ApiError, ApiResponse, MessageBody};
use masterblog_core::{CommentDraft, CoreError, PostDraft, PostPatch};
use masterblog_storage::{
    ListParams, PageParams, PostPage, SearchParams, SortDirection, SortField, StorageError,
};

use crate::config::PaginationConfig;
use crate::server::AppState;

#[derive(Serialize)]
pub struct HealthResponse<'a> {
    status: &'a str,
}

pub async fn root() -> impl IntoResponse {
    let body = json!({
        "service": "Masterblog Server",
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "message": "Welcome to the Blog API. Use /api/posts to interact with the posts.",
    });
    (StatusCode::OK, Json(body))
}

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse { status: "ok" }))
}

pub async fn readyz(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    // Ready once storage answers trivial queries.
    let posts = state.storage.count_posts().await.map_err(storage_error)?;
    let comments = state.storage.count_comments().await.map_err(storage_error)?;
    tracing::trace!(posts, comments, "readiness probe against storage");
    Ok((StatusCode::OK, Json(HealthResponse { status: "ready" })))
}

pub async fn favicon() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}

// ---- Posts ----

pub async fn list_posts(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, ApiError> {
    let list = parse_list_params(&params, &state.pagination)?;
    let PostPage { total, posts, .. } = state
        .storage
        .list_posts(&list)
        .await
        .map_err(storage_error)?;
    Ok(ApiResponse::ok(posts).with_total_count(total))
}

pub async fn create_post(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let body = json_body("post", payload)?;
    let draft = PostDraft::from_value(body).map_err(invalid_payload)?;
    let post = state
        .storage
        .create_post(draft)
        .await
        .map_err(storage_error)?;
    Ok(ApiResponse::created(post))
}

pub async fn update_post(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = path_post_id(id)?;
    // Body errors surface before the not-found check, matching the
    // behavior clients already rely on.
    let body = json_body("post", payload)?;
    let patch = PostPatch::from_value(body).map_err(invalid_payload)?;
    let post = state
        .storage
        .update_post(id, patch)
        .await
        .map_err(storage_error)?;
    Ok(ApiResponse::ok(post))
}

pub async fn delete_post(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = path_post_id(id)?;
    state
        .storage
        .delete_post(id)
        .await
        .map_err(storage_error)?;
    Ok(ApiResponse::ok(MessageBody::new(format!(
        "Post with id {id} has been deleted successfully."
    ))))
}

pub async fn search_posts(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, ApiError> {
    let search = SearchParams::new(params.get("title").cloned(), params.get("content").cloned());
    let posts = state
        .storage
        .search_posts(&search)
        .await
        .map_err(storage_error)?;
    let total = posts.len();
    Ok(ApiResponse::ok(posts).with_total_count(total))
}

// ---- Comments ----

pub async fn create_comment(
    State(state): State<AppState>,
    post_id: Result<Path<u64>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let post_id = path_post_id(post_id)?;
    // The parent post must exist before the payload is even looked at;
    // nothing is created for an unknown post id.
    if post_exists(&state, post_id).await? {
        let body = json_body("comment", payload)?;
        let draft = CommentDraft::from_value(body).map_err(invalid_payload)?;
        let comment = state
            .storage
            .create_comment(post_id, draft)
            .await
            .map_err(storage_error)?;
        Ok(ApiResponse::created(comment))
    } else {
        Err(ApiError::not_found("Post not found"))
    }
}

pub async fn list_comments(
    State(state): State<AppState>,
    post_id: Result<Path<u64>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let post_id = path_post_id(post_id)?;
    let comments = state
        .storage
        .list_comments(post_id)
        .await
        .map_err(storage_error)?;
    Ok(ApiResponse::ok(comments))
}

// ---- Helpers ----

async fn post_exists(state: &AppState, post_id: u64) -> Result<bool, ApiError> {
    let post = state
        .storage
        .get_post(post_id)
        .await
        .map_err(storage_error)?;
    Ok(post.is_some())
}

/// Resolve the `{id}` path segment, treating a non-numeric id the same as an
/// unknown one.
fn path_post_id(param: Result<Path<u64>, PathRejection>) -> Result<u64, ApiError> {
    match param {
        Ok(Path(id)) => Ok(id),
        Err(rejection) => {
            tracing::debug!(detail = %rejection.body_text(), "rejected post id path segment");
            Err(ApiError::not_found("Post not found"))
        }
    }
}

fn json_body(entity: &str, payload: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    match payload {
        Ok(Json(value)) => Ok(value),
        // Bodies over the configured limit keep their 413 status instead of
        // being reported as a client payload error.
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            Err(ApiError::payload_too_large(rejection.body_text()))
        }
        Err(rejection) => Err(ApiError::bad_request(format!(
            "Invalid {entity} payload: {}",
            rejection.body_text()
        ))),
    }
}

fn invalid_payload(err: CoreError) -> ApiError {
    if err.is_client_error() {
        ApiError::bad_request(err.to_string())
    } else {
        ApiError::internal(err.to_string())
    }
}

fn storage_error(err: StorageError) -> ApiError {
    tracing::debug!(category = %err.category(), error = %err, "storage operation failed");
    match err {
        StorageError::NotFound { entity, .. } => ApiError::not_found(format!("{entity} not found")),
        StorageError::Internal { message } => ApiError::internal(message),
    }
}

fn parse_list_params(
    params: &HashMap<String, String>,
    pagination: &PaginationConfig,
) -> Result<ListParams, ApiError> {
    let mut list = ListParams::new();

    if let Some(raw) = params.get("sort") {
        let field: SortField = raw
            .parse()
            .map_err(|e: masterblog_storage::InvalidSortField| {
                ApiError::bad_request(e.to_string())
            })?;
        list = list.with_sort(field);
    }
    if let Some(raw) = params.get("direction") {
        let direction: SortDirection =
            raw.parse()
                .map_err(|e: masterblog_storage::InvalidSortDirection| {
                    ApiError::bad_request(e.to_string())
                })?;
        list = list.with_direction(direction);
    }

    // Pagination engages as soon as either parameter shows up; the missing
    // one falls back to its configured default.
    let page = params.get("page");
    let limit = params.get("limit");
    if page.is_some() || limit.is_some() {
        let number = match page {
            Some(raw) => parse_positive(raw, "page")?,
            None => 1,
        };
        let limit = match limit {
            Some(raw) => parse_positive(raw, "limit")?,
            None => pagination.default_limit,
        };
        list = list.with_page(PageParams::new(number, limit.min(pagination.max_limit)));
    }

    Ok(list)
}

fn parse_positive(raw: &str, name: &str) -> Result<usize, ApiError> {
    match raw.parse::<usize>() {
        Ok(value) if value >= 1 => Ok(value),
        _ => Err(ApiError::bad_request(format!("Invalid {name} parameter"))),
    }
}
