//! Handlers for the link authoring endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use serde_json::json;
use validator::Validate;

use crate::api::dto::link::{CreateLinkRequest, LinkListResponse, LinkResponse, UpdateLinkRequest};
use crate::api::dto::pagination::LinkListParams;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a link.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Request Body
///
/// ```json
/// {
///   "slug": "promo",
///   "target_url": "https://example.com/x",
///   "redirect_type": "permanent",
///   "expires_at": "2030-01-01T00:00:00Z"
/// }
/// ```
///
/// or, for A/B rotation:
///
/// ```json
/// {
///   "slug": "ab",
///   "rotation": [
///     { "url": "https://a.example.com", "weight": 1 },
///     { "url": "https://b.example.com", "weight": 3 }
///   ]
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request with the failed rule in `details.rule` for
/// invalid input or a slug already in use.
pub async fn create_link_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    payload.validate()?;

    let link = state.link_service.create(payload.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(LinkResponse::from_link(link, Utc::now())),
    ))
}

/// Lists active links, newest first.
///
/// # Endpoint
///
/// `GET /api/links?page=1&page_size=25&category=spring`
pub async fn list_links_handler(
    State(state): State<AppState>,
    Query(params): Query<LinkListParams>,
) -> Result<Json<LinkListResponse>, AppError> {
    let (page, page_size) = params
        .page_and_size()
        .map_err(|e| AppError::bad_request(e, json!({})))?;

    let (links, total) = state
        .link_service
        .list(page, page_size, params.category())
        .await?;

    let now = Utc::now();
    Ok(Json(LinkListResponse {
        items: links
            .into_iter()
            .map(|link| LinkResponse::from_link(link, now))
            .collect(),
        page,
        page_size,
        total,
    }))
}

/// Returns one link, including expired ones.
///
/// # Endpoint
///
/// `GET /api/links/{id}`
pub async fn get_link_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<LinkResponse>, AppError> {
    let link = state.link_service.get(id).await?;
    Ok(Json(LinkResponse::from_link(link, Utc::now())))
}

/// Partially updates a link.
///
/// # Endpoint
///
/// `PATCH /api/links/{id}`
///
/// # Errors
///
/// Returns 404 if the link does not exist, 400 on validation failure. A
/// rejected update leaves the stored link unchanged.
pub async fn update_link_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateLinkRequest>,
) -> Result<Json<LinkResponse>, AppError> {
    payload.validate()?;

    let link = state.link_service.update(id, payload.into()).await?;
    Ok(Json(LinkResponse::from_link(link, Utc::now())))
}

/// Soft-deletes a link. Its slug becomes available again.
///
/// # Endpoint
///
/// `DELETE /api/links/{id}`
///
/// Returns 204 No Content, or 404 if the link does not exist.
pub async fn delete_link_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.link_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
