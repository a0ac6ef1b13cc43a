use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::CurrentUser;
use super::types::{ListDto, MessageResponse};
use super::{ApiError, AppState, validation};
use crate::services::list_service::{ListError, NewList};

const TITLE_MAX: usize = 100;
const DESCRIPTION_MAX: usize = 500;

/// Body of both create and full-replace update.
#[derive(Debug, Deserialize)]
pub struct ListPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}

impl From<ListError> for ApiError {
    fn from(err: ListError) -> Self {
        match err {
            ListError::NotFound => Self::not_found("List not found"),
            ListError::Database(msg) => Self::DatabaseError(msg),
        }
    }
}

fn validated(payload: ListPayload) -> Result<NewList, ApiError> {
    let mut errors = Vec::new();
    validation::check_title(&mut errors, payload.title.as_deref(), TITLE_MAX);
    validation::check_description(&mut errors, payload.description.as_deref(), DESCRIPTION_MAX);

    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    // Empty strings behave like absent fields: NULL description, default color
    Ok(NewList {
        title: payload.title.unwrap_or_default().trim().to_string(),
        description: payload.description.filter(|d| !d.is_empty()),
        color: payload.color.filter(|c| !c.is_empty()),
    })
}

/// GET /api/lists
pub async fn list_lists(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<Vec<ListDto>>, ApiError> {
    let lists = state.list_service().list_all(current.id).await?;

    Ok(Json(lists.into_iter().map(ListDto::from).collect()))
}

/// GET /api/lists/{id}
pub async fn get_list(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<ListDto>, ApiError> {
    let list = state.list_service().get(current.id, id).await?;

    Ok(Json(list.into()))
}

/// POST /api/lists
pub async fn create_list(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<ListPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let input = validated(payload)?;

    let list = state.list_service().create(current.id, input).await?;

    Ok((StatusCode::CREATED, Json(ListDto::from(list))))
}

/// PUT /api/lists/{id}
///
/// Full-replace: all three fields are rewritten from the request, with
/// absent description and color falling back to NULL and the default.
pub async fn update_list(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i32>,
    Json(payload): Json<ListPayload>,
) -> Result<Json<ListDto>, ApiError> {
    let input = validated(payload)?;

    let list = state.list_service().update(current.id, id, input).await?;

    Ok(Json(list.into()))
}

/// DELETE /api/lists/{id}
pub async fn delete_list(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.list_service().delete(current.id, id).await?;

    Ok(Json(MessageResponse::new(
        "List and associated tasks deleted successfully",
    )))
}
