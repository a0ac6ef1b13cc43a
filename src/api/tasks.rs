use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Deserializer};
use std::sync::Arc;

use super::auth::CurrentUser;
use super::types::{MessageResponse, TaskDto};
use super::{ApiError, AppState, validation};
use crate::db::TaskPatch;
use crate::services::task_service::{NewTask, TaskError};

const TITLE_MAX: usize = 200;
const DESCRIPTION_MAX: usize = 1000;

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "listId")]
    pub list_id: Option<i32>,
    pub priority: Option<String>,
    #[serde(rename = "dueDate")]
    pub due_date: Option<String>,
}

/// Partial update body. `due_date` is doubly optional: a missing key keeps
/// the stored value, an explicit null (or empty string) clears it.
#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub completed: Option<bool>,
    #[serde(default, rename = "dueDate", deserialize_with = "present_or_null")]
    pub due_date: Option<Option<String>>,
}

/// Plain `Option<Option<T>>` folds an explicit null into the outer level,
/// erasing the present-but-null case. Wrapping whatever the field holds in
/// `Some` keeps it: missing key stays `None` via the field default.
fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl From<TaskError> for ApiError {
    fn from(err: TaskError) -> Self {
        match err {
            TaskError::TaskNotFound => Self::not_found("Task not found"),
            TaskError::ListNotFound => Self::not_found("List not found"),
            TaskError::Database(msg) => Self::DatabaseError(msg),
        }
    }
}

/// GET /api/tasks/list/{listId}
pub async fn list_tasks_for_list(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(list_id): Path<i32>,
) -> Result<Json<Vec<TaskDto>>, ApiError> {
    let tasks = state
        .task_service()
        .list_for_list(current.id, list_id)
        .await?;

    Ok(Json(tasks.into_iter().map(TaskDto::from).collect()))
}

/// GET /api/tasks
pub async fn list_tasks(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<Vec<TaskDto>>, ApiError> {
    let tasks = state.task_service().list_all(current.id).await?;

    Ok(Json(tasks.into_iter().map(TaskDto::from).collect()))
}

/// GET /api/tasks/{id}
pub async fn get_task(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<TaskDto>, ApiError> {
    let task = state.task_service().get(current.id, id).await?;

    Ok(Json(task.into()))
}

/// POST /api/tasks
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut errors = Vec::new();
    validation::check_title(&mut errors, payload.title.as_deref(), TITLE_MAX);
    validation::check_description(&mut errors, payload.description.as_deref(), DESCRIPTION_MAX);
    validation::check_list_id(&mut errors, payload.list_id);
    validation::check_priority(&mut errors, payload.priority.as_deref());
    validation::check_due_date(&mut errors, payload.due_date.as_deref());

    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    // Empty strings behave like absent fields
    let input = NewTask {
        title: payload.title.unwrap_or_default().trim().to_string(),
        description: payload.description.filter(|d| !d.is_empty()),
        list_id: payload.list_id.unwrap_or_default(),
        priority: payload.priority,
        due_date: payload.due_date.filter(|d| !d.is_empty()),
    };

    let task = state.task_service().create(current.id, input).await?;

    Ok((StatusCode::CREATED, Json(TaskDto::from(task))))
}

/// PUT /api/tasks/{id}
///
/// Only fields present in the body are rewritten; everything else keeps
/// its stored value.
pub async fn update_task(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateTaskRequest>,
) -> Result<Json<TaskDto>, ApiError> {
    let mut errors = Vec::new();
    validation::check_optional_title(&mut errors, payload.title.as_deref(), TITLE_MAX);
    validation::check_description(&mut errors, payload.description.as_deref(), DESCRIPTION_MAX);
    validation::check_priority(&mut errors, payload.priority.as_deref());
    if let Some(due_date) = &payload.due_date {
        validation::check_due_date(&mut errors, due_date.as_deref());
    }

    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let patch = TaskPatch {
        title: payload.title.map(|t| t.trim().to_string()),
        description: payload.description,
        priority: payload.priority,
        completed: payload.completed,
        // Normalize the empty string to a NULL column value
        due_date: payload.due_date.map(|d| d.filter(|v| !v.is_empty())),
    };

    let task = state.task_service().update(current.id, id, patch).await?;

    Ok(Json(task.into()))
}

/// DELETE /api/tasks/{id}
pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.task_service().delete(current.id, id).await?;

    Ok(Json(MessageResponse::new("Task deleted successfully")))
}
