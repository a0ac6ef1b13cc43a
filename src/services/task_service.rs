//! Domain service for tasks: CRUD scoped through the owning list.

use thiserror::Error;

use crate::db::{TaskPatch, TaskWithList};
use crate::entities::tasks;

/// Priority assigned when a request carries none.
pub const DEFAULT_PRIORITY: &str = "medium";

/// Errors specific to task operations. Both not-found variants cover the
/// not-owned case as well, so existence never leaks across users.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Task not found")]
    TaskNotFound,

    /// The target list is absent or belongs to another user. Raised on
    /// reads through a list and on create, which must never orphan a task.
    #[error("List not found")]
    ListNotFound,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for TaskError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for TaskError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Validated input for task creation.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub list_id: i32,
    pub priority: Option<String>,
    pub due_date: Option<String>,
}

#[async_trait::async_trait]
pub trait TaskService: Send + Sync {
    /// Tasks of one owned list, newest first.
    async fn list_for_list(
        &self,
        owner: i32,
        list_id: i32,
    ) -> Result<Vec<tasks::Model>, TaskError>;

    /// Every task of the caller with its list summary, newest first.
    async fn list_all(&self, owner: i32) -> Result<Vec<TaskWithList>, TaskError>;

    async fn get(&self, owner: i32, id: i32) -> Result<TaskWithList, TaskError>;

    async fn create(&self, owner: i32, input: NewTask) -> Result<TaskWithList, TaskError>;

    /// Partial update: only fields present in the patch are rewritten.
    async fn update(
        &self,
        owner: i32,
        id: i32,
        patch: TaskPatch,
    ) -> Result<TaskWithList, TaskError>;

    async fn delete(&self, owner: i32, id: i32) -> Result<(), TaskError>;
}
