//! Domain service for task lists: CRUD scoped to the owning user.

use thiserror::Error;

use crate::entities::lists;

/// Default color assigned when a request carries none.
pub const DEFAULT_COLOR: &str = "#007bff";

/// Errors specific to list operations.
#[derive(Debug, Error)]
pub enum ListError {
    /// Covers both "no such list" and "owned by someone else" so that
    /// callers cannot probe for existence.
    #[error("List not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for ListError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for ListError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Validated input for create and full-replace update.
#[derive(Debug, Clone)]
pub struct NewList {
    pub title: String,
    pub description: Option<String>,
    pub color: Option<String>,
}

#[async_trait::async_trait]
pub trait ListService: Send + Sync {
    /// All lists owned by the caller, newest first.
    async fn list_all(&self, owner: i32) -> Result<Vec<lists::Model>, ListError>;

    async fn get(&self, owner: i32, id: i32) -> Result<lists::Model, ListError>;

    async fn create(&self, owner: i32, input: NewList) -> Result<lists::Model, ListError>;

    /// Full-replace semantics: title, description, and color are always
    /// rewritten from the input, falling back to defaults when absent.
    async fn update(
        &self,
        owner: i32,
        id: i32,
        input: NewList,
    ) -> Result<lists::Model, ListError>;

    /// Deletes the list and all tasks inside it atomically.
    async fn delete(&self, owner: i32, id: i32) -> Result<(), ListError>;
}
