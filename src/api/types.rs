use serde::Serialize;

use crate::db::TaskWithList;
use crate::entities::{lists, tasks};

/// Wire shape of a list: the row fields as stored.
#[derive(Debug, Serialize)]
pub struct ListDto {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub color: String,
    pub user_id: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<lists::Model> for ListDto {
    fn from(model: lists::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            color: model.color,
            user_id: model.user_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Compact list summary embedded in task responses.
#[derive(Debug, Serialize)]
pub struct ListSummaryDto {
    pub id: i32,
    pub title: String,
    pub color: String,
}

/// Wire shape of a task. The stored `due_date` column is exposed only as
/// `dueDate`; this is the single place where that renaming happens.
#[derive(Debug, Serialize)]
pub struct TaskDto {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub priority: String,
    #[serde(rename = "dueDate")]
    pub due_date: Option<String>,
    pub list_id: i32,
    pub user_id: i32,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list: Option<ListSummaryDto>,
}

impl From<tasks::Model> for TaskDto {
    fn from(model: tasks::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            completed: model.completed,
            priority: model.priority,
            due_date: model.due_date,
            list_id: model.list_id,
            user_id: model.user_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
            list: None,
        }
    }
}

impl From<TaskWithList> for TaskDto {
    fn from(row: TaskWithList) -> Self {
        let list = ListSummaryDto {
            id: row.task.list_id,
            title: row.list_title,
            color: row.list_color,
        };

        let mut dto = Self::from(row.task);
        dto.list = Some(list);
        dto
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
