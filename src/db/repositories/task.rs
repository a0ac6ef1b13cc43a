use anyhow::{Context, Result};
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::entities::{lists, prelude::*, tasks};

/// A task together with the title and color of its owning list, mirroring
/// the `JOIN lists` read queries.
#[derive(Debug, Clone)]
pub struct TaskWithList {
    pub task: tasks::Model,
    pub list_title: String,
    pub list_color: String,
}

/// Column values for a task insert. Defaults (priority, empty due date)
/// are resolved by the service layer.
#[derive(Debug, Clone)]
pub struct TaskRow {
    pub title: String,
    pub description: Option<String>,
    pub list_id: i32,
    pub priority: String,
    pub due_date: Option<String>,
}

/// Partial update: `None` keeps the stored value; for `due_date` the outer
/// level marks presence and the inner level carries set-vs-clear.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub completed: Option<bool>,
    pub due_date: Option<Option<String>>,
}

pub struct TaskRepository {
    conn: DatabaseConnection,
}

impl TaskRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Tasks of one list, newest first. The caller is responsible for
    /// verifying list ownership; the user filter here is defense in depth.
    pub async fn list_for_list(&self, user_id: i32, list_id: i32) -> Result<Vec<tasks::Model>> {
        let rows = Tasks::find()
            .filter(tasks::Column::ListId.eq(list_id))
            .filter(tasks::Column::UserId.eq(user_id))
            .order_by_desc(tasks::Column::CreatedAt)
            .order_by_desc(tasks::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to query tasks for list")?;

        Ok(rows)
    }

    /// Every task owned by the user joined with its list, newest first.
    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<TaskWithList>> {
        let rows = Tasks::find()
            .find_also_related(Lists)
            .filter(tasks::Column::UserId.eq(user_id))
            .order_by_desc(tasks::Column::CreatedAt)
            .order_by_desc(tasks::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to query tasks")?;

        rows.into_iter().map(with_list).collect()
    }

    pub async fn get(&self, user_id: i32, id: i32) -> Result<Option<TaskWithList>> {
        let row = Tasks::find()
            .find_also_related(Lists)
            .filter(tasks::Column::Id.eq(id))
            .filter(tasks::Column::UserId.eq(user_id))
            .one(&self.conn)
            .await
            .context("Failed to query task")?;

        row.map(with_list).transpose()
    }

    pub async fn create(&self, user_id: i32, row: TaskRow) -> Result<TaskWithList> {
        let now = chrono::Utc::now().to_rfc3339();

        let insert = Tasks::insert(tasks::ActiveModel {
            title: Set(row.title),
            description: Set(row.description),
            completed: Set(false),
            priority: Set(row.priority),
            due_date: Set(row.due_date),
            list_id: Set(row.list_id),
            user_id: Set(user_id),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        })
        .exec(&self.conn)
        .await
        .context("Failed to insert task")?;

        self.get(user_id, insert.last_insert_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Created task row disappeared"))
    }

    /// Rewrite only the supplied columns. Returns `None` when no row
    /// matches both id and owner.
    pub async fn update(
        &self,
        user_id: i32,
        id: i32,
        patch: TaskPatch,
    ) -> Result<Option<TaskWithList>> {
        let now = chrono::Utc::now().to_rfc3339();

        let mut update = Tasks::update_many()
            .filter(tasks::Column::Id.eq(id))
            .filter(tasks::Column::UserId.eq(user_id));

        if let Some(title) = patch.title {
            update = update.col_expr(tasks::Column::Title, Expr::value(title));
        }
        if let Some(description) = patch.description {
            update = update.col_expr(tasks::Column::Description, Expr::value(description));
        }
        if let Some(priority) = patch.priority {
            update = update.col_expr(tasks::Column::Priority, Expr::value(priority));
        }
        if let Some(completed) = patch.completed {
            update = update.col_expr(tasks::Column::Completed, Expr::value(completed));
        }
        if let Some(due_date) = patch.due_date {
            update = update.col_expr(tasks::Column::DueDate, Expr::value(due_date));
        }

        let result = update
            .col_expr(tasks::Column::UpdatedAt, Expr::value(now))
            .exec(&self.conn)
            .await
            .context("Failed to update task")?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.get(user_id, id).await
    }

    /// Returns `false` when the task does not belong to the caller.
    pub async fn delete(&self, user_id: i32, id: i32) -> Result<bool> {
        let result = Tasks::delete_many()
            .filter(tasks::Column::Id.eq(id))
            .filter(tasks::Column::UserId.eq(user_id))
            .exec(&self.conn)
            .await
            .context("Failed to delete task")?;

        Ok(result.rows_affected > 0)
    }
}

fn with_list((task, list): (tasks::Model, Option<lists::Model>)) -> Result<TaskWithList> {
    let list = list.ok_or_else(|| anyhow::anyhow!("Task {} has no parent list row", task.id))?;

    Ok(TaskWithList {
        task,
        list_title: list.title,
        list_color: list.color,
    })
}
