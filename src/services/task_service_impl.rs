//! `SeaORM` implementation of the `TaskService` trait.

use async_trait::async_trait;

use crate::db::{Store, TaskPatch, TaskRow, TaskWithList};
use crate::entities::tasks;
use crate::services::task_service::{DEFAULT_PRIORITY, NewTask, TaskError, TaskService};

pub struct SeaOrmTaskService {
    store: Store,
}

impl SeaOrmTaskService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    async fn require_owned_list(&self, owner: i32, list_id: i32) -> Result<(), TaskError> {
        self.store
            .get_list(owner, list_id)
            .await?
            .map(|_| ())
            .ok_or(TaskError::ListNotFound)
    }
}

#[async_trait]
impl TaskService for SeaOrmTaskService {
    async fn list_for_list(
        &self,
        owner: i32,
        list_id: i32,
    ) -> Result<Vec<tasks::Model>, TaskError> {
        self.require_owned_list(owner, list_id).await?;

        Ok(self.store.list_tasks_for_list(owner, list_id).await?)
    }

    async fn list_all(&self, owner: i32) -> Result<Vec<TaskWithList>, TaskError> {
        Ok(self.store.list_tasks(owner).await?)
    }

    async fn get(&self, owner: i32, id: i32) -> Result<TaskWithList, TaskError> {
        self.store
            .get_task(owner, id)
            .await?
            .ok_or(TaskError::TaskNotFound)
    }

    async fn create(&self, owner: i32, input: NewTask) -> Result<TaskWithList, TaskError> {
        // Never create an orphan: the target list must belong to the caller.
        self.require_owned_list(owner, input.list_id).await?;

        let row = TaskRow {
            title: input.title,
            description: input.description,
            list_id: input.list_id,
            priority: input
                .priority
                .unwrap_or_else(|| DEFAULT_PRIORITY.to_string()),
            due_date: input.due_date,
        };

        Ok(self.store.create_task(owner, row).await?)
    }

    async fn update(
        &self,
        owner: i32,
        id: i32,
        patch: TaskPatch,
    ) -> Result<TaskWithList, TaskError> {
        self.store
            .update_task(owner, id, patch)
            .await?
            .ok_or(TaskError::TaskNotFound)
    }

    async fn delete(&self, owner: i32, id: i32) -> Result<(), TaskError> {
        let deleted = self.store.delete_task(owner, id).await?;

        if deleted {
            Ok(())
        } else {
            Err(TaskError::TaskNotFound)
        }
    }
}
