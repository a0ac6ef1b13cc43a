//! `SeaORM` implementation of the `ListService` trait.

use async_trait::async_trait;

use crate::db::{ListRow, Store};
use crate::entities::lists;
use crate::services::list_service::{DEFAULT_COLOR, ListError, ListService, NewList};

pub struct SeaOrmListService {
    store: Store,
}

impl SeaOrmListService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

fn to_row(input: NewList) -> ListRow {
    ListRow {
        title: input.title,
        description: input.description,
        color: input.color.unwrap_or_else(|| DEFAULT_COLOR.to_string()),
    }
}

#[async_trait]
impl ListService for SeaOrmListService {
    async fn list_all(&self, owner: i32) -> Result<Vec<lists::Model>, ListError> {
        Ok(self.store.list_lists(owner).await?)
    }

    async fn get(&self, owner: i32, id: i32) -> Result<lists::Model, ListError> {
        self.store
            .get_list(owner, id)
            .await?
            .ok_or(ListError::NotFound)
    }

    async fn create(&self, owner: i32, input: NewList) -> Result<lists::Model, ListError> {
        Ok(self.store.create_list(owner, to_row(input)).await?)
    }

    async fn update(
        &self,
        owner: i32,
        id: i32,
        input: NewList,
    ) -> Result<lists::Model, ListError> {
        self.store
            .update_list(owner, id, to_row(input))
            .await?
            .ok_or(ListError::NotFound)
    }

    async fn delete(&self, owner: i32, id: i32) -> Result<(), ListError> {
        let deleted = self.store.delete_list_with_tasks(owner, id).await?;

        if deleted {
            Ok(())
        } else {
            Err(ListError::NotFound)
        }
    }
}
