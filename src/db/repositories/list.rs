use anyhow::{Context, Result};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::entities::{lists, prelude::*, tasks};

/// Column values for a list insert or full-replace update.
/// Defaults (missing description, missing color) are resolved by the
/// service layer before reaching the repository.
#[derive(Debug, Clone)]
pub struct ListRow {
    pub title: String,
    pub description: Option<String>,
    pub color: String,
}

pub struct ListRepository {
    conn: DatabaseConnection,
}

impl ListRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// All lists owned by the user, newest first.
    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<lists::Model>> {
        let rows = Lists::find()
            .filter(lists::Column::UserId.eq(user_id))
            .order_by_desc(lists::Column::CreatedAt)
            .order_by_desc(lists::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to query lists")?;

        Ok(rows)
    }

    /// A single list, scoped to its owner. `None` covers both "absent" and
    /// "owned by someone else".
    pub async fn get(&self, user_id: i32, id: i32) -> Result<Option<lists::Model>> {
        let row = Lists::find()
            .filter(lists::Column::Id.eq(id))
            .filter(lists::Column::UserId.eq(user_id))
            .one(&self.conn)
            .await
            .context("Failed to query list")?;

        Ok(row)
    }

    pub async fn create(&self, user_id: i32, row: ListRow) -> Result<lists::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let insert = Lists::insert(lists::ActiveModel {
            title: Set(row.title),
            description: Set(row.description),
            color: Set(row.color),
            user_id: Set(user_id),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        })
        .exec(&self.conn)
        .await
        .context("Failed to insert list")?;

        let created = Lists::find_by_id(insert.last_insert_id)
            .one(&self.conn)
            .await
            .context("Failed to re-fetch created list")?
            .ok_or_else(|| anyhow::anyhow!("Created list row disappeared"))?;

        Ok(created)
    }

    /// Full-replace update of title/description/color. Returns `None` when
    /// no row matches both id and owner.
    pub async fn update(&self, user_id: i32, id: i32, row: ListRow) -> Result<Option<lists::Model>> {
        let now = chrono::Utc::now().to_rfc3339();

        let result = Lists::update_many()
            .col_expr(lists::Column::Title, Expr::value(row.title))
            .col_expr(lists::Column::Description, Expr::value(row.description))
            .col_expr(lists::Column::Color, Expr::value(row.color))
            .col_expr(lists::Column::UpdatedAt, Expr::value(now))
            .filter(lists::Column::Id.eq(id))
            .filter(lists::Column::UserId.eq(user_id))
            .exec(&self.conn)
            .await
            .context("Failed to update list")?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.get(user_id, id).await
    }

    /// Delete a list and every task inside it as one transaction, so a
    /// half-applied cascade can never become visible. Returns `false` when
    /// the list does not belong to the caller.
    pub async fn delete_with_tasks(&self, user_id: i32, id: i32) -> Result<bool> {
        let txn = self.conn.begin().await.context("Failed to begin transaction")?;

        let owned = Lists::find()
            .filter(lists::Column::Id.eq(id))
            .filter(lists::Column::UserId.eq(user_id))
            .one(&txn)
            .await
            .context("Failed to query list for deletion")?;

        if owned.is_none() {
            return Ok(false);
        }

        Tasks::delete_many()
            .filter(tasks::Column::ListId.eq(id))
            .exec(&txn)
            .await
            .context("Failed to delete tasks of list")?;

        Lists::delete_many()
            .filter(lists::Column::Id.eq(id))
            .filter(lists::Column::UserId.eq(user_id))
            .exec(&txn)
            .await
            .context("Failed to delete list")?;

        txn.commit().await.context("Failed to commit list deletion")?;

        Ok(true)
    }
}
