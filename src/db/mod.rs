use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::entities::{lists, tasks};

pub mod migrator;
pub mod repositories;

pub use repositories::list::ListRow;
pub use repositories::task::{TaskPatch, TaskRow, TaskWithList};
pub use repositories::user::User;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn list_repo(&self) -> repositories::list::ListRepository {
        repositories::list::ListRepository::new(self.conn.clone())
    }

    fn task_repo(&self) -> repositories::task::TaskRepository {
        repositories::task::TaskRepository::new(self.conn.clone())
    }

    // Users

    pub async fn create_user(&self, username: &str, email: &str, password: &str) -> Result<User> {
        self.user_repo().create(username, email, password).await
    }

    pub async fn get_user_by_id(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn verify_user_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>> {
        self.user_repo().verify_credentials(email, password).await
    }

    // Lists

    pub async fn list_lists(&self, user_id: i32) -> Result<Vec<lists::Model>> {
        self.list_repo().list_for_user(user_id).await
    }

    pub async fn get_list(&self, user_id: i32, id: i32) -> Result<Option<lists::Model>> {
        self.list_repo().get(user_id, id).await
    }

    pub async fn create_list(&self, user_id: i32, row: ListRow) -> Result<lists::Model> {
        self.list_repo().create(user_id, row).await
    }

    pub async fn update_list(
        &self,
        user_id: i32,
        id: i32,
        row: ListRow,
    ) -> Result<Option<lists::Model>> {
        self.list_repo().update(user_id, id, row).await
    }

    pub async fn delete_list_with_tasks(&self, user_id: i32, id: i32) -> Result<bool> {
        self.list_repo().delete_with_tasks(user_id, id).await
    }

    // Tasks

    pub async fn list_tasks_for_list(
        &self,
        user_id: i32,
        list_id: i32,
    ) -> Result<Vec<tasks::Model>> {
        self.task_repo().list_for_list(user_id, list_id).await
    }

    pub async fn list_tasks(&self, user_id: i32) -> Result<Vec<TaskWithList>> {
        self.task_repo().list_for_user(user_id).await
    }

    pub async fn get_task(&self, user_id: i32, id: i32) -> Result<Option<TaskWithList>> {
        self.task_repo().get(user_id, id).await
    }

    pub async fn create_task(&self, user_id: i32, row: TaskRow) -> Result<TaskWithList> {
        self.task_repo().create(user_id, row).await
    }

    pub async fn update_task(
        &self,
        user_id: i32,
        id: i32,
        patch: TaskPatch,
    ) -> Result<Option<TaskWithList>> {
        self.task_repo().update(user_id, id, patch).await
    }

    pub async fn delete_task(&self, user_id: i32, id: i32) -> Result<bool> {
        self.task_repo().delete(user_id, id).await
    }
}
