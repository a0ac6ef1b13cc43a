use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AuthService, ListService, SeaOrmAuthService, SeaOrmListService, SeaOrmTaskService, TaskService,
};

/// Everything built once at startup and shared across requests: the
/// configuration, the store with its connection pool, and the domain
/// services. Constructed explicitly in `run()` so the store lifecycle has
/// a single owner; the pool is released when this is dropped.
#[derive(Clone)]
pub struct SharedState {
    pub config: Config,

    pub store: Store,

    pub auth_service: Arc<dyn AuthService>,

    pub list_service: Arc<dyn ListService>,

    pub task_service: Arc<dyn TaskService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let auth_service = Arc::new(SeaOrmAuthService::new(store.clone(), config.auth.clone()))
            as Arc<dyn AuthService>;

        let list_service = Arc::new(SeaOrmListService::new(store.clone())) as Arc<dyn ListService>;

        let task_service = Arc::new(SeaOrmTaskService::new(store.clone())) as Arc<dyn TaskService>;

        Ok(Self {
            config,
            store,
            auth_service,
            list_service,
            task_service,
        })
    }
}
