pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, AuthToken, PublicUser};
pub use auth_service_impl::SeaOrmAuthService;

pub mod list_service;
pub mod list_service_impl;
pub use list_service::{ListError, ListService, NewList};
pub use list_service_impl::SeaOrmListService;

pub mod task_service;
pub mod task_service_impl;
pub use task_service::{NewTask, TaskError, TaskService};
pub use task_service_impl::SeaOrmTaskService;
