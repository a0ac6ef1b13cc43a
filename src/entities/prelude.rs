pub use super::lists::Entity as Lists;
pub use super::tasks::Entity as Tasks;
pub use super::users::Entity as Users;
