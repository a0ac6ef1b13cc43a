//! Domain service for registration, login, and bearer-token resolution.

use serde::Serialize;
use thiserror::Error;

use crate::db::User;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Username already taken")]
    UsernameTaken,

    #[error("Email already registered")]
    EmailTaken,

    #[error("User not found")]
    UserNotFound,

    #[error("Token is not valid")]
    InvalidToken,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A signed bearer token plus the public shape of its user.
#[derive(Debug, Clone, Serialize)]
pub struct AuthToken {
    pub token: String,
    pub user: PublicUser,
}

/// User fields safe to hand to clients.
#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub created_at: String,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

/// Domain service trait for authentication: the gate every protected
/// request passes through.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Creates a user and returns a freshly signed token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::UsernameTaken`] / [`AuthError::EmailTaken`] on
    /// uniqueness conflicts.
    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthToken, AuthError>;

    /// Verifies credentials and returns a signed token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for unknown email and
    /// wrong password alike.
    async fn login(&self, email: &str, password: &str) -> Result<AuthToken, AuthError>;

    /// Resolves a bearer token to the user it was issued for.
    async fn resolve_token(&self, token: &str) -> Result<User, AuthError>;

    /// Loads the user behind an already-resolved identity.
    async fn current_user(&self, user_id: i32) -> Result<User, AuthError>;
}
