//! `SeaORM` implementation of the `AuthService` trait, issuing HS256 JWTs.

use async_trait::async_trait;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::db::{Store, User};
use crate::services::auth_service::{AuthError, AuthService, AuthToken};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// User id, stringified
    sub: String,
    iat: usize,
    exp: usize,
}

pub struct SeaOrmAuthService {
    store: Store,
    config: AuthConfig,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, config: AuthConfig) -> Self {
        Self { store, config }
    }

    fn sign_token(&self, user_id: i32) -> Result<String, AuthError> {
        let now = chrono::Utc::now();
        let expires = now + chrono::Duration::hours(i64::from(self.config.token_expiry_hours));

        let claims = Claims {
            sub: user_id.to_string(),
            iat: usize::try_from(now.timestamp())
                .map_err(|_| AuthError::Internal("Clock before epoch".to_string()))?,
            exp: usize::try_from(expires.timestamp())
                .map_err(|_| AuthError::Internal("Token expiry overflow".to_string()))?,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::Internal(format!("Token creation failed: {e}")))
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthToken, AuthError> {
        if self.store.get_user_by_username(username).await?.is_some() {
            return Err(AuthError::UsernameTaken);
        }
        if self.store.get_user_by_email(email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let user = self.store.create_user(username, email, password).await?;
        let token = self.sign_token(user.id)?;

        Ok(AuthToken {
            token,
            user: user.into(),
        })
    }

    async fn login(&self, email: &str, password: &str) -> Result<AuthToken, AuthError> {
        let user = self
            .store
            .verify_user_credentials(email, password)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let token = self.sign_token(user.id)?;

        Ok(AuthToken {
            token,
            user: user.into(),
        })
    }

    async fn resolve_token(&self, token: &str) -> Result<User, AuthError> {
        // Validation::default() checks the exp claim
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AuthError::InvalidToken)?;

        let user_id: i32 = data
            .claims
            .sub
            .parse()
            .map_err(|_| AuthError::InvalidToken)?;

        self.store
            .get_user_by_id(user_id)
            .await?
            .ok_or(AuthError::InvalidToken)
    }

    async fn current_user(&self, user_id: i32) -> Result<User, AuthError> {
        self.store
            .get_user_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}
