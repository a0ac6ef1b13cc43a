use axum::{
    Json,
    extract::{Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, AppState, validation};
use crate::services::auth_service::{AuthError, AuthToken, PublicUser};

// ============================================================================
// Request types
// ============================================================================

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => Self::unauthorized("Invalid credentials"),
            AuthError::UsernameTaken => Self::validation("username", "Username already taken"),
            AuthError::EmailTaken => Self::validation("email", "Email already registered"),
            AuthError::UserNotFound => Self::not_found("User not found"),
            AuthError::InvalidToken => Self::unauthorized("Token is not valid"),
            AuthError::Database(msg) => Self::DatabaseError(msg),
            AuthError::Internal(msg) => Self::InternalError(msg),
        }
    }
}

// ============================================================================
// Middleware
// ============================================================================

/// Identity resolved by the bearer middleware, available to protected
/// handlers through request extensions.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i32,
    pub username: String,
}

/// Authentication gate: every protected route passes through here. The
/// `Authorization: Bearer <token>` header is resolved to a user row;
/// anything else is a 401.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(token) = bearer_token(request.headers()) else {
        return Err(ApiError::unauthorized("No token, authorization denied"));
    };

    let user = state
        .auth_service()
        .resolve_token(&token)
        .await
        .map_err(|err| match err {
            AuthError::Database(msg) => ApiError::DatabaseError(msg),
            AuthError::Internal(msg) => ApiError::InternalError(msg),
            _ => ApiError::unauthorized("Token is not valid"),
        })?;

    request.extensions_mut().insert(CurrentUser {
        id: user.id,
        username: user.username,
    });

    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth_header = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = auth_header.strip_prefix("Bearer ")?.trim();

    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut errors = Vec::new();
    validation::check_username(&mut errors, payload.username.as_deref());
    validation::check_email(&mut errors, payload.email.as_deref());
    validation::check_password(&mut errors, payload.password.as_deref());

    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let username = payload.username.as_deref().unwrap_or_default().trim();
    let email = payload.email.as_deref().unwrap_or_default().trim();
    let password = payload.password.as_deref().unwrap_or_default();

    let auth: AuthToken = state
        .auth_service()
        .register(username, email, password)
        .await?;

    tracing::info!("User registered: {}", auth.user.username);

    Ok((StatusCode::CREATED, Json(auth)))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthToken>, ApiError> {
    let mut errors = Vec::new();
    validation::check_email(&mut errors, payload.email.as_deref());
    if payload.password.as_deref().unwrap_or_default().is_empty() {
        errors.push(super::error::FieldError::body(
            "password",
            "Password is required",
        ));
    }

    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let email = payload.email.as_deref().unwrap_or_default().trim();
    let password = payload.password.as_deref().unwrap_or_default();

    let auth = state.auth_service().login(email, password).await?;

    Ok(Json(auth))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<Arc<AppState>>,
    axum::Extension(current): axum::Extension<CurrentUser>,
) -> Result<Json<PublicUser>, ApiError> {
    let user = state.auth_service().current_user(current.id).await?;

    Ok(Json(user.into()))
}
