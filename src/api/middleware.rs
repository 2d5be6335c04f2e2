//! API middleware and shared plumbing
//!
//! Contains:
//! - `AppState`, the dependency-injected application context
//! - `ApiError`, the single boundary translator from failures to status
//!   codes with a uniform `{ "error": "<message>" }` body
//! - `ApiJson`, a JSON extractor whose rejection goes through `ApiError`
//! - the bearer-token resolver middleware and the `AuthenticatedUser`
//!   extractor handlers use to require an identity

use axum::{
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;

use crate::models::User;
use crate::services::{AuthError, AuthService, BlogService, UserService};

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub blog_service: Arc<BlogService>,
    pub user_service: Arc<UserService>,
    pub auth_service: Arc<AuthService>,
}

/// Authenticated user resolved from the request's bearer token.
///
/// As an extractor this rejects with 401 when the request carried no valid
/// token; see [`token_resolver`] for how it gets attached.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("token missing"))
    }
}

/// API error taxonomy, rendered as a status code plus
/// `{ "error": "<message>" }`.
#[derive(Debug)]
pub enum ApiError {
    /// 400, field-specific message
    Validation(String),
    /// 401, missing or invalid token / credentials
    Unauthorized(String),
    /// 403, authenticated but not allowed
    Forbidden(String),
    /// 404, unknown id or route
    NotFound(String),
    /// 500, unexpected failure; details are logged, not leaked
    Internal(anyhow::Error),
}

impl ApiError {
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn internal_error(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(err) => {
                tracing::error!("Internal error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

/// JSON extractor that rejects malformed bodies with the uniform error body.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Pull the token out of an `Authorization: bearer <token>` header.
///
/// The scheme word is matched case-insensitively. A missing or differently
/// shaped header yields `None`.
fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Token resolver middleware.
///
/// A request without a bearer token passes through unauthenticated; whether
/// that matters is decided per operation by the [`AuthenticatedUser`]
/// extractor. A token that is present but does not verify, or that names a
/// user who no longer exists, is rejected here with 401.
pub async fn token_resolver(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(token) = extract_bearer_token(request.headers()) {
        let user = state
            .auth_service
            .resolve_token(token)
            .await
            .map_err(|e| match e {
                AuthError::InvalidToken => ApiError::unauthorized("token invalid"),
                other => ApiError::internal_error(other),
            })?;

        request.extensions_mut().insert(AuthenticatedUser(user));
    }

    Ok(next.run(request).await)
}
