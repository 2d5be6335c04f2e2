//! Login endpoint
//!
//! - POST /api/login - exchange credentials for a session token

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{ApiError, ApiJson, AppState};
use crate::services::AuthError;

/// Request body for login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response for a successful login
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub name: Option<String>,
}

/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let session = state
        .auth_service
        .authenticate(&body.username, &body.password)
        .await
        .map_err(|e| match e {
            AuthError::InvalidCredentials => {
                ApiError::unauthorized("invalid username or password")
            }
            other => ApiError::internal_error(other),
        })?;

    Ok(Json(LoginResponse {
        token: session.token,
        username: session.user.username,
        name: session.user.name,
    }))
}
