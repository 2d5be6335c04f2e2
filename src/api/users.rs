//! User API endpoints
//!
//! - POST /api/users - create an account
//! - GET /api/users - list accounts with their blogs
//!
//! Account creation deliberately answers 200 rather than 201; existing
//! clients depend on it.

use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{ApiError, ApiJson, AppState};
use crate::models::{Blog, CreateUserInput, User};
use crate::services::UserServiceError;

/// Blog summary embedded in a user response
#[derive(Debug, Serialize, Deserialize)]
pub struct UserBlogInfo {
    pub id: String,
    pub title: String,
    pub author: Option<String>,
    pub url: String,
    pub likes: i64,
}

/// Response for a single user
///
/// The credential hash never appears here.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub name: Option<String>,
    pub blogs: Vec<UserBlogInfo>,
}

impl UserResponse {
    fn new(user: User, blogs: Vec<Blog>) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username,
            name: user.name,
            blogs: blogs
                .into_iter()
                .map(|blog| UserBlogInfo {
                    id: blog.id.to_string(),
                    title: blog.title,
                    author: blog.author,
                    url: blog.url,
                    likes: blog.likes,
                })
                .collect(),
        }
    }
}

/// Request body for account creation
///
/// Fields are optional so that their absence surfaces as the matching
/// validation message rather than a deserialization failure.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}

/// Build the users router
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_users).post(create_user))
}

/// GET /api/users - list all users with expanded blogs
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = state
        .user_service
        .list_with_blogs()
        .await
        .map_err(map_user_error)?;

    let responses = users
        .into_iter()
        .map(|(user, blogs)| UserResponse::new(user, blogs))
        .collect();

    Ok(Json(responses))
}

/// POST /api/users - create an account (answers 200, see module docs)
pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let input = CreateUserInput {
        username: body.username.unwrap_or_default(),
        name: body.name,
        password: body.password.unwrap_or_default(),
    };

    let user = state
        .user_service
        .create(input)
        .await
        .map_err(map_user_error)?;

    Ok(Json(UserResponse::new(user, Vec::new())))
}

fn map_user_error(e: UserServiceError) -> ApiError {
    match e {
        UserServiceError::ValidationError(msg) => ApiError::validation_error(msg),
        UserServiceError::InternalError(err) => ApiError::internal_error(err),
    }
}
