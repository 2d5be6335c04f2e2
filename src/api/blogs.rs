//! Blog API endpoints
//!
//! - GET /api/blogs - list all blogs with their owners
//! - POST /api/blogs - create a blog (authenticated)
//! - PUT /api/blogs/{id} - update a blog (owner only)
//! - DELETE /api/blogs/{id} - delete a blog (owner only)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{ApiError, ApiJson, AppState, AuthenticatedUser};
use crate::models::{Blog, CreateBlogInput, UpdateBlogInput, User};
use crate::services::BlogServiceError;

/// Owner summary embedded in a blog response
#[derive(Debug, Serialize, Deserialize)]
pub struct OwnerInfo {
    pub id: String,
    pub username: String,
    pub name: Option<String>,
}

/// Response for a single blog
///
/// The storage key is exposed only as the string `id`.
#[derive(Debug, Serialize, Deserialize)]
pub struct BlogResponse {
    pub id: String,
    pub title: String,
    pub author: Option<String>,
    pub url: String,
    pub likes: i64,
    pub owner: Option<OwnerInfo>,
}

impl BlogResponse {
    fn new(blog: Blog, owner: Option<&User>) -> Self {
        Self {
            id: blog.id.to_string(),
            title: blog.title,
            author: blog.author,
            url: blog.url,
            likes: blog.likes,
            owner: owner.map(|user| OwnerInfo {
                id: user.id.to_string(),
                username: user.username.clone(),
                name: user.name.clone(),
            }),
        }
    }
}

/// Request body for creating a blog
///
/// `title` and `url` are optional here so that their absence surfaces as a
/// validation message rather than a deserialization failure.
#[derive(Debug, Deserialize)]
pub struct CreateBlogRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: Option<i64>,
}

/// Request body for a partial blog update
#[derive(Debug, Deserialize)]
pub struct UpdateBlogRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: Option<i64>,
}

/// Build the blogs router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_blogs).post(create_blog))
        .route("/{id}", put(update_blog).delete(delete_blog))
}

/// GET /api/blogs - list all blogs with expanded owners
pub async fn list_blogs(
    State(state): State<AppState>,
) -> Result<Json<Vec<BlogResponse>>, ApiError> {
    let blogs = state
        .blog_service
        .list_with_owners()
        .await
        .map_err(map_blog_error)?;

    let responses = blogs
        .into_iter()
        .map(|(blog, owner)| BlogResponse::new(blog, owner.as_ref()))
        .collect();

    Ok(Json(responses))
}

/// POST /api/blogs - create a blog owned by the authenticated user
pub async fn create_blog(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    ApiJson(body): ApiJson<CreateBlogRequest>,
) -> Result<(StatusCode, Json<BlogResponse>), ApiError> {
    let input = CreateBlogInput {
        title: body.title.unwrap_or_default(),
        author: body.author,
        url: body.url.unwrap_or_default(),
        likes: body.likes,
    };

    let blog = state
        .blog_service
        .create(input, &user)
        .await
        .map_err(map_blog_error)?;

    Ok((StatusCode::CREATED, Json(BlogResponse::new(blog, Some(&user)))))
}

/// PUT /api/blogs/{id} - partially update a blog (owner only)
pub async fn update_blog(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<UpdateBlogRequest>,
) -> Result<Json<BlogResponse>, ApiError> {
    let id = parse_id(&id)?;

    let input = UpdateBlogInput {
        title: body.title,
        author: body.author,
        url: body.url,
        likes: body.likes,
    };

    let blog = state
        .blog_service
        .update(id, input, &user)
        .await
        .map_err(map_blog_error)?;

    // Only the owner gets this far, so the owner is the caller
    Ok(Json(BlogResponse::new(blog, Some(&user))))
}

/// DELETE /api/blogs/{id} - delete a blog (owner only)
pub async fn delete_blog(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;

    state
        .blog_service
        .delete(id, &user)
        .await
        .map_err(map_blog_error)?;

    Ok(StatusCode::NO_CONTENT)
}

fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::validation_error("malformatted id"))
}

fn map_blog_error(e: BlogServiceError) -> ApiError {
    match e {
        BlogServiceError::NotFound => ApiError::not_found("blog not found"),
        BlogServiceError::Forbidden => ApiError::forbidden("only the owner may modify a blog"),
        BlogServiceError::ValidationError(msg) => ApiError::validation_error(msg),
        BlogServiceError::InternalError(err) => ApiError::internal_error(err),
    }
}
