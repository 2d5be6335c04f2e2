//! Blog service
//!
//! Business logic for blog records: listing with owners attached, and
//! create/update/delete with ownership enforcement.
//!
//! Mutation authority comes from ownership alone. Legacy rows that carry no
//! owner match no identity, so nobody can update or delete them.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context;

use crate::db::repositories::{BlogRepository, UserRepository};
use crate::models::{Blog, CreateBlogInput, UpdateBlogInput, User};

const TITLE_REQUIRED: &str = "title is required";
const URL_REQUIRED: &str = "url is required";
const LIKES_NEGATIVE: &str = "likes must not be negative";

/// Error types for blog service operations
#[derive(Debug, thiserror::Error)]
pub enum BlogServiceError {
    /// Blog not found
    #[error("blog not found")]
    NotFound,

    /// The authenticated user does not own the blog
    #[error("only the owner may modify a blog")]
    Forbidden,

    /// One or more validation rules were violated
    #[error("{0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Blog service for managing blog records
pub struct BlogService {
    blog_repo: Arc<dyn BlogRepository>,
    user_repo: Arc<dyn UserRepository>,
}

impl BlogService {
    pub fn new(blog_repo: Arc<dyn BlogRepository>, user_repo: Arc<dyn UserRepository>) -> Self {
        Self {
            blog_repo,
            user_repo,
        }
    }

    /// List all blogs, each with its owner attached when one exists.
    ///
    /// Owners are joined in memory from a single user listing rather than
    /// one lookup per blog.
    pub async fn list_with_owners(&self) -> Result<Vec<(Blog, Option<User>)>, BlogServiceError> {
        let blogs = self
            .blog_repo
            .list()
            .await
            .context("Failed to list blogs")?;
        let users = self
            .user_repo
            .list()
            .await
            .context("Failed to list users")?;

        let by_id: HashMap<i64, User> = users.into_iter().map(|u| (u.id, u)).collect();

        Ok(blogs
            .into_iter()
            .map(|blog| {
                let owner = blog.owner_id.and_then(|id| by_id.get(&id).cloned());
                (blog, owner)
            })
            .collect())
    }

    /// Create a new blog owned by the given user.
    ///
    /// A missing like count defaults to zero.
    pub async fn create(
        &self,
        input: CreateBlogInput,
        owner: &User,
    ) -> Result<Blog, BlogServiceError> {
        validate_fields(&input.title, &input.url, input.likes.unwrap_or(0))?;

        let blog = Blog::new(
            input.title,
            input.author,
            input.url,
            input.likes.unwrap_or(0),
            owner.id,
        );

        let created = self
            .blog_repo
            .create(&blog)
            .await
            .context("Failed to create blog")?;

        Ok(created)
    }

    /// Apply a partial update to a blog owned by the given user.
    ///
    /// The merged record is re-validated before it is stored.
    pub async fn update(
        &self,
        id: i64,
        input: UpdateBlogInput,
        user: &User,
    ) -> Result<Blog, BlogServiceError> {
        let mut blog = self
            .blog_repo
            .get_by_id(id)
            .await
            .context("Failed to get blog")?
            .ok_or(BlogServiceError::NotFound)?;

        if !blog.is_owned_by(user.id) {
            return Err(BlogServiceError::Forbidden);
        }

        if !input.has_changes() {
            return Ok(blog);
        }

        if let Some(title) = input.title {
            blog.title = title;
        }
        if let Some(author) = input.author {
            blog.author = Some(author);
        }
        if let Some(url) = input.url {
            blog.url = url;
        }
        if let Some(likes) = input.likes {
            blog.likes = likes;
        }

        validate_fields(&blog.title, &blog.url, blog.likes)?;

        let updated = self
            .blog_repo
            .update(&blog)
            .await
            .context("Failed to update blog")?;

        Ok(updated)
    }

    /// Delete a blog owned by the given user.
    pub async fn delete(&self, id: i64, user: &User) -> Result<(), BlogServiceError> {
        let blog = self
            .blog_repo
            .get_by_id(id)
            .await
            .context("Failed to get blog")?
            .ok_or(BlogServiceError::NotFound)?;

        if !blog.is_owned_by(user.id) {
            return Err(BlogServiceError::Forbidden);
        }

        self.blog_repo
            .delete(blog.id)
            .await
            .context("Failed to delete blog")?;

        Ok(())
    }
}

/// Check the field rules shared by create and update.
fn validate_fields(title: &str, url: &str, likes: i64) -> Result<(), BlogServiceError> {
    let mut violations = Vec::new();

    if title.trim().is_empty() {
        violations.push(TITLE_REQUIRED);
    }
    if url.trim().is_empty() {
        violations.push(URL_REQUIRED);
    }
    if likes < 0 {
        violations.push(LIKES_NEGATIVE);
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(BlogServiceError::ValidationError(violations.join(", ")))
    }
}
