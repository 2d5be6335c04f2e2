//! User service
//!
//! Business logic for user accounts: creation with explicit validation, and
//! listing with each user's blogs attached.
//!
//! Validation is a plain function over the input, decoupled from storage; it
//! reports every violated rule rather than stopping at the first. Username
//! uniqueness is checked up front for a friendly message, but the UNIQUE
//! constraint in the store is authoritative: if two registrations race, the
//! loser's constraint violation is translated into the same validation error.

use std::sync::Arc;

use anyhow::Context;

use crate::db::repositories::{BlogRepository, UserRepository};
use crate::models::{Blog, CreateUserInput, User};
use crate::services::password::hash_password;

/// Minimum length for both usernames and passwords
const MIN_CREDENTIAL_LENGTH: usize = 3;

const USERNAME_REQUIRED: &str = "username is required";
const USERNAME_TOO_SHORT: &str = "username must be at least 3 characters long";
const USERNAME_NOT_UNIQUE: &str = "username must be unique";
const PASSWORD_REQUIRED: &str = "password is required";
const PASSWORD_TOO_SHORT: &str = "password must be at least 3 characters long";

/// Error types for user service operations
#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    /// One or more validation rules were violated
    #[error("{0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Validate a new-user input against the credential rules.
///
/// Returns every violated rule, in a fixed order. Uniqueness is not checked
/// here; it needs the store.
pub fn validate_new_user(input: &CreateUserInput) -> Vec<&'static str> {
    let mut violations = Vec::new();

    if input.username.is_empty() {
        violations.push(USERNAME_REQUIRED);
    } else if input.username.chars().count() < MIN_CREDENTIAL_LENGTH {
        violations.push(USERNAME_TOO_SHORT);
    }

    if input.password.is_empty() {
        violations.push(PASSWORD_REQUIRED);
    } else if input.password.chars().count() < MIN_CREDENTIAL_LENGTH {
        violations.push(PASSWORD_TOO_SHORT);
    }

    violations
}

/// User service for account management
pub struct UserService {
    user_repo: Arc<dyn UserRepository>,
    blog_repo: Arc<dyn BlogRepository>,
}

impl UserService {
    pub fn new(user_repo: Arc<dyn UserRepository>, blog_repo: Arc<dyn BlogRepository>) -> Self {
        Self {
            user_repo,
            blog_repo,
        }
    }

    /// Create a new user account.
    ///
    /// The password is hashed before it goes anywhere near the store; the
    /// plaintext is never persisted.
    pub async fn create(&self, input: CreateUserInput) -> Result<User, UserServiceError> {
        let mut violations = validate_new_user(&input);

        if violations.is_empty()
            && self
                .user_repo
                .get_by_username(&input.username)
                .await
                .context("Failed to check username uniqueness")?
                .is_some()
        {
            violations.push(USERNAME_NOT_UNIQUE);
        }

        if !violations.is_empty() {
            return Err(UserServiceError::ValidationError(violations.join(", ")));
        }

        let password_hash = hash_password(&input.password).context("Failed to hash password")?;

        let user = User::new(input.username, input.name, password_hash);

        match self.user_repo.create(&user).await {
            Ok(created) => Ok(created),
            // A concurrent registration can slip past the pre-check; the
            // store's UNIQUE constraint settles it
            Err(e) if is_unique_violation(&e) => Err(UserServiceError::ValidationError(
                USERNAME_NOT_UNIQUE.to_string(),
            )),
            Err(e) => Err(e.context("Failed to create user").into()),
        }
    }

    /// List all users, each with the blogs they own.
    pub async fn list_with_blogs(&self) -> Result<Vec<(User, Vec<Blog>)>, UserServiceError> {
        let users = self
            .user_repo
            .list()
            .await
            .context("Failed to list users")?;
        let blogs = self
            .blog_repo
            .list()
            .await
            .context("Failed to list blogs")?;

        Ok(users
            .into_iter()
            .map(|user| {
                let owned: Vec<Blog> = blogs
                    .iter()
                    .filter(|b| b.owner_id == Some(user.id))
                    .cloned()
                    .collect();
                (user, owned)
            })
            .collect())
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i64) -> Result<Option<User>, UserServiceError> {
        let user = self
            .user_repo
            .get_by_id(id)
            .await
            .context("Failed to get user by ID")?;

        Ok(user)
    }

    /// Get user by username
    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>, UserServiceError> {
        let user = self
            .user_repo
            .get_by_username(username)
            .await
            .context("Failed to get user by username")?;

        Ok(user)
    }
}

/// Whether the error chain bottoms out in a UNIQUE constraint violation.
fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{SqlxBlogRepository, SqlxUserRepository};
    use crate::db::{create_test_pool, migrations};
    use crate::models::CreateBlogInput;

    async fn setup_test_service() -> (UserService, Arc<dyn BlogRepository>) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let user_repo = SqlxUserRepository::boxed(pool.clone());
        let blog_repo = SqlxBlogRepository::boxed(pool);
        (UserService::new(user_repo, blog_repo.clone()), blog_repo)
    }

    fn input(username: &str, password: &str) -> CreateUserInput {
        CreateUserInput {
            username: username.to_string(),
            name: None,
            password: password.to_string(),
        }
    }

    #[test]
    fn test_validate_new_user_accepts_valid_input() {
        assert!(validate_new_user(&input("mluukkai", "salainen")).is_empty());
    }

    #[test]
    fn test_validate_new_user_requires_username() {
        let violations = validate_new_user(&input("", "salainen"));
        assert_eq!(violations, vec![USERNAME_REQUIRED]);
    }

    #[test]
    fn test_validate_new_user_rejects_short_username() {
        let violations = validate_new_user(&input("ml", "salainen"));
        assert_eq!(violations, vec![USERNAME_TOO_SHORT]);
    }

    #[test]
    fn test_validate_new_user_requires_password() {
        let violations = validate_new_user(&input("mluukkai", ""));
        assert_eq!(violations, vec![PASSWORD_REQUIRED]);
    }

    #[test]
    fn test_validate_new_user_rejects_short_password() {
        let violations = validate_new_user(&input("mluukkai", "pw"));
        assert_eq!(violations, vec![PASSWORD_TOO_SHORT]);
    }

    #[test]
    fn test_validate_new_user_collects_all_violations() {
        let violations = validate_new_user(&input("", ""));
        assert_eq!(violations, vec![USERNAME_REQUIRED, PASSWORD_REQUIRED]);

        let violations = validate_new_user(&input("ml", "pw"));
        assert_eq!(violations, vec![USERNAME_TOO_SHORT, PASSWORD_TOO_SHORT]);
    }

    #[tokio::test]
    async fn test_create_user_success() {
        let (service, _) = setup_test_service().await;

        let user = service
            .create(CreateUserInput {
                username: "mluukkai".to_string(),
                name: Some("Matti Luukkainen".to_string()),
                password: "salainen".to_string(),
            })
            .await
            .expect("Creation should succeed");

        assert!(user.id > 0);
        assert_eq!(user.username, "mluukkai");
        assert_eq!(user.name.as_deref(), Some("Matti Luukkainen"));
    }

    #[tokio::test]
    async fn test_create_user_hashes_password() {
        let (service, _) = setup_test_service().await;

        let user = service
            .create(input("mluukkai", "salainen"))
            .await
            .expect("Creation should succeed");

        assert_ne!(user.password_hash, "salainen");
        assert!(user.password_hash.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn test_create_user_short_username_fails() {
        let (service, _) = setup_test_service().await;

        let result = service.create(input("ml", "salainen")).await;

        match result {
            Err(UserServiceError::ValidationError(msg)) => {
                assert_eq!(msg, USERNAME_TOO_SHORT);
            }
            other => panic!("Expected validation error, got {:?}", other.map(|u| u.username)),
        }
    }

    #[tokio::test]
    async fn test_create_user_duplicate_username_fails() {
        let (service, _) = setup_test_service().await;

        service
            .create(input("mluukkai", "salainen"))
            .await
            .expect("First creation should succeed");

        let result = service.create(input("mluukkai", "different")).await;

        match result {
            Err(UserServiceError::ValidationError(msg)) => {
                assert_eq!(msg, USERNAME_NOT_UNIQUE);
            }
            other => panic!("Expected validation error, got {:?}", other.map(|u| u.username)),
        }
    }

    #[tokio::test]
    async fn test_list_with_blogs_expands_ownership() {
        let (service, blog_repo) = setup_test_service().await;

        let writer = service
            .create(input("writer", "salainen"))
            .await
            .expect("Creation should succeed");
        service
            .create(input("reader", "salainen"))
            .await
            .expect("Creation should succeed");

        let blog_input = CreateBlogInput {
            title: "First class tests".to_string(),
            author: Some("Robert C. Martin".to_string()),
            url: "http://blogs.test/first-class-tests".to_string(),
            likes: Some(10),
        };
        blog_repo
            .create(&Blog::new(
                blog_input.title,
                blog_input.author,
                blog_input.url,
                blog_input.likes.unwrap_or(0),
                writer.id,
            ))
            .await
            .expect("Failed to create blog");

        let listed = service
            .list_with_blogs()
            .await
            .expect("Listing should succeed");

        assert_eq!(listed.len(), 2);
        let (listed_writer, writer_blogs) = &listed[0];
        assert_eq!(listed_writer.username, "writer");
        assert_eq!(writer_blogs.len(), 1);
        assert_eq!(writer_blogs[0].title, "First class tests");

        let (listed_reader, reader_blogs) = &listed[1];
        assert_eq!(listed_reader.username, "reader");
        assert!(reader_blogs.is_empty());
    }
}
