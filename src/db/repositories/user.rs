//! User repository
//!
//! Database operations for users. Uniqueness of usernames is enforced by the
//! UNIQUE constraint on the table; callers translate constraint violations
//! into their own error types.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

use crate::models::User;

/// User repository trait
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user
    async fn create(&self, user: &User) -> Result<User>;

    /// Get user by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<User>>;

    /// Get user by username
    async fn get_by_username(&self, username: &str) -> Result<Option<User>>;

    /// List all users in creation order
    async fn list(&self) -> Result<Vec<User>>;

    /// Count total users
    async fn count(&self) -> Result<i64>;
}

/// SQLx-based user repository implementation
pub struct SqlxUserRepository {
    pool: SqlitePool,
}

impl SqlxUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn UserRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    async fn create(&self, user: &User) -> Result<User> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO users (username, name, password_hash, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&user.username)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to create user")?;

        Ok(User {
            id: result.last_insert_rowid(),
            username: user.username.clone(),
            name: user.name.clone(),
            password_hash: user.password_hash.clone(),
            created_at: now,
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<User>> {
        let row = sqlx::query(
            "SELECT id, username, name, password_hash, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get user by ID")?;

        Ok(row.map(|row| row_to_user(&row)))
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            "SELECT id, username, name, password_hash, created_at FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get user by username")?;

        Ok(row.map(|row| row_to_user(&row)))
    }

    async fn list(&self) -> Result<Vec<User>> {
        let rows = sqlx::query(
            "SELECT id, username, name, password_hash, created_at FROM users ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list users")?;

        Ok(rows.iter().map(row_to_user).collect())
    }

    async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM users")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count users")?;

        Ok(row.get("count"))
    }
}

fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        name: row.get("name"),
        password_hash: row.get("password_hash"),
        created_at: row.get("created_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};
    use crate::services::password::hash_password;

    async fn setup_test_repo() -> SqlxUserRepository {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        SqlxUserRepository::new(pool)
    }

    fn create_test_user(username: &str) -> User {
        User::new(
            username.to_string(),
            Some("Test User".to_string()),
            hash_password("test_password").expect("Failed to hash password"),
        )
    }

    #[tokio::test]
    async fn test_create_user() {
        let repo = setup_test_repo().await;
        let user = create_test_user("testuser");

        let created = repo.create(&user).await.expect("Failed to create user");

        assert!(created.id > 0);
        assert_eq!(created.username, "testuser");
        assert_eq!(created.name.as_deref(), Some("Test User"));
    }

    #[tokio::test]
    async fn test_get_user_by_id() {
        let repo = setup_test_repo().await;
        let created = repo
            .create(&create_test_user("testuser"))
            .await
            .expect("Failed to create user");

        let found = repo
            .get_by_id(created.id)
            .await
            .expect("Failed to get user")
            .expect("User not found");

        assert_eq!(found.id, created.id);
        assert_eq!(found.username, "testuser");
    }

    #[tokio::test]
    async fn test_get_user_by_id_not_found() {
        let repo = setup_test_repo().await;

        let found = repo.get_by_id(999).await.expect("Failed to get user");

        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_get_user_by_username() {
        let repo = setup_test_repo().await;
        repo.create(&create_test_user("findme"))
            .await
            .expect("Failed to create user");

        let found = repo
            .get_by_username("findme")
            .await
            .expect("Failed to get user")
            .expect("User not found");

        assert_eq!(found.username, "findme");
    }

    #[tokio::test]
    async fn test_get_user_by_username_not_found() {
        let repo = setup_test_repo().await;

        let found = repo
            .get_by_username("nonexistent")
            .await
            .expect("Failed to get user");

        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_list_users_in_creation_order() {
        let repo = setup_test_repo().await;
        repo.create(&create_test_user("first"))
            .await
            .expect("Failed to create user");
        repo.create(&create_test_user("second"))
            .await
            .expect("Failed to create user");

        let users = repo.list().await.expect("Failed to list users");

        assert_eq!(users.len(), 2);
        assert_eq!(users[0].username, "first");
        assert_eq!(users[1].username, "second");
    }

    #[tokio::test]
    async fn test_count_users() {
        let repo = setup_test_repo().await;

        assert_eq!(repo.count().await.expect("Failed to count users"), 0);

        repo.create(&create_test_user("user1"))
            .await
            .expect("Failed to create user");
        repo.create(&create_test_user("user2"))
            .await
            .expect("Failed to create user");

        assert_eq!(repo.count().await.expect("Failed to count users"), 2);
    }

    #[tokio::test]
    async fn test_unique_username_constraint() {
        let repo = setup_test_repo().await;

        repo.create(&create_test_user("duplicate"))
            .await
            .expect("Failed to create first user");
        let result = repo.create(&create_test_user("duplicate")).await;

        assert!(result.is_err(), "Should fail due to duplicate username");
    }

    #[tokio::test]
    async fn test_password_hash_stored_correctly() {
        let repo = setup_test_repo().await;
        let hash = hash_password("my_secure_password").expect("Failed to hash password");
        let user = User::new("hashtest".to_string(), None, hash.clone());

        let created = repo.create(&user).await.expect("Failed to create user");
        let found = repo
            .get_by_id(created.id)
            .await
            .expect("Failed to get user")
            .expect("User not found");

        assert_eq!(found.password_hash, hash);
        assert!(found.password_hash.starts_with("$argon2id$"));
    }
}
