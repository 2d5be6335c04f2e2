//! Blog repository
//!
//! Database operations for blog records.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

use crate::models::Blog;

/// Blog repository trait
#[async_trait]
pub trait BlogRepository: Send + Sync {
    /// Create a new blog
    async fn create(&self, blog: &Blog) -> Result<Blog>;

    /// Get blog by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Blog>>;

    /// List all blogs in creation order
    async fn list(&self) -> Result<Vec<Blog>>;

    /// List blogs belonging to a user
    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Blog>>;

    /// Update a blog, returning the stored row
    async fn update(&self, blog: &Blog) -> Result<Blog>;

    /// Delete a blog
    async fn delete(&self, id: i64) -> Result<()>;

    /// Count total blogs
    async fn count(&self) -> Result<i64>;
}

/// SQLx-based blog repository implementation
pub struct SqlxBlogRepository {
    pool: SqlitePool,
}

impl SqlxBlogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn BlogRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl BlogRepository for SqlxBlogRepository {
    async fn create(&self, blog: &Blog) -> Result<Blog> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO blogs (title, author, url, likes, owner_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&blog.title)
        .bind(&blog.author)
        .bind(&blog.url)
        .bind(blog.likes)
        .bind(blog.owner_id)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to create blog")?;

        Ok(Blog {
            id: result.last_insert_rowid(),
            title: blog.title.clone(),
            author: blog.author.clone(),
            url: blog.url.clone(),
            likes: blog.likes,
            owner_id: blog.owner_id,
            created_at: now,
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Blog>> {
        let row = sqlx::query(
            "SELECT id, title, author, url, likes, owner_id, created_at FROM blogs WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get blog by ID")?;

        Ok(row.map(|row| row_to_blog(&row)))
    }

    async fn list(&self) -> Result<Vec<Blog>> {
        let rows = sqlx::query(
            "SELECT id, title, author, url, likes, owner_id, created_at FROM blogs ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list blogs")?;

        Ok(rows.iter().map(row_to_blog).collect())
    }

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Blog>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, author, url, likes, owner_id, created_at
            FROM blogs
            WHERE owner_id = ?
            ORDER BY id
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list blogs by owner")?;

        Ok(rows.iter().map(row_to_blog).collect())
    }

    async fn update(&self, blog: &Blog) -> Result<Blog> {
        sqlx::query(
            r#"
            UPDATE blogs
            SET title = ?, author = ?, url = ?, likes = ?
            WHERE id = ?
            "#,
        )
        .bind(&blog.title)
        .bind(&blog.author)
        .bind(&blog.url)
        .bind(blog.likes)
        .bind(blog.id)
        .execute(&self.pool)
        .await
        .context("Failed to update blog")?;

        self.get_by_id(blog.id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Blog not found after update"))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM blogs WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete blog")?;

        Ok(())
    }

    async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM blogs")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count blogs")?;

        Ok(row.get("count"))
    }
}

fn row_to_blog(row: &sqlx::sqlite::SqliteRow) -> Blog {
    Blog {
        id: row.get("id"),
        title: row.get("title"),
        author: row.get("author"),
        url: row.get("url"),
        likes: row.get("likes"),
        owner_id: row.get("owner_id"),
        created_at: row.get("created_at"),
    }
}
