//! Blog model
//!
//! This module provides:
//! - `Blog` entity representing a stored blog record
//! - Input types for creating and updating blogs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Blog entity.
///
/// A blog record is owned by the user who created it; `owner_id` is `None`
/// only for legacy rows that predate ownership tracking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blog {
    /// Unique identifier
    pub id: i64,
    /// Blog title
    pub title: String,
    /// Author display name (free text, not a user reference)
    pub author: Option<String>,
    /// Link to the blog
    pub url: String,
    /// Like count (never negative)
    pub likes: i64,
    /// Owning user ID
    pub owner_id: Option<i64>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Blog {
    /// Create a new blog with the given parameters.
    pub fn new(
        title: String,
        author: Option<String>,
        url: String,
        likes: i64,
        owner_id: i64,
    ) -> Self {
        Self {
            id: 0, // Will be set by the database
            title,
            author,
            url,
            likes,
            owner_id: Some(owner_id),
            created_at: Utc::now(),
        }
    }

    /// Check whether the given user owns this blog.
    ///
    /// Legacy rows with no owner match no user.
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.owner_id == Some(user_id)
    }
}

/// Input for creating a new blog
#[derive(Debug, Clone)]
pub struct CreateBlogInput {
    /// Blog title
    pub title: String,
    /// Author display name (optional)
    pub author: Option<String>,
    /// Link to the blog
    pub url: String,
    /// Like count (optional, defaults to 0)
    pub likes: Option<i64>,
}

/// Input for updating an existing blog
#[derive(Debug, Clone, Default)]
pub struct UpdateBlogInput {
    /// New title (optional)
    pub title: Option<String>,
    /// New author (optional)
    pub author: Option<String>,
    /// New url (optional)
    pub url: Option<String>,
    /// New like count (optional)
    pub likes: Option<i64>,
}

impl UpdateBlogInput {
    /// Check if any field is set
    pub fn has_changes(&self) -> bool {
        self.title.is_some() || self.author.is_some() || self.url.is_some() || self.likes.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blog_new() {
        let blog = Blog::new(
            "React patterns".to_string(),
            Some("Michael Chan".to_string()),
            "https://reactpatterns.com/".to_string(),
            7,
            1,
        );

        assert_eq!(blog.id, 0);
        assert_eq!(blog.title, "React patterns");
        assert_eq!(blog.likes, 7);
        assert_eq!(blog.owner_id, Some(1));
    }

    #[test]
    fn test_is_owned_by() {
        let mut blog = Blog::new(
            "Type wars".to_string(),
            None,
            "http://example.com/type-wars".to_string(),
            2,
            42,
        );

        assert!(blog.is_owned_by(42));
        assert!(!blog.is_owned_by(7));

        // Legacy rows match nobody
        blog.owner_id = None;
        assert!(!blog.is_owned_by(42));
    }

    #[test]
    fn test_update_input_has_changes() {
        assert!(!UpdateBlogInput::default().has_changes());

        let input = UpdateBlogInput {
            likes: Some(11),
            ..Default::default()
        };
        assert!(input.has_changes());
    }
}
