//! User model
//!
//! Defines the `User` entity and the input type for account creation.
//! The password hash is stored alongside the user but never serialized.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User entity representing a registered account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: i64,
    /// Username (unique, minimum length 3)
    pub username: String,
    /// Display name (optional)
    pub name: Option<String>,
    /// Password hash (argon2)
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new User with the given parameters.
    ///
    /// The password must already be hashed; use
    /// `services::password::hash_password()`.
    pub fn new(username: String, name: Option<String>, password_hash: String) -> Self {
        Self {
            id: 0, // Will be set by the database
            username,
            name,
            password_hash,
            created_at: Utc::now(),
        }
    }
}

/// Input for creating a new user (before password hashing)
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    /// Username
    pub username: String,
    /// Display name (optional)
    pub name: Option<String>,
    /// Plaintext password (will be hashed)
    pub password: String,
}
