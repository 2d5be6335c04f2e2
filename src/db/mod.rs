//! Database layer
//!
//! SQLite storage for the blog list service: pool construction, embedded
//! migrations, and trait-based repositories for users and blogs.
//!
//! # Usage
//!
//! ```ignore
//! use bloglist::config::DatabaseConfig;
//! use bloglist::db::{create_pool, migrations};
//!
//! let pool = create_pool(&config).await?;
//! migrations::run_migrations(&pool).await?;
//! ```

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{create_pool, create_test_pool};
