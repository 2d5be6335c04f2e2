//! Data models
//!
//! Entity types shared by the repositories, services, and API layer.

pub mod blog;
pub mod user;

pub use blog::{Blog, CreateBlogInput, UpdateBlogInput};
pub use user::{CreateUserInput, User};
