//! Bloglist - a small blog list service with token authentication

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bloglist::{
    api::{self, AppState},
    config::Config,
    db::{
        self,
        repositories::{SqlxBlogRepository, SqlxUserRepository},
    },
    services::{AuthService, BlogService, TokenSigner, UserService},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bloglist=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting bloglist service...");

    // Load configuration
    let config = Config::load(Path::new("config.yml"))?;
    tracing::info!("Configuration loaded");

    // Initialize database
    let pool = db::create_pool(&config.database).await?;
    tracing::info!("Database connected");

    // Run migrations
    db::migrations::run_migrations(&pool).await?;
    tracing::info!("Database migrations completed");

    // Create repositories
    let user_repo = SqlxUserRepository::boxed(pool.clone());
    let blog_repo = SqlxBlogRepository::boxed(pool);

    // Initialize services
    let signer = Arc::new(TokenSigner::new(&config.auth.token_secret));
    let blog_service = Arc::new(BlogService::new(blog_repo.clone(), user_repo.clone()));
    let user_service = Arc::new(UserService::new(user_repo.clone(), blog_repo));
    let auth_service = Arc::new(AuthService::new(user_repo, signer));

    // Build application state
    let state = AppState {
        blog_service,
        user_service,
        auth_service,
    };

    // Build router
    let app = api::build_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
