//! Credential service
//!
//! Verifies username/password pairs against stored users and issues signed
//! session tokens, and resolves presented tokens back to users. Unknown
//! usernames and wrong passwords fail with the same error so a caller cannot
//! probe which usernames exist.

use std::sync::Arc;

use anyhow::Context;

use crate::db::repositories::UserRepository;
use crate::models::User;
use crate::services::password::verify_password;
use crate::services::token::TokenSigner;

/// Error types for authentication operations
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Unknown username or wrong password
    #[error("invalid username or password")]
    InvalidCredentials,

    /// Token failed verification or names a user that no longer exists
    #[error("token invalid")]
    InvalidToken,

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// A successfully authenticated user together with their session token.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
}

/// Authentication service issuing and resolving session tokens
pub struct AuthService {
    user_repo: Arc<dyn UserRepository>,
    signer: Arc<TokenSigner>,
}

impl AuthService {
    pub fn new(user_repo: Arc<dyn UserRepository>, signer: Arc<TokenSigner>) -> Self {
        Self { user_repo, signer }
    }

    /// Authenticate a username/password pair and issue a session token.
    ///
    /// Read-only: no state is recorded for the issued token.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<AuthSession, AuthError> {
        let user = self
            .user_repo
            .get_by_username(username)
            .await
            .context("Failed to look up user")?
            .ok_or(AuthError::InvalidCredentials)?;

        let password_valid = verify_password(password, &user.password_hash)
            .context("Failed to verify password")?;

        if !password_valid {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.signer.sign(&user).context("Failed to issue token")?;

        Ok(AuthSession { user, token })
    }

    /// Resolve a bearer token to the user it names.
    ///
    /// Fails with [`AuthError::InvalidToken`] when the signature does not
    /// verify, the payload lacks a user id, or the user has since been
    /// removed.
    pub async fn resolve_token(&self, token: &str) -> Result<User, AuthError> {
        let claims = self
            .signer
            .verify(token)
            .map_err(|_| AuthError::InvalidToken)?;

        self.user_repo
            .get_by_id(claims.uid)
            .await
            .context("Failed to look up token user")?
            .ok_or(AuthError::InvalidToken)
    }
}
