//! Session token signing and verification
//!
//! Stateless HS256 tokens carrying the user id and username. Tokens are not
//! persisted and carry no expiry claim; rotating the configured secret is the
//! only way to invalidate outstanding tokens.

use anyhow::{Context, Result};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::models::User;

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User ID
    pub uid: i64,
    /// Username
    pub sub: String,
}

/// Signs and verifies session tokens with a shared secret.
pub struct TokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenSigner {
    /// Create a signer from the configured secret.
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Tokens carry no expiry claim
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Sign a token for the given user.
    pub fn sign(&self, user: &User) -> Result<String> {
        let claims = TokenClaims {
            uid: user.id,
            sub: user.username.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).context("Failed to sign token")
    }

    /// Verify a token and return its claims.
    ///
    /// Fails if the signature does not check out or the payload lacks the
    /// user id claim.
    pub fn verify(&self, token: &str) -> Result<TokenClaims> {
        let data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .context("Token verification failed")?;

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        let mut user = User::new("root".to_string(), Some("Superuser".to_string()), String::new());
        user.id = 42;
        user
    }

    #[test]
    fn test_sign_and_verify_roundtrip() {
        let signer = TokenSigner::new("test-secret");
        let token = signer.sign(&test_user()).expect("Failed to sign token");

        let claims = signer.verify(&token).expect("Token should verify");

        assert_eq!(claims.uid, 42);
        assert_eq!(claims.sub, "root");
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let signer = TokenSigner::new("test-secret");
        let other = TokenSigner::new("other-secret");

        let token = signer.sign(&test_user()).expect("Failed to sign token");

        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let signer = TokenSigner::new("test-secret");

        assert!(signer.verify("not-a-token").is_err());
        assert!(signer.verify("").is_err());
    }

    #[test]
    fn test_verify_rejects_missing_user_id_claim() {
        // A token signed with the right secret but without a uid claim
        let signer = TokenSigner::new("test-secret");

        #[derive(Serialize)]
        struct BareClaims {
            sub: String,
        }

        let token = encode(
            &Header::default(),
            &BareClaims {
                sub: "root".to_string(),
            },
            &EncodingKey::from_secret(b"test-secret"),
        )
        .expect("Failed to sign token");

        assert!(signer.verify(&token).is_err());
    }
}
