//! Credential & token service.
//!
//! Passwords are checked against bcrypt hashes; access tokens are HS256 JWTs
//! carrying the admin's id as `sub`.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SecurityConfig;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(#[from] jsonwebtoken::errors::Error),

    #[error("Password hashing error: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    #[error("Hashing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Signs and verifies time-limited bearer tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime: Duration,
}

impl TokenService {
    pub fn new(secret: &str, lifetime_minutes: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            lifetime: Duration::minutes(lifetime_minutes),
        }
    }

    pub fn from_config(config: &SecurityConfig) -> Self {
        Self::new(&config.jwt_secret, config.jwt_expires_in_minutes)
    }

    pub fn create_access_token(&self, subject: &str) -> Result<String, AuthError> {
        self.create_access_token_at(subject, Utc::now())
    }

    /// Issue a token as if it had been signed at `issued_at`.
    pub fn create_access_token_at(
        &self,
        subject: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let claims = Claims {
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.lifetime).timestamp(),
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?)
    }

    /// Returns the subject of a valid token. Any failure (expired, malformed,
    /// bad signature, missing subject) yields `None` without a reason.
    pub fn verify_access_token(&self, token: &str) -> Option<String> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        match decode::<Claims>(token, &self.decoding_key, &validation) {
            Ok(data) if !data.claims.sub.is_empty() => Some(data.claims.sub),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!(reason = ?e.kind(), "Rejected access token");
                None
            }
        }
    }
}

pub fn hash_password(plain: &str, cost: u32) -> Result<String, AuthError> {
    Ok(bcrypt::hash(plain, cost)?)
}

/// Constant-time check of `plain` against a bcrypt hash. Malformed hashes verify as false.
pub fn verify_password(plain: &str, hash: &str) -> bool {
    bcrypt::verify(plain, hash).unwrap_or(false)
}

/// Hash of a random secret at `cost`. Login verifies against it when the
/// email is unknown so both failure paths do the same bcrypt work.
pub fn decoy_hash(cost: u32) -> Result<String, AuthError> {
    hash_password(&uuid::Uuid::new_v4().to_string(), cost)
}

/// Runs on the blocking pool.
pub async fn verify_password_blocking(plain: String, hash: String) -> Result<bool, AuthError> {
    Ok(tokio::task::spawn_blocking(move || verify_password(&plain, &hash)).await?)
}

pub async fn hash_password_blocking(plain: String, cost: u32) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || hash_password(&plain, cost)).await?
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("test-secret", 60)
    }

    #[test]
    fn round_trips_subject() {
        let tokens = service();
        let token = tokens.create_access_token("6f1c7a52-0000-0000-0000-000000000001").unwrap();
        assert_eq!(
            tokens.verify_access_token(&token).as_deref(),
            Some("6f1c7a52-0000-0000-0000-000000000001")
        );
    }

    #[test]
    fn rejects_expired_token() {
        let tokens = service();
        let issued = Utc::now() - Duration::minutes(61);
        let token = tokens.create_access_token_at("admin", issued).unwrap();
        assert!(tokens.verify_access_token(&token).is_none());
    }

    #[test]
    fn accepts_token_just_before_expiry() {
        let tokens = service();
        let issued = Utc::now() - Duration::minutes(59);
        let token = tokens.create_access_token_at("admin", issued).unwrap();
        assert!(tokens.verify_access_token(&token).is_some());
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let token = TokenService::new("other-secret", 60)
            .create_access_token("admin")
            .unwrap();
        assert!(service().verify_access_token(&token).is_none());
    }

    #[test]
    fn rejects_garbage() {
        assert!(service().verify_access_token("invalid.token.here").is_none());
        assert!(service().verify_access_token("").is_none());
    }

    #[test]
    fn verifies_bcrypt_hashes() {
        let hash = hash_password("changeme", 4).unwrap();
        assert!(verify_password("changeme", &hash));
        assert!(!verify_password("wrong", &hash));
        assert!(!verify_password("changeme", "not-a-bcrypt-hash"));
    }

    #[test]
    fn decoy_hash_matches_cost_and_never_verifies() {
        let hash = decoy_hash(4).unwrap();
        assert!(hash.starts_with("$2b$04$"), "{}", hash);
        assert!(!verify_password("", &hash));
        assert!(!verify_password("changeme", &hash));
        assert_ne!(hash, decoy_hash(4).unwrap());
    }

    #[tokio::test]
    async fn blocking_helpers_agree() {
        let hash = hash_password_blocking("s3cret".into(), 4).await.unwrap();
        assert!(verify_password_blocking("s3cret".into(), hash.clone()).await.unwrap());
        assert!(!verify_password_blocking("nope".into(), hash).await.unwrap());
    }
}
