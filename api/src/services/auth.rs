use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{Duration, Utc};
use derive_more::{Display, Error, From};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;

#[derive(Debug, Display, Error, From)]
pub enum AuthError {
    #[display("failed to hash password: {_0}")]
    #[error(ignore)]
    Hash(String),
    #[from]
    Token(jsonwebtoken::errors::Error),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: usize,
}

/// Password hashing and bearer-token signing for the login session.
#[derive(Clone)]
pub struct AuthService {
    secret: String,
    token_ttl_secs: i64,
}

impl AuthService {
    pub fn new(secret: String, token_ttl_secs: i64) -> Self {
        Self {
            secret,
            token_ttl_secs,
        }
    }

    pub fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut rand::thread_rng());
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| AuthError::Hash(err.to_string()))
    }

    pub fn verify_password(&self, password_hash: &str, password: &str) -> Result<bool, AuthError> {
        let parsed_hash =
            PasswordHash::new(password_hash).map_err(|err| AuthError::Hash(err.to_string()))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    pub fn issue_token(&self, user_id: Uuid) -> Result<String, AuthError> {
        let claims = Claims {
            sub: user_id,
            exp: (Utc::now() + Duration::seconds(self.token_ttl_secs)).timestamp() as usize,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;

        Ok(token)
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AuthService {
        AuthService::new("test-secret".to_string(), 3600)
    }

    #[test]
    fn hashed_password_verifies() {
        let auth = service();
        let hash = auth.hash_password("hunter2hunter2").unwrap();

        assert_ne!(hash, "hunter2hunter2");
        assert!(auth.verify_password(&hash, "hunter2hunter2").unwrap());
        assert!(!auth.verify_password(&hash, "wrong-password").unwrap());
    }

    #[test]
    fn issued_token_round_trips() {
        let auth = service();
        let user_id = Uuid::new_v4();

        let token = auth.issue_token(user_id).unwrap();
        let claims = auth.verify_token(&token).unwrap();
        assert_eq!(claims.sub, user_id);
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let token = service().issue_token(Uuid::new_v4()).unwrap();

        let other = AuthService::new("other-secret".to_string(), 3600);
        assert!(other.verify_token(&token).is_err());
    }
}
