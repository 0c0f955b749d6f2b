// Password hashing and verification (Argon2id)

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;

use crate::error::ApiError;

/// Password service for hashing and verification
pub struct PasswordService;

impl PasswordService {
    /// Hash a password using Argon2id with a random salt (PHC string output)
    pub fn hash_password(password: &str) -> Result<String, ApiError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| ApiError::InternalError(format!("password hashing failed: {}", e)))
    }

    /// Verify a password against a stored PHC hash
    pub fn verify_password(password: &str, hash: &str) -> Result<bool, ApiError> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| ApiError::InternalError(format!("stored hash is malformed: {}", e)))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}
