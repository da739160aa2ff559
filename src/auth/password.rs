//! Secret hashing
//!
//! The secret is wrapped in double quotes before hashing and before every
//! comparison, so stored hashes cover `"secret"` rather than `secret`.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use super::error::AuthError;

fn frame(secret: &str) -> String {
    format!("\"{}\"", secret)
}

/// argon2 PHC string for `secret`
pub fn hash_secret(secret: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(frame(secret).as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AuthError::Hash(e.to_string()))
}

/// `Ok(false)` on mismatch; `Err` only when `stored` is not a valid hash.
pub fn verify_secret(secret: &str, stored: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(stored).map_err(|e| AuthError::Hash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(frame(secret).as_bytes(), &parsed)
        .is_ok())
}
