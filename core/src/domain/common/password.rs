//! Argon2id hashing for passwords and security answers.
//!
//! Hashes are stored in PHC string format, so the salt and parameters travel with
//! the hash.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

use crate::domain::common::CoreError;

pub fn hash_password(password: &str) -> Result<String, CoreError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| CoreError::PasswordHash { msg: e.to_string() })?;
    Ok(hash.to_string())
}

/// `Ok(false)` on a mismatch; `Err` only when the stored hash is unreadable.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, CoreError> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| CoreError::PasswordHash { msg: e.to_string() })?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(CoreError::PasswordHash { msg: e.to_string() }),
    }
}

/// Security answers are compared case-insensitively and without surrounding whitespace.
pub fn normalize_security_answer(answer: &str) -> String {
    answer.trim().to_lowercase()
}
