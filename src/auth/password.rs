use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};

use crate::errors::{AppError, AppResult};

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::InternalError(format!("Failed to hash password: {}", e)))
}

/// `hash_password` on the blocking pool, off the request worker.
pub async fn hash_password_async(password: String) -> AppResult<String> {
    run_blocking(move || hash_password(&password)).await
}

/// `verify_password` on the blocking pool, off the request worker.
pub async fn verify_password_async(password: String, stored_hash: String) -> AppResult<bool> {
    run_blocking(move || verify_password(&password, &stored_hash)).await
}

async fn run_blocking<T, F>(work: F) -> AppResult<T>
where
    F: FnOnce() -> AppResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::InternalError(format!("Password task failed: {}", e)))?
}

/// Returns false for a wrong password. A stored hash that cannot be parsed is
/// an internal error.
pub fn verify_password(password: &str, stored_hash: &str) -> AppResult<bool> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| AppError::InternalError(format!("Stored password hash is invalid: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
