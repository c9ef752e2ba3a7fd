//! Password hashing and verification using Argon2id

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, Params,
};
use thiserror::Error;
use tracing::debug;

/// Error types for password operations
#[derive(Error, Debug)]
pub enum PasswordError {
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    HashingFailed(String),

    /// Rejected cost parameters
    #[error("Invalid hashing parameters: {0}")]
    InvalidParams(String),
}

/// Hash a password using Argon2id
///
/// Uses the OWASP-recommended defaults:
/// - Memory cost: 19456 KiB (19 MiB)
/// - Time cost: 2 iterations
/// - Parallelism: 1 thread
/// - Salt: 16 bytes (randomly generated)
///
/// Verification with these parameters stays well under 100ms on commodity
/// hardware. Use [`hash_password_with_params`] to tune the cost factor.
///
/// # Example
/// ```
/// use concours_auth::password::hash_password;
///
/// let hash = hash_password("MySecurePassword123!").unwrap();
/// // Hash: $argon2id$v=19$m=19456,t=2,p=1$...
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    // Argon2id variant with default params
    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

    Ok(password_hash.to_string())
}

/// Hash a password with explicit cost parameters
///
/// # Arguments
/// * `m_cost` - Memory cost in KiB
/// * `t_cost` - Number of iterations
/// * `p_cost` - Degree of parallelism
pub fn hash_password_with_params(
    password: &str,
    m_cost: u32,
    t_cost: u32,
    p_cost: u32,
) -> Result<String, PasswordError> {
    let params = Params::new(m_cost, t_cost, p_cost, None)
        .map_err(|e| PasswordError::InvalidParams(e.to_string()))?;
    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

    Ok(password_hash.to_string())
}

/// Verify a password against a stored hash
///
/// Fails closed: a malformed or corrupt stored hash, or any verifier error,
/// yields `false` rather than an error. Comparison timing is governed by the
/// Argon2 primitive itself.
///
/// # Example
/// ```
/// use concours_auth::password::{hash_password, verify_password};
///
/// let hash = hash_password("MyPassword123!").unwrap();
/// assert!(verify_password("MyPassword123!", &hash));
/// assert!(!verify_password("WrongPassword", &hash));
/// assert!(!verify_password("MyPassword123!", "not-a-phc-string"));
/// ```
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            debug!("Rejecting credential with unparseable stored hash: {}", e);
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}
