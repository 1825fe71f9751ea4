/// Password hashing using Argon2id
///
/// Passwords are stored as PHC strings produced by Argon2id with 64 MB of
/// memory, 3 iterations, and 4 lanes. Verification reads the parameters back
/// out of the stored hash, so these knobs can change without invalidating
/// existing credentials.
///
/// # Example
///
/// ```
/// use taskhive_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("super_secret_password_123")?;
/// assert!(hash.starts_with("$argon2id$"));
///
/// assert!(verify_password("super_secret_password_123", &hash)?);
/// assert!(!verify_password("wrong_password", &hash)?);
/// # Ok(())
/// # }
/// ```
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder, Version,
};

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to produce a hash
    #[error("failed to hash password: {0}")]
    Hash(String),

    /// Stored hash is not a valid PHC string
    #[error("invalid password hash format: {0}")]
    InvalidHash(String),

    /// Verification failed for a reason other than a wrong password
    #[error("failed to verify password: {0}")]
    Verify(String),
}

/// Hashes a plaintext password into a PHC string.
///
/// A fresh 16-byte salt comes from the OS RNG on every call, so hashing the
/// same password twice yields different strings.
///
/// # Errors
///
/// Returns [`PasswordError::Hash`] if parameter construction or hashing
/// fails.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let params = ParamsBuilder::new()
        .m_cost(65536) // 64 MB
        .t_cost(3)
        .p_cost(4)
        .output_len(32)
        .build()
        .map_err(|e| PasswordError::Hash(format!("invalid parameters: {e}")))?;

    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params);

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::Hash(format!("hash generation failed: {e}")))?;

    Ok(password_hash.to_string())
}

/// Verifies a plaintext password against a stored PHC string.
///
/// Returns `Ok(false)` for a wrong password; errors are reserved for
/// malformed hashes and internal failures. Comparison is constant-time.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| PasswordError::InvalidHash(e.to_string()))?;

    // Parameters are read from the hash itself.
    let argon2 = Argon2::default();

    match argon2.verify_password(password.as_bytes(), &parsed_hash) {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::Verify(e.to_string())),
    }
}
