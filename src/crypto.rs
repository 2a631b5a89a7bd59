// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Randomness and password hashing.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use ring::rand::{SecureRandom, SystemRandom};

/// Bytes of entropy in a public share identifier.
const SHARE_ID_BYTES: usize = 18;

const SALT_BYTES: usize = 16;

#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("System RNG failure")]
    Rng,

    #[error("Password hashing failed: {0}")]
    Hash(String),
}

impl From<CryptoError> for crate::error::AppError {
    fn from(err: CryptoError) -> Self {
        crate::error::AppError::Internal(err.into())
    }
}

/// Fill a fixed-size buffer from the OS CSPRNG.
fn random_bytes<const N: usize>() -> Result<[u8; N], CryptoError> {
    let mut buf = [0u8; N];
    SystemRandom::new().fill(&mut buf).map_err(|_| CryptoError::Rng)?;
    Ok(buf)
}

/// Generate an unguessable, URL-safe share identifier (144 bits).
pub fn generate_share_id() -> Result<String, CryptoError> {
    Ok(URL_SAFE_NO_PAD.encode(random_bytes::<SHARE_ID_BYTES>()?))
}

/// Hash a password with Argon2id and a random salt; returns a PHC string.
///
/// CPU-heavy: call from `spawn_blocking`.
pub fn hash_password(password: &str) -> Result<String, CryptoError> {
    let salt = SaltString::encode_b64(&random_bytes::<SALT_BYTES>()?)
        .map_err(|e| CryptoError::Hash(e.to_string()))?;

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CryptoError::Hash(e.to_string()))
}

/// Check a password against a stored PHC string.
///
/// A malformed stored hash verifies as `false` rather than erroring.
pub fn verify_password(password: &str, phc: &str) -> bool {
    match PasswordHash::new(phc) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash is not a valid PHC string");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("secret1").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("secret1", &hash));
        assert!(!verify_password("secret2", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("secret1").unwrap();
        let b = hash_password("secret1").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_invalid_phc_string() {
        assert!(!verify_password("secret1", "not-a-hash"));
    }

    #[test]
    fn test_share_ids_are_unique_and_url_safe() {
        let a = generate_share_id().unwrap();
        let b = generate_share_id().unwrap();

        assert_ne!(a, b);
        assert_eq!(a.len(), 24);
        assert!(a
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }
}
