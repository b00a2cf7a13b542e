//! Password hashing and verification
//!
//! Argon2id with a random per-password salt. The PHC digest string
//! embeds the salt and cost parameters, so verification needs no
//! side channel.

use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use password_hash::{PasswordHash, SaltString};

use crate::error::AuthError;

/// Hash a plaintext password into a PHC-format digest string.
pub fn hash_password(plaintext: &str) -> Result<String, AuthError> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes).map_err(|e| {
        tracing::error!(error = %e, "Salt generation failed");
        AuthError::HashingFailed
    })?;
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| {
        tracing::error!(error = %e, "Salt encoding failed");
        AuthError::HashingFailed
    })?;

    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            tracing::error!(error = %e, "Password hashing failed");
            AuthError::HashingFailed
        })
}

/// Verify a plaintext password against a stored digest.
///
/// Fails closed: a malformed digest returns false rather than
/// propagating an error into caller logic.
pub fn verify_password(plaintext: &str, digest: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(digest) else {
        return false;
    };
    Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify_roundtrip() {
        let digest = hash_password("Secure123").unwrap();
        assert!(verify_password("Secure123", &digest));
        assert!(!verify_password("secure123", &digest));
        assert!(!verify_password("", &digest));
    }

    #[test]
    fn test_digest_embeds_salt_and_params() {
        // PHC format: $argon2id$v=..$m=..,t=..,p=..$salt$hash
        let digest = hash_password("hunter2").unwrap();
        assert!(digest.starts_with("$argon2id$"));
        assert!(digest.contains("m="));
    }

    #[test]
    fn test_same_password_hashes_differently() {
        // Random salt per digest
        let a = hash_password("hunter2").unwrap();
        let b = hash_password("hunter2").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("hunter2", &a));
        assert!(verify_password("hunter2", &b));
    }

    #[test]
    fn test_verify_fails_closed_on_malformed_digest() {
        assert!(!verify_password("hunter2", ""));
        assert!(!verify_password("hunter2", "not-a-phc-string"));
        assert!(!verify_password("hunter2", "$argon2id$garbage"));
    }
}
