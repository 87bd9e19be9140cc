//! Category password verification.
//!
//! The CMS stores one of two verifier formats per category:
//! - lowercase hex SHA-256 of the password (what editors paste in)
//! - an Argon2 PHC string (`$argon2id$...`)

use crate::error::AppError;
use argon2::{
    password_hash::{PasswordHash, PasswordVerifier},
    Argon2,
};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Hash a password to the CMS verifier format (hex SHA-256).
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Verify a submitted password against a stored verifier.
///
/// # Returns
/// * `Ok(true)` if the password matches
/// * `Ok(false)` if it does not
/// * `Err(AppError)` if the stored verifier is malformed
pub fn verify_password(password: &str, stored_verifier: &str) -> Result<bool, AppError> {
    let stored_verifier = stored_verifier.trim();

    if stored_verifier.starts_with("$argon2") {
        let parsed = PasswordHash::new(stored_verifier)
            .map_err(|e| AppError::Internal(format!("Invalid Argon2 verifier: {}", e)))?;
        return Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok());
    }

    let expected = hex::decode(stored_verifier.to_ascii_lowercase())
        .map_err(|e| AppError::Internal(format!("Invalid SHA-256 verifier: {}", e)))?;
    if expected.len() != 32 {
        return Err(AppError::Internal(format!(
            "Invalid SHA-256 verifier length: expected 32 bytes, got {}",
            expected.len()
        )));
    }

    let computed = Sha256::digest(password.as_bytes());
    Ok(computed.as_slice().ct_eq(&expected).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::password_hash::{PasswordHasher, SaltString};

    #[test]
    fn test_hash_password_known_vector() {
        assert_eq!(
            hash_password("password"),
            "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8"
        );
    }

    #[test]
    fn test_verify_sha256_verifier() {
        let stored = hash_password("correct horse");
        assert!(verify_password("correct horse", &stored).unwrap());
        assert!(!verify_password("wrong horse", &stored).unwrap());
    }

    #[test]
    fn test_verify_uppercase_hex_verifier() {
        let stored = hash_password("secret").to_uppercase();
        assert!(verify_password("secret", &stored).unwrap());
    }

    #[test]
    fn test_verify_argon2_verifier() {
        let salt = SaltString::from_b64("c29tZXNhbHRzb21lc2FsdA").unwrap();
        let stored = Argon2::default()
            .hash_password(b"correct horse", &salt)
            .unwrap()
            .to_string();

        assert!(verify_password("correct horse", &stored).unwrap());
        assert!(!verify_password("wrong horse", &stored).unwrap());
    }

    #[test]
    fn test_malformed_verifier_is_error() {
        assert!(matches!(
            verify_password("x", "not-hex"),
            Err(AppError::Internal(_))
        ));
        assert!(matches!(
            verify_password("x", "abcd"),
            Err(AppError::Internal(_))
        ));
    }
}
