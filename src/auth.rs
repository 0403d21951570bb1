//! Password hashing and account identifiers.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use thiserror::Error;

#[derive(Error, Debug)]
#[error("Password hashing failed: {0}")]
pub struct HashError(String);

/// Canonical form of an email address: trimmed and lowercased.
///
/// Every stored, looked-up and compared address goes through this.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Hash a password into a PHC string.
pub fn hash_password(plain: &str) -> Result<String, HashError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| HashError(e.to_string()))
}

/// Check a password against a stored value.
///
/// Rows written before hashing was introduced hold the plain password;
/// anything that is not a PHC string is compared literally.
pub fn verify_password(plain: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => !stored.is_empty() && plain == stored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Bob@X.io "), "bob@x.io");
        assert_eq!(normalize_email("ADMIN@blogforge.local"), "admin@blogforge.local");
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("lav@123").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("lav@123", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn test_salts_differ() {
        assert_ne!(hash_password("same").unwrap(), hash_password("same").unwrap());
    }

    #[test]
    fn test_legacy_plaintext() {
        assert!(verify_password("hunter2", "hunter2"));
        assert!(!verify_password("hunter3", "hunter2"));
        assert!(!verify_password("", ""));
    }
}
