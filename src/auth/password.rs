//! Password hashing and verification (Argon2id)
//!
//! Hashes are stored as PHC-format strings; verification is constant-time
//! by construction of the underlying algorithm.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Hash a plaintext password with a fresh random salt
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Check a plaintext password against a stored PHC-format hash.
/// A malformed stored hash counts as a mismatch.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("pw").expect("Failed to hash password");
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("pw", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn test_malformed_hash_is_mismatch() {
        assert!(!verify_password("pw", "not-a-phc-string"));
        assert!(!verify_password("pw", ""));
    }

    #[test]
    fn test_salts_are_random() {
        let a = hash_password("pw").unwrap();
        let b = hash_password("pw").unwrap();
        assert_ne!(a, b);
    }
}
