//! Argon2id password hashing plus reset-token/verification-code helpers.
//!
//! Password hashes use the Argon2id variant with a cryptographically random
//! salt generated via [`OsRng`], stored in PHC string format so algorithm
//! parameters and salt travel with the hash. Reset tokens and verification
//! codes are stored only as SHA-256 hex digests.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::Rng;
use sha2::{Digest, Sha256};

/// Hash a plaintext password using Argon2id with a random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default(); // Argon2id with default params
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC-formatted Argon2id hash.
///
/// Returns `Ok(true)` if the password matches, `Ok(false)` if it does not.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Generate an opaque password-reset token.
///
/// Returns `(plaintext_token, sha256_hex_hash)`; the plaintext is emailed
/// to the user, only the hash is stored.
pub fn generate_reset_token() -> (String, String) {
    let bytes: [u8; 32] = rand::rng().random();
    let plaintext: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    let hash = hash_token(&plaintext);
    (plaintext, hash)
}

/// Generate a 6-digit numeric verification code for the admin reset flow.
///
/// Returns `(code, sha256_hex_hash)`.
pub fn generate_verification_code() -> (String, String) {
    let code = rand::rng().random_range(100_000..1_000_000).to_string();
    let hash = hash_token(&code);
    (code, hash)
}

/// Compute the SHA-256 hex digest of a reset token or verification code.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify() {
        let password = "correct-horse-battery-staple";
        let hash = hash_password(password).expect("hashing should succeed");

        assert!(
            hash.starts_with("$argon2id$"),
            "expected argon2id PHC prefix"
        );

        let verified = verify_password(password, &hash).expect("verify should succeed");
        assert!(verified, "correct password should verify as true");
    }

    #[test]
    fn wrong_password_fails() {
        let hash = hash_password("real-password").expect("hashing should succeed");
        let verified = verify_password("wrong-password", &hash).expect("verify should succeed");
        assert!(!verified, "wrong password should verify as false");
    }

    #[test]
    fn rehashing_produces_distinct_hashes_that_both_verify() {
        // Each hash gets a fresh salt; both must still verify.
        let first = hash_password("password123!").unwrap();
        let second = hash_password("password123!").unwrap();
        assert_ne!(first, second);
        assert!(verify_password("password123!", &first).unwrap());
        assert!(verify_password("password123!", &second).unwrap());
    }

    #[test]
    fn reset_token_hash_matches() {
        let (plaintext, hash) = generate_reset_token();
        assert_eq!(plaintext.len(), 64);
        assert_eq!(hash, hash_token(&plaintext));
    }

    #[test]
    fn verification_code_is_six_digits() {
        let (code, hash) = generate_verification_code();
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(hash, hash_token(&code));
    }
}
