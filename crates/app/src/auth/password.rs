//! Password hashing and strength policy.

use std::sync::OnceLock;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use thiserror::Error;

/// Minimum password length unless configured otherwise.
pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 8;

/// Similarity ratio at or above which a password counts as too close to a
/// user attribute.
const MAX_SIMILARITY: f64 = 0.7;

const COMMON_PASSWORDS: &[&str] = &[
    "123456", "123456789", "12345678", "1234567890", "password", "password1", "password123",
    "qwerty", "qwerty123", "qwertyuiop", "abc123", "abcd1234", "111111", "123123", "000000",
    "iloveyou", "admin", "admin123", "welcome", "welcome1", "letmein", "monkey", "dragon",
    "football", "baseball", "sunshine", "princess", "trustno1", "passw0rd", "master",
    "superman", "starwars", "whatever", "shadow", "michael", "1q2w3e4r", "zaq12wsx",
    "changeme", "secret", "login", "computer", "hello123",
];

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// Rules a new password must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    pub min_length: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_PASSWORD_LENGTH,
        }
    }
}

impl PasswordPolicy {
    /// Messages for every rule `password` breaks. Empty when acceptable.
    #[must_use]
    pub fn check(&self, password: &str, username: &str, email: &str) -> Vec<String> {
        let mut problems = Vec::new();

        if too_similar(password, username) {
            problems.push("The password is too similar to the username.".to_owned());
        } else if too_similar(password, email) {
            problems.push("The password is too similar to the email address.".to_owned());
        }

        if password.chars().count() < self.min_length {
            problems.push(format!(
                "This password is too short. It must contain at least {} characters.",
                self.min_length
            ));
        }

        let lowered = password.trim().to_lowercase();

        if COMMON_PASSWORDS.contains(&lowered.as_str()) {
            problems.push("This password is too common.".to_owned());
        }

        if password.chars().all(|ch| ch.is_ascii_digit()) {
            problems.push("This password is entirely numeric.".to_owned());
        }

        problems
    }
}

/// Compare the password to the attribute and to each of its word parts.
fn too_similar(password: &str, attribute: &str) -> bool {
    let password = password.to_lowercase();
    let attribute = attribute.to_lowercase();

    if attribute.is_empty() {
        return false;
    }

    std::iter::once(attribute.as_str())
        .chain(attribute.split(|ch: char| !ch.is_alphanumeric()))
        .filter(|part| !part.is_empty())
        .any(|part| similarity(&password, part) >= MAX_SIMILARITY)
}

/// `2 * longest common substring / total length`, in `0.0..=1.0`.
fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let mut longest = 0_usize;
    let mut previous = vec![0_usize; b.len() + 1];

    for ca in &a {
        let mut current = vec![0_usize; b.len() + 1];

        for (j, cb) in b.iter().enumerate() {
            if ca == cb {
                current[j + 1] = previous[j] + 1;
                longest = longest.max(current[j + 1]);
            }
        }

        previous = current;
    }

    #[expect(
        clippy::cast_precision_loss,
        reason = "lengths are bounded by password and username limits"
    )]
    let ratio = (2 * longest) as f64 / (a.len() + b.len()) as f64;

    ratio
}

/// Hash a password into an Argon2id PHC string with a fresh salt.
///
/// # Errors
///
/// Returns [`PasswordError::Hash`] if hashing fails.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hash(e.to_string()))
}

static DUMMY_HASH: OnceLock<String> = OnceLock::new();

/// A hash of a throwaway password, built with the same parameters as real ones.
///
/// Verifying against it when no account matches keeps login timing
/// independent of whether the username exists.
///
/// # Errors
///
/// Returns [`PasswordError::Hash`] if the first hashing attempt fails.
pub fn dummy_password_hash() -> Result<&'static str, PasswordError> {
    if let Some(hash) = DUMMY_HASH.get() {
        return Ok(hash);
    }

    let hash = hash_password("catalog-unknown-account")?;

    Ok(DUMMY_HASH.get_or_init(|| hash))
}

/// Verify a plaintext password against a stored PHC hash.
///
/// # Errors
///
/// Returns [`PasswordError::Hash`] if the stored hash is malformed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed =
        PasswordHash::new(hash).map_err(|e| PasswordError::Hash(format!("invalid hash: {e}")))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::Hash(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_password_matches() -> Result<(), PasswordError> {
        let hash = hash_password("hunter2-hunter2")?;

        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("hunter2-hunter2", &hash)?);
        assert!(!verify_password("wrong", &hash)?);

        Ok(())
    }

    #[test]
    fn salts_differ_per_hash() -> Result<(), PasswordError> {
        assert_ne!(hash_password("same")?, hash_password("same")?);

        Ok(())
    }

    #[test]
    fn malformed_hash_returns_error() {
        assert!(verify_password("pw", "not-a-hash").is_err());
    }

    #[test]
    fn strong_password_passes() {
        let policy = PasswordPolicy::default();

        assert!(
            policy
                .check("violet-umbrella-42", "ada", "ada@example.com")
                .is_empty()
        );
    }

    #[test]
    fn short_common_and_numeric_passwords_fail() {
        let policy = PasswordPolicy::default();

        assert_eq!(
            policy.check("1234567", "ada", "ada@example.com"),
            vec![
                "This password is too short. It must contain at least 8 characters.",
                "This password is entirely numeric.",
            ]
        );
        assert_eq!(
            policy.check("Password123", "ada", "ada@example.com"),
            vec!["This password is too common."]
        );
    }

    #[test]
    fn minimum_length_is_configurable() {
        let policy = PasswordPolicy { min_length: 12 };

        assert_eq!(policy.check("violet-umbr", "ada", "ada@example.com").len(), 1);
    }

    #[test]
    fn passwords_close_to_the_username_fail() {
        let policy = PasswordPolicy::default();

        assert_eq!(
            policy.check("lovelace1", "lovelace", "ada@example.com"),
            vec!["The password is too similar to the username."]
        );
        assert_eq!(
            policy.check("adalovelace!", "countess", "ada.lovelace@example.com"),
            vec!["The password is too similar to the email address."]
        );
    }

    #[test]
    fn dummy_hash_is_stable_and_matches_nothing_real() -> Result<(), PasswordError> {
        let first = dummy_password_hash()?;

        assert_eq!(first, dummy_password_hash()?);
        assert!(first.starts_with("$argon2id$"));
        assert!(!verify_password("violet-umbrella-42", first)?);

        Ok(())
    }
}
