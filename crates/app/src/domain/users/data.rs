//! Users Data

use std::fmt;

use validator::ValidateEmail;
use zeroize::Zeroize;

use crate::{
    auth::PasswordPolicy,
    validation::{BLANK_MESSAGE, ValidationErrors, check_max_chars, clean_required_text},
};

/// Longest username accepted.
pub const USERNAME_MAX_CHARS: usize = 150;

/// Longest email address accepted.
pub const EMAIL_MAX_CHARS: usize = 254;

/// Longest first or last name accepted.
pub const PERSONAL_NAME_MAX_CHARS: usize = 150;

/// A plaintext password, wiped from memory on drop.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    #[must_use]
    pub fn new(password: impl Into<String>) -> Self {
        Self(password.into())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl From<String> for Password {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(**redacted**)")
    }
}

impl Drop for Password {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// New User Data
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: Password,
    pub password_confirm: Password,
    pub first_name: String,
    pub last_name: String,
}

impl NewUser {
    /// Check every field, the password confirmation and the password policy.
    ///
    /// # Errors
    ///
    /// Returns every field problem found.
    pub fn validated(self, policy: &PasswordPolicy) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let username =
            clean_required_text(&mut errors, "username", &self.username, USERNAME_MAX_CHARS);

        if !username.is_empty() && !is_valid_username(&username) {
            errors.add(
                "username",
                "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
            );
        }

        let email = clean_required_text(&mut errors, "email", &self.email, EMAIL_MAX_CHARS);

        if !email.is_empty() && !is_valid_email(&email) {
            errors.add("email", "Enter a valid email address.");
        }

        let first_name = self.first_name.trim().to_owned();
        let last_name = self.last_name.trim().to_owned();

        check_max_chars(&mut errors, "first_name", &first_name, PERSONAL_NAME_MAX_CHARS);
        check_max_chars(&mut errors, "last_name", &last_name, PERSONAL_NAME_MAX_CHARS);

        if self.password.expose().is_empty() {
            errors.add("password", BLANK_MESSAGE);
        } else if self.password != self.password_confirm {
            errors.add("password_confirm", "Passwords do not match.");
        } else {
            for message in policy.check(self.password.expose(), &username, &email) {
                errors.add("password", message);
            }
        }

        errors.into_result()?;

        Ok(Self {
            username,
            email,
            password: self.password,
            password_confirm: self.password_confirm,
            first_name,
            last_name,
        })
    }
}

fn is_valid_username(username: &str) -> bool {
    username
        .chars()
        .all(|ch| ch.is_alphanumeric() || matches!(ch, '@' | '.' | '+' | '-' | '_'))
}

/// An RFC-shaped address whose domain has at least two labels.
fn is_valid_email(email: &str) -> bool {
    email.validate_email()
        && email
            .rsplit_once('@')
            .is_some_and(|(_, domain)| domain.contains('.'))
}
