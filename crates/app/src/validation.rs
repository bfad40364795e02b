//! Field validation errors shared by every write path.
//!
//! Each problem is reported against the input field it concerns so the HTTP
//! layer can render `{ "<field>": ["<message>", ...] }` bodies.

use std::fmt::{Display, Formatter, Result as FmtResult};

use smallvec::SmallVec;

pub const REQUIRED_MESSAGE: &str = "This field is required.";
pub const BLANK_MESSAGE: &str = "This field may not be blank.";

/// A single problem with a single input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Collected field errors, in the order they were found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: SmallVec<[FieldError; 2]>,
}

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a set holding one error.
    #[must_use]
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn extend(&mut self, other: Self) {
        self.errors.extend(other.errors);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Messages recorded against `field`.
    #[must_use]
    pub fn messages_for(&self, field: &str) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|error| error.field == field)
            .map(|error| error.message.as_str())
            .collect()
    }

    /// `Ok(())` when nothing was recorded.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one field error was recorded.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }

            write!(f, "{}: {}", error.field, error.message)?;
        }

        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Trim a required text value, recording blank and over-length values.
pub fn clean_required_text(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &str,
    max_chars: usize,
) -> String {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        errors.add(field, BLANK_MESSAGE);
    } else {
        check_max_chars(errors, field, trimmed, max_chars);
    }

    trimmed.to_owned()
}

/// Record an error when `value` is longer than `max_chars` characters.
pub fn check_max_chars(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &str,
    max_chars: usize,
) {
    if value.chars().count() > max_chars {
        errors.add(
            field,
            format!("Ensure this field has no more than {max_chars} characters."),
        );
    }
}
