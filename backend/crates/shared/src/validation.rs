//! Field-level validation
//!
//! Request payloads are validated as a whole: every failing field is
//! collected into [`ValidationErrors`] instead of stopping at the first one.

use serde::Serialize;

/// A single failed field with a human readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Accumulator for [`FieldError`]s.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    /// Record the error of a fallible field check, passing the value through.
    pub fn check<T>(&mut self, field: &str, result: Result<T, String>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(message) => {
                self.add(field, message);
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn into_vec(self) -> Vec<FieldError> {
        self.errors
    }

    /// `Ok(value)` when nothing was recorded.
    pub fn finish<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

/// Turns an untrusted payload into its validated form.
///
/// Implementors report every violation at once.
pub trait Validate {
    type Output;

    fn validate(self) -> Result<Self::Output, ValidationErrors>;
}

/// Length in Unicode scalar values, which is what users count.
#[inline]
pub fn char_len(value: &str) -> usize {
    value.chars().count()
}

/// Check that a trimmed string is within `min..=max` characters.
pub fn length_between(field_label: &str, value: &str, min: usize, max: usize) -> Result<(), String> {
    let len = char_len(value);
    if len < min {
        Err(format!("{field_label} must be at least {min} characters long"))
    } else if len > max {
        Err(format!("{field_label} cannot exceed {max} characters"))
    } else {
        Ok(())
    }
}
