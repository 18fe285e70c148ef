//! API DTOs (Data Transfer Objects)
//!
//! Request payloads arrive with every field optional so that a missing field
//! is reported next to the other field errors instead of as a parse failure.
//! Unknown fields are ignored.

use kernel::validation::{Validate, ValidationErrors};
use serde::{Deserialize, Serialize};

use crate::application::view::{UserSummary, UserView};
use crate::application::{
    ChangePasswordInput, LoginInput, RegisterInput, UpdateProfileInput,
};
use crate::domain::value_object::{
    email::Email,
    user_name::UserName,
    user_password::{PasswordPolicyError, RawPassword},
    user_role::UserRole,
};

// ============================================================================
// Field rules
// ============================================================================

fn email_field(errors: &mut ValidationErrors, raw: Option<String>) -> Option<Email> {
    let raw = raw.unwrap_or_default();
    errors.check("email", Email::new(&raw).map_err(|e| e.to_string()))
}

fn name_field(errors: &mut ValidationErrors, raw: Option<String>) -> Option<UserName> {
    let raw = raw.unwrap_or_default();
    errors.check("name", UserName::new(raw).map_err(|e| e.to_string()))
}

fn new_password_field(
    errors: &mut ValidationErrors,
    field: &str,
    label: &str,
    raw: Option<String>,
) -> Option<RawPassword> {
    let raw = raw.unwrap_or_default();
    errors.check(
        field,
        RawPassword::new(raw).map_err(|e: PasswordPolicyError| e.message(label)),
    )
}

fn required_field(
    errors: &mut ValidationErrors,
    field: &str,
    message: &str,
    raw: Option<String>,
) -> Option<String> {
    match raw {
        Some(value) if !value.is_empty() => Some(value),
        _ => {
            errors.add(field, message);
            None
        }
    }
}

// ============================================================================
// Register
// ============================================================================

/// Register request
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
}

impl Validate for RegisterRequest {
    type Output = RegisterInput;

    fn validate(self) -> Result<Self::Output, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let email = email_field(&mut errors, self.email);
        let password = new_password_field(&mut errors, "password", "Password", self.password);
        let name = name_field(&mut errors, self.name);
        let role = match self.role {
            None => Some(UserRole::default()),
            Some(raw) => errors.check("role", raw.parse::<UserRole>()),
        };

        match (email, password, name, role) {
            (Some(email), Some(password), Some(name), Some(role)) => errors.finish(RegisterInput {
                email,
                name,
                password,
                role,
            }),
            _ => Err(errors),
        }
    }
}

/// Register / login response
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub message: &'static str,
    pub user: UserSummary,
    pub token: String,
}

// ============================================================================
// Login
// ============================================================================

/// Login request
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl Validate for LoginRequest {
    type Output = LoginInput;

    fn validate(self) -> Result<Self::Output, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let email = email_field(&mut errors, self.email);
        let password = required_field(
            &mut errors,
            "password",
            "Password is required",
            self.password,
        );

        match (email, password) {
            (Some(email), Some(password)) => errors.finish(LoginInput {
                email,
                password: RawPassword::unchecked(password),
            }),
            _ => Err(errors),
        }
    }
}

// ============================================================================
// Profile
// ============================================================================

/// Update profile request
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl Validate for UpdateProfileRequest {
    type Output = UpdateProfileInput;

    fn validate(self) -> Result<Self::Output, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.name.is_none() && self.email.is_none() {
            errors.add("body", "At least one of name or email must be provided");
            return Err(errors);
        }

        let name = self.name.map(|n| name_field(&mut errors, Some(n)));
        let email = self.email.map(|e| email_field(&mut errors, Some(e)));

        errors.finish(UpdateProfileInput {
            name: name.flatten(),
            email: email.flatten(),
        })
    }
}

/// Profile response (`GET /auth/profile`)
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: UserView,
}

/// Profile update response
#[derive(Debug, Serialize)]
pub struct ProfileUpdatedResponse {
    pub message: &'static str,
    pub user: UserView,
}

// ============================================================================
// Change Password
// ============================================================================

/// Change password request
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
    pub confirm_password: Option<String>,
}

impl Validate for ChangePasswordRequest {
    type Output = ChangePasswordInput;

    fn validate(self) -> Result<Self::Output, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let current = required_field(
            &mut errors,
            "currentPassword",
            "Current password is required",
            self.current_password,
        );

        let confirm_matches = match (&self.confirm_password, &self.new_password) {
            (None, _) => {
                errors.add("confirmPassword", "Password confirmation is required");
                false
            }
            (Some(confirm), new) => {
                let matches = new.as_deref() == Some(confirm.as_str());
                if !matches {
                    errors.add("confirmPassword", "Password confirmation does not match");
                }
                matches
            }
        };

        let new_password = new_password_field(
            &mut errors,
            "newPassword",
            "New password",
            self.new_password,
        );

        match (current, new_password, confirm_matches) {
            (Some(current), Some(new_password), true) => errors.finish(ChangePasswordInput {
                current_password: RawPassword::unchecked(current),
                new_password,
            }),
            _ => Err(errors),
        }
    }
}

// ============================================================================
// Plain message
// ============================================================================

/// `{message}` response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(errors: ValidationErrors) -> Vec<String> {
        errors.into_vec().into_iter().map(|e| e.field).collect()
    }

    #[test]
    fn test_register_collects_every_field_error() {
        let errors = RegisterRequest {
            role: Some("ROOT".into()),
            ..Default::default()
        }
        .validate()
        .unwrap_err();

        assert_eq!(fields(errors), vec!["email", "password", "name", "role"]);
    }

    #[test]
    fn test_register_normalizes_and_defaults_role() {
        let input = RegisterRequest {
            email: Some("  Alice@Example.COM ".into()),
            password: Some("Secret12!".into()),
            name: Some("Alice Martin".into()),
            role: None,
        }
        .validate()
        .unwrap();

        assert_eq!(input.email.as_str(), "alice@example.com");
        assert_eq!(input.role, UserRole::User);
    }

    #[test]
    fn test_register_password_messages() {
        let errors = RegisterRequest {
            email: Some("a@x.com".into()),
            password: Some("short".into()),
            name: Some("Al".into()),
            role: None,
        }
        .validate()
        .unwrap_err()
        .into_vec();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Password must be at least 8 characters long");
    }

    #[test]
    fn test_login_does_not_apply_password_policy() {
        let input = LoginRequest {
            email: Some("a@x.com".into()),
            password: Some("weak".into()),
        }
        .validate();
        assert!(input.is_ok());

        let errors = LoginRequest::default().validate().unwrap_err().into_vec();
        assert_eq!(errors[1].message, "Password is required");
    }

    #[test]
    fn test_update_profile_requires_a_field() {
        let errors = UpdateProfileRequest::default().validate().unwrap_err();
        assert_eq!(fields(errors), vec!["body"]);

        let input = UpdateProfileRequest {
            name: Some("Bob".into()),
            email: None,
        }
        .validate()
        .unwrap();
        assert!(input.email.is_none());
        assert_eq!(input.name.unwrap().as_str(), "Bob");
    }

    #[test]
    fn test_change_password_confirmation_mismatch() {
        let errors = ChangePasswordRequest {
            current_password: Some("Old12345!".into()),
            new_password: Some("New12345!".into()),
            confirm_password: Some("Other123!".into()),
        }
        .validate()
        .unwrap_err()
        .into_vec();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "confirmPassword");
    }

    #[test]
    fn test_change_password_labels_new_password() {
        let errors = ChangePasswordRequest {
            current_password: None,
            new_password: Some("nodigits!A".into()),
            confirm_password: Some("nodigits!A".into()),
        }
        .validate()
        .unwrap_err()
        .into_vec();

        assert_eq!(errors[0].field, "currentPassword");
        assert_eq!(errors[1].field, "newPassword");
        assert!(errors[1].message.starts_with("New password must contain"));
    }
}
