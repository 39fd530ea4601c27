//! Account and authentication envelopes.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use esbox_core::error::AppError;
use esbox_core::types::UserId;

/// The signed-in account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Account ID.
    pub id: UserId,
    /// Display name.
    pub username: String,
    /// Email address.
    pub email: String,
}

/// Registration form.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Desired username.
    #[validate(length(min = 3, max = 32, message = "Username must be 3 to 32 characters"))]
    pub username: String,
    /// Email address.
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    /// Password confirmation.
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,
}

/// Login form.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address.
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login response carrying the bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Backend message.
    #[serde(default)]
    pub message: String,
    /// Bearer token for subsequent requests.
    pub token: String,
}

/// Forgot-password form.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    /// Email address to send the reset link to.
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
}

/// Reset-password body sent to the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    /// Token from the reset link.
    pub token: String,
    /// The new password.
    pub new_password: String,
}

/// Email verification body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyEmailRequest {
    /// Token from the verification link.
    pub token: String,
}

/// Run `validate()` and turn the first failure into a validation error.
pub fn validate_form<T: Validate>(form: &T) -> Result<(), AppError> {
    form.validate()
        .map_err(|errors| AppError::validation(first_message(&errors)))
}

fn first_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|list| list.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| errors.to_string())
}
