//! Input validation module

use crate::dashboard::Selection;
use thiserror::Error;
use validator::Validate;

/// Shortest password the reset overlay will submit
pub const MIN_PASSWORD_LENGTH: u64 = 6;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Field '{field}' is required")]
    Required { field: String },

    #[error("Field '{field}' is too short (min {min} characters)")]
    TooShort { field: String, min: u64 },

    #[error("A password reset is already in progress")]
    ResetInProgress,
}

/// What the password reset overlay submits
#[derive(Debug, Validate)]
pub struct PasswordResetForm {
    #[validate(length(min = 6))]
    pub new_password: String,
}

impl PasswordResetForm {
    pub fn new(password: &str) -> Self {
        Self {
            new_password: password.trim().to_string(),
        }
    }
}

/// Validate the password reset overlay before it may submit
pub fn validate_password_reset(selection: &Selection) -> Result<(), ValidationError> {
    if selection.selected_user.is_none() {
        return Err(ValidationError::Required {
            field: "user".to_string(),
        });
    }

    if selection.resetting {
        return Err(ValidationError::ResetInProgress);
    }

    let form = PasswordResetForm::new(&selection.password_input);
    if form.new_password.is_empty() {
        return Err(ValidationError::Required {
            field: "new_password".to_string(),
        });
    }
    if form.validate().is_err() {
        return Err(ValidationError::TooShort {
            field: "new_password".to_string(),
            min: MIN_PASSWORD_LENGTH,
        });
    }

    Ok(())
}

/// Whether the submit action of the reset overlay is enabled
pub fn can_submit_password_reset(selection: &Selection) -> bool {
    validate_password_reset(selection).is_ok()
}
