use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::auth::{MIN_PASSWORD_LENGTH, PasswordError, hash_password};
use crate::domain::user::NewUser;
use crate::forms::sanitize_inline_text;

const NAME_MAX_LEN: u64 = 150;
const EMAIL_MAX_LEN: u64 = 254;
const PASSWORD_MIN_LEN: u64 = MIN_PASSWORD_LENGTH as u64;
const PASSWORD_MAX_LEN: u64 = 128;

/// Result type returned by the user form helpers.
pub type UserFormResult<T> = Result<T, UserFormError>;

/// Errors that can occur while processing user forms.
#[derive(Debug, Error)]
pub enum UserFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("username may contain only letters, digits and @/./+/-/_")]
    InvalidUsername,
    #[error("first and last name cannot be empty")]
    EmptyName,
    #[error("new password must differ from the current one")]
    SamePassword,
    #[error(transparent)]
    Password(#[from] PasswordError),
}

/// Registration payload.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterUserForm {
    #[validate(email, length(max = EMAIL_MAX_LEN))]
    pub email: String,
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub username: String,
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub first_name: String,
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub last_name: String,
    #[validate(length(min = PASSWORD_MIN_LEN, max = PASSWORD_MAX_LEN))]
    pub password: String,
}

impl RegisterUserForm {
    /// Validates the payload and hashes the password into a domain `NewUser`.
    pub fn into_new_user(self) -> UserFormResult<NewUser> {
        self.validate()?;

        let username = self.username.trim();
        if !is_valid_username(username) {
            return Err(UserFormError::InvalidUsername);
        }

        let first_name = sanitize_inline_text(&self.first_name);
        let last_name = sanitize_inline_text(&self.last_name);
        if first_name.is_empty() || last_name.is_empty() {
            return Err(UserFormError::EmptyName);
        }

        let password_hash = hash_password(&self.password)?;

        Ok(NewUser::new(
            self.email,
            username,
            first_name,
            last_name,
            password_hash,
        ))
    }
}

/// Credentials submitted to the login endpoint.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Payload of the password change endpoint.
#[derive(Debug, Deserialize, Validate)]
pub struct SetPasswordForm {
    #[validate(length(min = 1))]
    pub current_password: String,
    #[validate(length(min = PASSWORD_MIN_LEN, max = PASSWORD_MAX_LEN))]
    pub new_password: String,
}

impl SetPasswordForm {
    /// Validates the payload and rejects a new password equal to the current one.
    pub fn validated(self) -> UserFormResult<Self> {
        self.validate()?;

        if self.current_password == self.new_password {
            return Err(UserFormError::SamePassword);
        }

        Ok(self)
    }
}

fn is_valid_username(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|ch| ch.is_alphanumeric() || matches!(ch, '@' | '.' | '+' | '-' | '_'))
}
