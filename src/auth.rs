//! Session-backed authentication and password hashing.

use std::future::{Ready, ready};

use actix_identity::IdentityExt;
use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::user::User;
use crate::services::ServiceError;

/// Minimum password length accepted on registration and password change.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Claims of the logged-in user, stored as JSON in the identity cookie.
///
/// Extracting it from a request without a valid identity fails with
/// [`ServiceError::Unauthorized`]. Use `Option<AuthenticatedUser>` for
/// endpoints that also serve anonymous callers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub is_staff: bool,
}

impl AuthenticatedUser {
    /// Serialize the claims into the string kept by the identity middleware.
    pub fn to_identity(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_identity(value: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(value)
    }

    /// Whether the user may modify content owned by `author_id`.
    pub fn can_edit(&self, author_id: i32) -> bool {
        self.is_staff || self.id == author_id
    }
}

impl From<&User> for AuthenticatedUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            is_staff: user.is_staff,
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ServiceError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user = req
            .get_identity()
            .ok()
            .and_then(|identity| identity.id().ok())
            .and_then(|claims| AuthenticatedUser::from_identity(&claims).ok());

        ready(user.ok_or(ServiceError::Unauthorized))
    }
}

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("failed to hash password")]
    Hash,
    #[error("password does not match")]
    Mismatch,
}

/// Hash a password using Argon2id with a random salt.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| PasswordError::Hash)
}

/// Check `password` against a hash produced by [`hash_password`].
pub fn verify_password(password: &str, hash: &str) -> Result<(), PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(|_| PasswordError::Mismatch)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| PasswordError::Mismatch)
}
