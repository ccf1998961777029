//! Domain service for user accounts and their favorite recipes.
//!
//! Profile values returned from this service never include the password hash.

use thiserror::Error;

use crate::db::PartialUpdateError;
use crate::models::user::{Favorite, NewUser, User, UserChanges, UserDetail};
use crate::services::credentials::CredentialError;

/// Errors specific to account operations.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Same message for unknown user and wrong password.
    #[error("Invalid username/password")]
    InvalidCredentials,

    #[error("{0}")]
    NotFound(String),

    #[error("Duplicate username: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for UserError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<PartialUpdateError> for UserError {
    fn from(err: PartialUpdateError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<CredentialError> for UserError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::EmptyPassword => Self::Validation(err.to_string()),
            other => Self::Internal(other.to_string()),
        }
    }
}

/// Domain service trait for accounts.
#[async_trait::async_trait]
pub trait UserService: Send + Sync {
    /// Verifies credentials and returns the profile.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::InvalidCredentials`] for an unknown user or a wrong password.
    async fn authenticate(&self, username: &str, password: &str) -> Result<User, UserError>;

    /// Creates an account, hashing the password.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::Duplicate`] if the username is taken, including when
    /// a concurrent registration wins the race.
    async fn register(&self, new_user: NewUser) -> Result<User, UserError>;

    /// All users ordered by username.
    async fn list_all(&self) -> Result<Vec<User>, UserError>;

    /// Profile followed by a separate favorites read; the two reads are not
    /// isolated from concurrent writes.
    async fn get(&self, username: &str) -> Result<UserDetail, UserError>;

    /// Applies a sparse update, re-hashing a new password.
    ///
    /// Performs no field-level authorization: callers decide which fields the
    /// requester may set.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::Validation`] when `changes` is empty and
    /// [`UserError::NotFound`] when no user matched.
    async fn update(&self, username: &str, changes: UserChanges) -> Result<User, UserError>;

    /// Deletes the user and every favorite they own.
    async fn delete(&self, username: &str) -> Result<(), UserError>;

    /// Records a favorite. The recipe id is not checked against the recipe API.
    async fn add_favorite(&self, username: &str, recipe_id: &str) -> Result<(), UserError>;

    /// Favorites in insertion order; empty when the user has none.
    async fn list_favorites(&self, username: &str) -> Result<Vec<Favorite>, UserError>;

    async fn remove_favorite(&self, username: &str, recipe_id: &str) -> Result<(), UserError>;
}
