//! `SeaORM` implementation of the `UserService` trait.

use async_trait::async_trait;
use sea_orm::{DbErr, SqlErr};
use tracing::{debug, info};

use crate::db::{NewUserRow, Store, USER_COLUMN_NAMES, sql_for_partial_update};
use crate::models::user::{Favorite, NewUser, User, UserChanges, UserDetail};
use crate::services::credentials::CredentialEngine;
use crate::services::user_service::{UserError, UserService};

pub struct SeaOrmUserService {
    store: Store,
    credentials: CredentialEngine,
}

impl SeaOrmUserService {
    #[must_use]
    pub const fn new(store: Store, credentials: CredentialEngine) -> Self {
        Self { store, credentials }
    }

    fn not_found(username: &str) -> UserError {
        UserError::NotFound(format!("No user: {username}"))
    }
}

fn map_insert_error(err: DbErr, username: &str) -> UserError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => UserError::Duplicate(username.to_string()),
        _ => err.into(),
    }
}

#[async_trait]
impl UserService for SeaOrmUserService {
    async fn authenticate(&self, username: &str, password: &str) -> Result<User, UserError> {
        let Some((user, password_hash)) = self.store.get_user_with_password(username).await?
        else {
            debug!(username, "Login attempt for unknown user");
            return Err(UserError::InvalidCredentials);
        };

        let is_valid = self
            .credentials
            .verify_blocking(password.to_string(), password_hash)
            .await?;

        if !is_valid {
            debug!(username, "Login attempt with wrong password");
            return Err(UserError::InvalidCredentials);
        }

        Ok(user)
    }

    async fn register(&self, new_user: NewUser) -> Result<User, UserError> {
        if self.store.user_exists(&new_user.username).await? {
            return Err(UserError::Duplicate(new_user.username));
        }

        let password = self.credentials.hash_blocking(new_user.password).await?;
        let username = new_user.username.clone();

        let user = self
            .store
            .insert_user(NewUserRow {
                username: new_user.username,
                password,
                first_name: new_user.first_name,
                last_name: new_user.last_name,
                email: new_user.email,
                is_admin: new_user.is_admin,
            })
            .await
            .map_err(|e| map_insert_error(e, &username))?;

        info!(username = %user.username, is_admin = user.is_admin, "Registered user");
        Ok(user)
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        Ok(self.store.list_users().await?)
    }

    async fn get(&self, username: &str) -> Result<UserDetail, UserError> {
        let user = self
            .store
            .get_user(username)
            .await?
            .ok_or_else(|| Self::not_found(username))?;

        let favorites = self.store.favorite_recipe_ids(username).await?;

        Ok(UserDetail { user, favorites })
    }

    async fn update(&self, username: &str, mut changes: UserChanges) -> Result<User, UserError> {
        let rotates_password = changes.password.is_some();
        if let Some(password) = changes.password.take() {
            changes.password = Some(self.credentials.hash_blocking(password).await?);
        }

        let update = sql_for_partial_update(changes.into_fields(), USER_COLUMN_NAMES)?;

        let user = self
            .store
            .update_user(username, update)
            .await?
            .ok_or_else(|| Self::not_found(username))?;

        if rotates_password {
            info!(username, "Password rotated");
        }

        Ok(user)
    }

    async fn delete(&self, username: &str) -> Result<(), UserError> {
        if !self.store.delete_user(username).await? {
            return Err(Self::not_found(username));
        }

        info!(username, "Deleted user");
        Ok(())
    }

    async fn add_favorite(&self, username: &str, recipe_id: &str) -> Result<(), UserError> {
        if !self.store.user_exists(username).await? {
            return Err(UserError::NotFound(format!("No username: {username}")));
        }

        self.store.add_favorite(username, recipe_id).await?;
        Ok(())
    }

    async fn list_favorites(&self, username: &str) -> Result<Vec<Favorite>, UserError> {
        Ok(self.store.list_favorites(username).await?)
    }

    async fn remove_favorite(&self, username: &str, recipe_id: &str) -> Result<(), UserError> {
        if self.store.remove_favorite(username, recipe_id).await? == 0 {
            return Err(UserError::NotFound(format!("No recipe: {recipe_id}")));
        }

        Ok(())
    }
}
