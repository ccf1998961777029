use sea_orm::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entities::{favorites, users};

/// Profile view of a user. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_admin: bool,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            username: model.username,
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            is_admin: model.is_admin,
        }
    }
}

/// Profile plus favorited recipe ids, in the order they were added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetail {
    #[serde(flatten)]
    pub user: User,
    pub favorites: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub username: String,
    pub recipe_id: String,
}

impl From<favorites::Model> for Favorite {
    fn from(model: favorites::Model) -> Self {
        Self {
            username: model.username,
            recipe_id: model.recipe_id,
        }
    }
}

/// Registration payload, including the plaintext password.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("is_admin", &self.is_admin)
            .finish()
    }
}

/// Sparse profile update: `None` means "leave unchanged".
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
    pub is_admin: Option<bool>,
}

impl fmt::Debug for UserChanges {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserChanges")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("email", &self.email)
            .field("is_admin", &self.is_admin)
            .finish()
    }
}

impl UserChanges {
    /// The set fields as `(logical name, value)` pairs.
    ///
    /// This is the allowlist of updatable fields; the names end up as SQL
    /// column names, so they must never come from request input.
    #[must_use]
    pub fn into_fields(self) -> Vec<(&'static str, Value)> {
        let mut fields = Vec::new();
        if let Some(first_name) = self.first_name {
            fields.push(("firstName", Value::from(first_name)));
        }
        if let Some(last_name) = self.last_name {
            fields.push(("lastName", Value::from(last_name)));
        }
        if let Some(password) = self.password {
            fields.push(("password", Value::from(password)));
        }
        if let Some(email) = self.email {
            fields.push(("email", Value::from(email)));
        }
        if let Some(is_admin) = self.is_admin {
            fields.push(("isAdmin", Value::from(is_admin)));
        }
        fields
    }
}
