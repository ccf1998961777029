use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, Statement, TransactionTrait,
};

use crate::db::sql::PartialUpdate;
use crate::entities::{favorites, prelude::*, users};
use crate::models::user::User;

/// Logical field name -> `users` column, for fields whose names differ.
pub const USER_COLUMN_NAMES: &[(&str, &str)] = &[
    ("firstName", "first_name"),
    ("lastName", "last_name"),
    ("isAdmin", "is_admin"),
];

/// Row to insert; `password` is already hashed.
#[derive(Debug, Clone)]
pub struct NewUserRow {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_admin: bool,
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, username: &str) -> Result<Option<User>, DbErr> {
        let user = Users::find_by_id(username).one(&self.conn).await?;
        Ok(user.map(User::from))
    }

    /// Profile together with the stored password hash, for credential checks only.
    pub async fn get_with_password(&self, username: &str) -> Result<Option<(User, String)>, DbErr> {
        let user = Users::find_by_id(username).one(&self.conn).await?;

        Ok(user.map(|u| {
            let password_hash = u.password.clone();
            (User::from(u), password_hash)
        }))
    }

    pub async fn exists(&self, username: &str) -> Result<bool, DbErr> {
        Ok(self.get(username).await?.is_some())
    }

    pub async fn list_all(&self) -> Result<Vec<User>, DbErr> {
        let users = Users::find()
            .order_by_asc(users::Column::Username)
            .all(&self.conn)
            .await?;

        Ok(users.into_iter().map(User::from).collect())
    }

    /// Fails with a unique-constraint `DbErr` when the username is taken.
    pub async fn insert(&self, row: NewUserRow) -> Result<User, DbErr> {
        let active = users::ActiveModel {
            username: Set(row.username),
            password: Set(row.password),
            first_name: Set(row.first_name),
            last_name: Set(row.last_name),
            email: Set(row.email),
            is_admin: Set(row.is_admin),
        };

        let model = active.insert(&self.conn).await?;
        Ok(User::from(model))
    }

    /// Apply a compiled SET clause to one user; `None` when no row matched.
    pub async fn update(
        &self,
        username: &str,
        update: PartialUpdate,
    ) -> Result<Option<User>, DbErr> {
        let backend = self.conn.get_database_backend();
        let sql = format!(
            "UPDATE users SET {} WHERE username = {} RETURNING *",
            update.set_clause(),
            update.next_placeholder()
        );

        let mut values = update.into_values();
        values.push(username.into());

        let model = Users::find()
            .from_raw_sql(Statement::from_sql_and_values(backend, sql, values))
            .one(&self.conn)
            .await?;

        Ok(model.map(User::from))
    }

    /// Delete a user and every favorite they own. Returns false if no user matched.
    pub async fn delete(&self, username: &str) -> Result<bool, DbErr> {
        let txn = self.conn.begin().await?;

        Favorites::delete_many()
            .filter(favorites::Column::Username.eq(username))
            .exec(&txn)
            .await?;

        let result = Users::delete_by_id(username).exec(&txn).await?;
        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Ok(false);
        }

        txn.commit().await?;
        Ok(true)
    }
}
