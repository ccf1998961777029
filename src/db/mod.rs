use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::models::user::{Favorite, User};

pub mod migrator;
pub mod repositories;
pub mod sql;

pub use repositories::user::{NewUserRow, USER_COLUMN_NAMES};
pub use sql::{PartialUpdate, PartialUpdateError, sql_for_partial_update};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if db_url.starts_with("sqlite:") && !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:").trim_start_matches("//");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn favorite_repo(&self) -> repositories::favorite::FavoriteRepository {
        repositories::favorite::FavoriteRepository::new(self.conn.clone())
    }

    pub async fn get_user(&self, username: &str) -> Result<Option<User>, DbErr> {
        self.user_repo().get(username).await
    }

    pub async fn get_user_with_password(
        &self,
        username: &str,
    ) -> Result<Option<(User, String)>, DbErr> {
        self.user_repo().get_with_password(username).await
    }

    pub async fn user_exists(&self, username: &str) -> Result<bool, DbErr> {
        self.user_repo().exists(username).await
    }

    pub async fn list_users(&self) -> Result<Vec<User>, DbErr> {
        self.user_repo().list_all().await
    }

    pub async fn insert_user(&self, row: NewUserRow) -> Result<User, DbErr> {
        self.user_repo().insert(row).await
    }

    pub async fn update_user(
        &self,
        username: &str,
        update: PartialUpdate,
    ) -> Result<Option<User>, DbErr> {
        self.user_repo().update(username, update).await
    }

    pub async fn delete_user(&self, username: &str) -> Result<bool, DbErr> {
        self.user_repo().delete(username).await
    }

    pub async fn add_favorite(&self, username: &str, recipe_id: &str) -> Result<(), DbErr> {
        self.favorite_repo().add(username, recipe_id).await
    }

    pub async fn list_favorites(&self, username: &str) -> Result<Vec<Favorite>, DbErr> {
        self.favorite_repo().list_for_user(username).await
    }

    pub async fn favorite_recipe_ids(&self, username: &str) -> Result<Vec<String>, DbErr> {
        self.favorite_repo().recipe_ids_for_user(username).await
    }

    pub async fn remove_favorite(&self, username: &str, recipe_id: &str) -> Result<u64, DbErr> {
        self.favorite_repo().remove(username, recipe_id).await
    }
}
