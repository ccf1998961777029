use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::{favorites, prelude::*};
use crate::models::user::Favorite;

pub struct FavoriteRepository {
    conn: DatabaseConnection,
}

impl FavoriteRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Unconditional insert; the same recipe may be favorited twice.
    pub async fn add(&self, username: &str, recipe_id: &str) -> Result<(), DbErr> {
        let active = favorites::ActiveModel {
            username: Set(username.to_string()),
            recipe_id: Set(recipe_id.to_string()),
            ..Default::default()
        };

        active.insert(&self.conn).await?;
        Ok(())
    }

    /// Favorites for a user in insertion order.
    pub async fn list_for_user(&self, username: &str) -> Result<Vec<Favorite>, DbErr> {
        let rows = Favorites::find()
            .filter(favorites::Column::Username.eq(username))
            .order_by_asc(favorites::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(Favorite::from).collect())
    }

    pub async fn recipe_ids_for_user(&self, username: &str) -> Result<Vec<String>, DbErr> {
        let favorites = self.list_for_user(username).await?;
        Ok(favorites.into_iter().map(|f| f.recipe_id).collect())
    }

    /// Remove every matching (username, recipe) row; returns how many were removed.
    pub async fn remove(&self, username: &str, recipe_id: &str) -> Result<u64, DbErr> {
        let result = Favorites::delete_many()
            .filter(favorites::Column::Username.eq(username))
            .filter(favorites::Column::RecipeId.eq(recipe_id))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected)
    }
}
