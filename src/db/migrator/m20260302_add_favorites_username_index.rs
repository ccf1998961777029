use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx_favorites_username")
                    .table(Favorites::Table)
                    .col(Favorites::Username)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_favorites_username")
                    .table(Favorites::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Favorites {
    Table,
    Username,
}
