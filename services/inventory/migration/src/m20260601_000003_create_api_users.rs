use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ApiUsers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ApiUsers::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ApiUsers::Username)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(ApiUsers::Password).string().not_null())
                    .col(ColumnDef::new(ApiUsers::Role).small_integer().not_null())
                    .col(
                        ColumnDef::new(ApiUsers::Enabled)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(ApiUsers::Email).string())
                    .col(ColumnDef::new(ApiUsers::FullName).string())
                    .col(
                        ColumnDef::new(ApiUsers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ApiUsers::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ApiUsers {
    Table,
    Id,
    Username,
    Password,
    Role,
    Enabled,
    Email,
    FullName,
    CreatedAt,
}
