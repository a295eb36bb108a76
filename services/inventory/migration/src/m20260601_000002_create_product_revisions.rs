use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProductRevisions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProductRevisions::Rev)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    // No FK to products: revision rows must survive product deletion.
                    .col(
                        ColumnDef::new(ProductRevisions::ProductId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProductRevisions::ChangeType)
                            .small_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProductRevisions::RecordedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ProductRevisions::Username)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ProductRevisions::UserId).big_integer())
                    .col(
                        ColumnDef::new(ProductRevisions::Name)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ProductRevisions::Description).string_len(500))
                    .col(
                        ColumnDef::new(ProductRevisions::Category)
                            .string_len(70)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProductRevisions::Price)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ProductRevisions::Stock).integer().not_null())
                    .col(ColumnDef::new(ProductRevisions::MinimumStock).integer())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_product_revisions_product_id_rev")
                    .table(ProductRevisions::Table)
                    .col(ProductRevisions::ProductId)
                    .col(ProductRevisions::Rev)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProductRevisions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ProductRevisions {
    Table,
    Rev,
    ProductId,
    ChangeType,
    RecordedAt,
    Username,
    UserId,
    Name,
    Description,
    Category,
    Price,
    Stock,
    MinimumStock,
}
