//! Create fees table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Fees::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Fees::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Fees::Name).string().not_null())
                    .col(ColumnDef::new(Fees::Description).string())
                    .col(ColumnDef::new(Fees::FeeType).string_len(20).not_null())
                    .col(
                        ColumnDef::new(Fees::UnitPrice)
                            .decimal_len(16, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Fees::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Fees::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Fees::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Fees {
    Table,
    Id,
    Name,
    Description,
    FeeType,
    UnitPrice,
    CreatedAt,
    UpdatedAt,
}
