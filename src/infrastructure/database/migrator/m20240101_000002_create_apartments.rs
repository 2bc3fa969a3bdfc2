//! Create apartments table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Apartments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Apartments::AddressNumber)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Apartments::Area)
                            .decimal_len(16, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Apartments::Status)
                            .string_len(20)
                            .not_null()
                            .default("Vacant"),
                    )
                    .col(ColumnDef::new(Apartments::OwnerId).big_integer().unique_key())
                    .col(ColumnDef::new(Apartments::OwnerPhone).string())
                    .col(
                        ColumnDef::new(Apartments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Apartments::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Apartments::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Apartments {
    Table,
    AddressNumber,
    Area,
    Status,
    OwnerId,
    OwnerPhone,
    CreatedAt,
    UpdatedAt,
}
