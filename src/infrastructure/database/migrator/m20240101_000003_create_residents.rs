//! Create residents table

use sea_orm_migration::prelude::*;

use super::m20240101_000002_create_apartments::Apartments;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Residents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Residents::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Residents::Name).string().not_null())
                    .col(ColumnDef::new(Residents::Dob).date())
                    .col(ColumnDef::new(Residents::Gender).string_len(10))
                    .col(ColumnDef::new(Residents::Cic).string())
                    .col(
                        ColumnDef::new(Residents::Status)
                            .string_len(20)
                            .not_null()
                            .default("Active"),
                    )
                    .col(ColumnDef::new(Residents::ApartmentId).big_integer())
                    .col(
                        ColumnDef::new(Residents::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Residents::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_residents_apartment")
                            .from(Residents::Table, Residents::ApartmentId)
                            .to(Apartments::Table, Apartments::AddressNumber)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_residents_apartment_id")
                    .table(Residents::Table)
                    .col(Residents::ApartmentId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Residents::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Residents {
    Table,
    Id,
    Name,
    Dob,
    Gender,
    Cic,
    Status,
    ApartmentId,
    CreatedAt,
    UpdatedAt,
}
