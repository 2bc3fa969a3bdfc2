//! Create utility_bills table

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
                    .table(UtilityBills::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UtilityBills::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(UtilityBills::ApartmentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(UtilityBills::Name).string().not_null())
                    .col(
                        ColumnDef::new(UtilityBills::Electricity)
                            .decimal_len(16, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UtilityBills::Water)
                            .decimal_len(16, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UtilityBills::Internet)
                            .decimal_len(16, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UtilityBills::PaymentStatus)
                            .string_len(10)
                            .not_null()
                            .default("Unpaid"),
                    )
                    .col(
                        ColumnDef::new(UtilityBills::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_utility_bills_apartment")
                            .from(UtilityBills::Table, UtilityBills::ApartmentId)
                            .to(Apartments::Table, Apartments::AddressNumber)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_utility_bills_apartment_id")
                    .table(UtilityBills::Table)
                    .col(UtilityBills::ApartmentId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UtilityBills::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum UtilityBills {
    Table,
    Id,
    ApartmentId,
    Name,
    Electricity,
    Water,
    Internet,
    PaymentStatus,
    CreatedAt,
}
