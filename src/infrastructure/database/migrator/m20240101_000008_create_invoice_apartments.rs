//! Create invoice_apartments table

use sea_orm_migration::prelude::*;

use super::m20240101_000002_create_apartments::Apartments;
use super::m20240101_000006_create_invoices::Invoices;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(InvoiceApartments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InvoiceApartments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(InvoiceApartments::InvoiceId)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InvoiceApartments::ApartmentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InvoiceApartments::PaymentStatus)
                            .string_len(10)
                            .not_null()
                            .default("Unpaid"),
                    )
                    .col(
                        ColumnDef::new(InvoiceApartments::FeeAmounts)
                            .text()
                            .not_null()
                            .default("{}"),
                    )
                    .col(
                        ColumnDef::new(InvoiceApartments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InvoiceApartments::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_invoice_apartments_invoice")
                            .from(InvoiceApartments::Table, InvoiceApartments::InvoiceId)
                            .to(Invoices::Table, Invoices::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_invoice_apartments_apartment")
                            .from(InvoiceApartments::Table, InvoiceApartments::ApartmentId)
                            .to(Apartments::Table, Apartments::AddressNumber)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_invoice_apartments_pair")
                    .table(InvoiceApartments::Table)
                    .col(InvoiceApartments::InvoiceId)
                    .col(InvoiceApartments::ApartmentId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(InvoiceApartments::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum InvoiceApartments {
    Table,
    Id,
    InvoiceId,
    ApartmentId,
    PaymentStatus,
    FeeAmounts,
    CreatedAt,
    UpdatedAt,
}
