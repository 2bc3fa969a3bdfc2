//! Create fee_invoices join table

use sea_orm_migration::prelude::*;

use super::m20240101_000005_create_fees::Fees;
use super::m20240101_000006_create_invoices::Invoices;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FeeInvoices::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(FeeInvoices::FeeId).big_integer().not_null())
                    .col(
                        ColumnDef::new(FeeInvoices::InvoiceId)
                            .string_len(64)
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(FeeInvoices::FeeId)
                            .col(FeeInvoices::InvoiceId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_fee_invoices_fee")
                            .from(FeeInvoices::Table, FeeInvoices::FeeId)
                            .to(Fees::Table, Fees::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_fee_invoices_invoice")
                            .from(FeeInvoices::Table, FeeInvoices::InvoiceId)
                            .to(Invoices::Table, Invoices::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FeeInvoices::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum FeeInvoices {
    Table,
    FeeId,
    InvoiceId,
}
