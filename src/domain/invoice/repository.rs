use async_trait::async_trait;

use super::model::{Invoice, InvoiceApartment, InvoiceFilter, NewInvoiceApartment};
use crate::domain::DomainResult;
use crate::shared::{Page, PageRequest};

#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Invoice>>;
    async fn find_active(&self) -> DomainResult<Vec<Invoice>>;
    async fn list(&self, filter: &InvoiceFilter, page: PageRequest)
        -> DomainResult<Page<Invoice>>;
    async fn insert(&self, invoice: Invoice) -> DomainResult<Invoice>;
    async fn update(&self, invoice: Invoice) -> DomainResult<Invoice>;
    async fn delete(&self, id: &str) -> DomainResult<()>;

    /// Ids of the fees attached to an invoice, ascending.
    async fn fee_ids(&self, invoice_id: &str) -> DomainResult<Vec<i64>>;
    /// Replace the fee set of an invoice.
    async fn replace_fees(&self, invoice_id: &str, fee_ids: &[i64]) -> DomainResult<()>;
    /// Detach a fee from every invoice that references it.
    async fn remove_fee(&self, fee_id: i64) -> DomainResult<()>;
}

#[async_trait]
pub trait InvoiceApartmentRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<InvoiceApartment>>;
    async fn find(
        &self,
        invoice_id: &str,
        apartment_id: i64,
    ) -> DomainResult<Option<InvoiceApartment>>;
    async fn for_apartment(&self, apartment_id: i64) -> DomainResult<Vec<InvoiceApartment>>;
    async fn for_invoice(&self, invoice_id: &str) -> DomainResult<Vec<InvoiceApartment>>;
    async fn insert(&self, link: NewInvoiceApartment) -> DomainResult<InvoiceApartment>;
    async fn update(&self, link: InvoiceApartment) -> DomainResult<InvoiceApartment>;
    async fn delete_for_invoice(&self, invoice_id: &str) -> DomainResult<()>;
    async fn delete_for_apartment(&self, apartment_id: i64) -> DomainResult<()>;
}
