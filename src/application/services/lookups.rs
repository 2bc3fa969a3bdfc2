//! Load-or-NotFound helpers shared by the services

use crate::domain::apartment::Apartment;
use crate::domain::fee::Fee;
use crate::domain::invoice::Invoice;
use crate::domain::resident::Resident;
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

pub(crate) async fn require_resident<R>(repos: &R, id: i64) -> DomainResult<Resident>
where
    R: RepositoryProvider + ?Sized,
{
    repos
        .residents()
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Resident", "id", id))
}

pub(crate) async fn require_apartment<R>(repos: &R, id: i64) -> DomainResult<Apartment>
where
    R: RepositoryProvider + ?Sized,
{
    repos
        .apartments()
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Apartment", "id", id))
}

pub(crate) async fn require_fee<R>(repos: &R, id: i64) -> DomainResult<Fee>
where
    R: RepositoryProvider + ?Sized,
{
    repos
        .fees()
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Fee", "id", id))
}

/// Active invoice by id; inactive invoices are reported as not found.
pub(crate) async fn require_invoice<R>(repos: &R, id: &str) -> DomainResult<Invoice>
where
    R: RepositoryProvider + ?Sized,
{
    match repos.invoices().find_by_id(id).await? {
        Some(invoice) if invoice.is_active => Ok(invoice),
        _ => Err(DomainError::not_found("Invoice", "id", id)),
    }
}
