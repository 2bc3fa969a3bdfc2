//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.
//! Every repository is generic over the connection type, so the same code
//! runs on the pool and inside a transaction.

pub mod apartment_repository;
pub mod fee_repository;
pub mod invoice_repository;
pub mod repository_provider;
pub mod resident_repository;
pub mod user_repository;
pub mod utility_bill_repository;
pub mod vehicle_repository;

pub use repository_provider::SeaOrmRepositoryProvider;

use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait, Select};

use crate::domain::{DomainError, DomainResult};
use crate::shared::{Page, PageRequest};

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Database(e.to_string())
}

/// Count the filtered query, then fetch the requested page.
async fn fetch_page<'db, C, E>(
    conn: &'db C,
    query: Select<E>,
    page: PageRequest,
) -> DomainResult<Page<E::Model>>
where
    C: ConnectionTrait,
    E: EntityTrait,
    E::Model: Sync + 'db,
{
    let paginator = query.paginate(conn, page.size);
    let total = paginator.num_items().await.map_err(db_err)?;
    let items = paginator.fetch_page(page.index()).await.map_err(db_err)?;
    Ok(Page::new(items, total, page))
}
