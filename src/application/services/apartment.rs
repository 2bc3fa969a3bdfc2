//! Apartment use cases: ownership, membership and the delete cascade

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::info;

use crate::domain::apartment::{Apartment, ApartmentDetails, ApartmentFilter, ApartmentStatus};
use crate::domain::resident::Resident;
use crate::domain::{DomainError, DomainResult, RepositoryProvider, Store};
use crate::shared::{require_positive, Page, PageRequest};

use super::lookups::{require_apartment, require_resident};

const AREA_REQUIRED: &str = "Area must be greater than 0";

#[derive(Debug, Clone)]
pub struct NewApartment {
    pub address_number: i64,
    pub area: Decimal,
    pub status: Option<ApartmentStatus>,
    pub owner_id: i64,
    pub owner_phone: Option<String>,
    pub member_ids: Vec<i64>,
}

/// Partial update. `residents`, when present, is the complete member list.
#[derive(Debug, Clone, Default)]
pub struct ApartmentUpdate {
    pub area: Option<Decimal>,
    pub status: Option<ApartmentStatus>,
    pub owner_id: Option<i64>,
    pub owner_phone: Option<String>,
    pub residents: Option<Vec<i64>>,
}

pub struct ApartmentService {
    store: Arc<dyn Store>,
}

async fn load_details<R>(repos: &R, apartment: Apartment) -> DomainResult<ApartmentDetails>
where
    R: RepositoryProvider + ?Sized,
{
    let owner = match apartment.owner_id {
        Some(id) => repos.residents().find_by_id(id).await?,
        None => None,
    };
    let members = repos
        .residents()
        .find_by_apartment(apartment.address_number)
        .await?;
    let vehicles = repos
        .vehicles()
        .find_by_apartment(apartment.address_number)
        .await?;
    Ok(ApartmentDetails {
        apartment,
        owner,
        members,
        vehicles,
    })
}

/// Resolve every id or fail with NotFound naming the ones that do not exist.
async fn require_residents<R>(repos: &R, ids: &[i64]) -> DomainResult<Vec<Resident>>
where
    R: RepositoryProvider + ?Sized,
{
    let found = repos.residents().find_by_ids(ids).await?;
    let missing: Vec<i64> = ids
        .iter()
        .copied()
        .filter(|id| !found.iter().any(|r| r.id == *id))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    if !missing.is_empty() {
        return Err(DomainError::not_found("Resident", "id", format!("{:?}", missing)));
    }
    Ok(found)
}

/// The owner must not own an apartment other than `address_number`.
async fn ensure_not_owner_elsewhere<R>(repos: &R, owner_id: i64, address_number: i64) -> DomainResult<()>
where
    R: RepositoryProvider + ?Sized,
{
    match repos.apartments().find_by_owner(owner_id).await? {
        Some(owned) if owned.address_number != address_number => Err(DomainError::Conflict(format!(
            "Resident {} already owns apartment {}",
            owner_id, owned.address_number
        ))),
        _ => Ok(()),
    }
}

/// A member that owns a different apartment would leave it without its owner.
async fn ensure_members_not_owners_elsewhere<R>(
    repos: &R,
    members: &[Resident],
    address_number: i64,
) -> DomainResult<()>
where
    R: RepositoryProvider + ?Sized,
{
    for member in members {
        ensure_not_owner_elsewhere(repos, member.id, address_number).await?;
    }
    Ok(())
}

impl ApartmentService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn list(
        &self,
        filter: &ApartmentFilter,
        page: PageRequest,
    ) -> DomainResult<Page<ApartmentDetails>> {
        let page = self.store.apartments().list(filter, page).await?;
        let mut items = Vec::with_capacity(page.items.len());
        for apartment in &page.items {
            items.push(load_details(&*self.store, apartment.clone()).await?);
        }
        Ok(Page {
            items,
            total_elements: page.total_elements,
            page: page.page,
            size: page.size,
            total_pages: page.total_pages,
        })
    }

    pub async fn get(&self, address_number: i64) -> DomainResult<ApartmentDetails> {
        let apartment = require_apartment(&*self.store, address_number).await?;
        load_details(&*self.store, apartment).await
    }

    // ── Mutations ───────────────────────────────────────────────

    pub async fn create(&self, req: NewApartment) -> DomainResult<ApartmentDetails> {
        let area = require_positive(Some(req.area), AREA_REQUIRED)?;
        let uow = self.store.begin().await?;

        if uow.apartments().find_by_id(req.address_number).await?.is_some() {
            return Err(DomainError::Conflict(format!(
                "Apartment with address number = {} already exists",
                req.address_number
            )));
        }

        let owner = require_resident(&*uow, req.owner_id).await?;
        ensure_not_owner_elsewhere(&*uow, owner.id, req.address_number).await?;
        let members = require_residents(&*uow, &req.member_ids).await?;
        ensure_members_not_owners_elsewhere(&*uow, &members, req.address_number).await?;

        let now = Utc::now();
        let apartment = uow
            .apartments()
            .insert(Apartment {
                address_number: req.address_number,
                area,
                status: req.status.unwrap_or(ApartmentStatus::Residential),
                owner_id: Some(owner.id),
                owner_phone: req.owner_phone,
                created_at: now,
                updated_at: now,
            })
            .await?;

        let mut attach = members;
        if !attach.iter().any(|m| m.id == owner.id) {
            attach.push(owner);
        }
        for mut resident in attach {
            resident.attach(apartment.address_number);
            uow.residents().update(resident).await?;
        }

        let details = load_details(&*uow, apartment).await?;
        uow.commit().await?;
        info!(
            address_number = req.address_number,
            owner_id = req.owner_id,
            "Apartment created"
        );
        Ok(details)
    }

    pub async fn update(
        &self,
        address_number: i64,
        changes: ApartmentUpdate,
    ) -> DomainResult<ApartmentDetails> {
        let uow = self.store.begin().await?;
        let mut apartment = require_apartment(&*uow, address_number).await?;

        if let Some(new_owner_id) = changes.owner_id {
            let mut new_owner = require_resident(&*uow, new_owner_id).await?;
            ensure_not_owner_elsewhere(&*uow, new_owner_id, address_number).await?;

            if let Some(current_id) = apartment.owner_id.filter(|id| *id != new_owner_id) {
                if let Some(mut current) = uow.residents().find_by_id(current_id).await? {
                    if current.apartment_id == Some(address_number) {
                        current.detach();
                        uow.residents().update(current).await?;
                    }
                }
            }

            apartment.owner_id = Some(new_owner_id);
            if new_owner.apartment_id != Some(address_number) {
                new_owner.attach(address_number);
                uow.residents().update(new_owner).await?;
            }
        }
        if let Some(area) = changes.area {
            apartment.area = require_positive(Some(area), AREA_REQUIRED)?;
        }
        if let Some(status) = changes.status {
            apartment.status = status;
        }
        if changes.owner_phone.is_some() {
            apartment.owner_phone = changes.owner_phone;
        }
        let apartment = uow.apartments().update(apartment).await?;

        if let Some(ids) = changes.residents {
            let wanted = require_residents(&*uow, &ids).await?;
            ensure_members_not_owners_elsewhere(&*uow, &wanted, address_number).await?;
            let mut keep: BTreeSet<i64> = wanted.iter().map(|r| r.id).collect();
            keep.extend(apartment.owner_id);

            for mut resident in wanted {
                if resident.apartment_id != Some(address_number) {
                    resident.attach(address_number);
                    uow.residents().update(resident).await?;
                }
            }
            for mut current in uow.residents().find_by_apartment(address_number).await? {
                if !keep.contains(&current.id) {
                    current.detach();
                    uow.residents().update(current).await?;
                }
            }
        }

        let details = load_details(&*uow, apartment).await?;
        uow.commit().await?;
        info!(address_number, "Apartment updated");
        Ok(details)
    }

    /// Detach all residents, drop vehicles, invoice links and utility bills,
    /// then remove the apartment.
    pub async fn delete(&self, address_number: i64) -> DomainResult<()> {
        let uow = self.store.begin().await?;
        require_apartment(&*uow, address_number).await?;

        for mut resident in uow.residents().find_by_apartment(address_number).await? {
            resident.detach();
            uow.residents().update(resident).await?;
        }
        let vehicles = uow.vehicles().delete_by_apartment(address_number).await?;
        uow.invoice_apartments()
            .delete_for_apartment(address_number)
            .await?;
        uow.utility_bills().delete_by_apartment(address_number).await?;
        uow.apartments().delete(address_number).await?;

        uow.commit().await?;
        info!(address_number, vehicles_removed = vehicles, "Apartment deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::*;
    use crate::domain::vehicle::VehicleCategory;
    use rust_decimal_macros::dec;

    fn new_apartment(address_number: i64, owner_id: i64, member_ids: Vec<i64>) -> NewApartment {
        NewApartment {
            address_number,
            area: dec!(75.5),
            status: Some(ApartmentStatus::Residential),
            owner_id,
            owner_phone: Some("0912345678".into()),
            member_ids,
        }
    }

    #[tokio::test]
    async fn create_attaches_owner_and_members() {
        let store = store();
        for id in 1..=3 {
            seed_resident(&store, id, None).await;
        }
        let svc = ApartmentService::new(store.clone());

        let details = svc.create(new_apartment(101, 1, vec![2, 3])).await.unwrap();
        assert_eq!(details.apartment.owner_id, Some(1));
        assert_eq!(details.members.len(), 3);
        assert_eq!(details.number_of_members(), 3);
        assert_eq!(details.owner.map(|o| o.id), Some(1));
    }

    #[tokio::test]
    async fn create_rejects_owner_of_another_apartment() {
        let store = store();
        seed_resident(&store, 1, Some(101)).await;
        seed_apartment(&store, 101, dec!(50), Some(1)).await;
        let svc = ApartmentService::new(store.clone());

        let err = svc.create(new_apartment(102, 1, vec![])).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn create_reports_missing_members_and_persists_nothing() {
        let store = store();
        seed_resident(&store, 1, None).await;
        let svc = ApartmentService::new(store.clone());

        let err = svc.create(new_apartment(101, 1, vec![7, 8])).await.unwrap_err();
        assert_eq!(err.to_string(), "Resident with id = [7, 8] is not found");
        assert!(store.apartments().find_by_id(101).await.unwrap().is_none());
        let owner = store.residents().find_by_id(1).await.unwrap().unwrap();
        assert_eq!(owner.apartment_id, None);
    }

    #[tokio::test]
    async fn create_rejects_duplicate_address() {
        let store = store();
        seed_resident(&store, 1, None).await;
        seed_apartment(&store, 101, dec!(50), None).await;
        let svc = ApartmentService::new(store.clone());

        let err = svc.create(new_apartment(101, 1, vec![])).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn members_cannot_include_the_owner_of_another_apartment() {
        let store = store();
        seed_apartment(&store, 102, dec!(50), Some(7)).await;
        seed_resident(&store, 7, Some(102)).await;
        seed_resident(&store, 1, None).await;
        let svc = ApartmentService::new(store.clone());

        let err = svc.create(new_apartment(101, 1, vec![7])).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert!(store.apartments().find_by_id(101).await.unwrap().is_none());
        let owner_of_102 = store.residents().find_by_id(7).await.unwrap().unwrap();
        assert_eq!(owner_of_102.apartment_id, Some(102));

        seed_apartment(&store, 101, dec!(60), None).await;
        let err = svc
            .update(
                101,
                ApartmentUpdate {
                    residents: Some(vec![7]),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        let owner_of_102 = store.residents().find_by_id(7).await.unwrap().unwrap();
        assert_eq!(owner_of_102.apartment_id, Some(102));
        let apartment = store.apartments().find_by_id(102).await.unwrap().unwrap();
        assert_eq!(apartment.owner_id, Some(7));
    }

    #[tokio::test]
    async fn owner_change_detaches_previous_owner() {
        let store = store();
        seed_apartment(&store, 101, dec!(50), Some(1)).await;
        seed_resident(&store, 1, Some(101)).await;
        seed_resident(&store, 2, None).await;
        let svc = ApartmentService::new(store.clone());

        let details = svc
            .update(
                101,
                ApartmentUpdate {
                    owner_id: Some(2),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(details.apartment.owner_id, Some(2));
        let previous = store.residents().find_by_id(1).await.unwrap().unwrap();
        assert_eq!(previous.apartment_id, None);
        let current = store.residents().find_by_id(2).await.unwrap().unwrap();
        assert_eq!(current.apartment_id, Some(101));
    }

    #[tokio::test]
    async fn member_list_is_reconciled_and_keeps_owner() {
        let store = store();
        seed_apartment(&store, 101, dec!(50), Some(1)).await;
        seed_resident(&store, 1, Some(101)).await;
        seed_resident(&store, 2, Some(101)).await;
        seed_resident(&store, 3, None).await;
        let svc = ApartmentService::new(store.clone());

        let details = svc
            .update(
                101,
                ApartmentUpdate {
                    residents: Some(vec![3]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let ids: Vec<i64> = details.members.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 3]);

        let untouched = svc
            .update(
                101,
                ApartmentUpdate {
                    area: Some(dec!(80)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(untouched.members.len(), 2);
        assert_eq!(untouched.apartment.area, dec!(80));
    }

    #[tokio::test]
    async fn delete_cascades() {
        let store = store();
        seed_apartment(&store, 101, dec!(50), Some(1)).await;
        seed_resident(&store, 1, Some(101)).await;
        seed_vehicle(&store, "29A-001", VehicleCategory::Car, 101).await;
        let svc = ApartmentService::new(store.clone());

        svc.delete(101).await.unwrap();
        assert!(store.apartments().find_by_id(101).await.unwrap().is_none());
        assert!(store.vehicles().find_by_apartment(101).await.unwrap().is_empty());
        let resident = store.residents().find_by_id(1).await.unwrap().unwrap();
        assert_eq!(resident.apartment_id, None);

        let missing = svc.delete(101).await.unwrap_err();
        assert!(matches!(missing, DomainError::NotFound { .. }));
    }
}
