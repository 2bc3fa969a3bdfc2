//! Resident use cases, including the move-out and delete cascades

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::info;

use crate::domain::resident::{Gender, Resident, ResidentFilter, ResidentStatus};
use crate::domain::{DomainError, DomainResult, RepositoryProvider, Store};
use crate::shared::{Page, PageRequest};

use super::lookups::{require_apartment, require_resident};

#[derive(Debug, Clone)]
pub struct NewResident {
    pub id: i64,
    pub name: String,
    pub dob: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub cic: Option<String>,
    pub status: Option<ResidentStatus>,
    pub apartment_id: Option<i64>,
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct ResidentUpdate {
    pub name: Option<String>,
    pub dob: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub cic: Option<String>,
    pub status: Option<ResidentStatus>,
    pub apartment_id: Option<i64>,
}

pub struct ResidentService {
    store: Arc<dyn Store>,
}

/// Mark `resident` as moved out. When they own an apartment, the ownership is
/// cleared and every member of that apartment moves out with them.
async fn move_out<R>(repos: &R, mut resident: Resident) -> DomainResult<Resident>
where
    R: RepositoryProvider + ?Sized,
{
    if let Some(mut apartment) = repos.apartments().find_by_owner(resident.id).await? {
        apartment.clear_owner();
        let address = apartment.address_number;
        repos.apartments().update(apartment).await?;

        for mut member in repos.residents().find_by_apartment(address).await? {
            if member.id == resident.id {
                continue;
            }
            member.move_out();
            repos.residents().update(member).await?;
        }
        info!(resident_id = resident.id, apartment = address, "Owner moved out with all members");
    }

    resident.move_out();
    repos.residents().update(resident).await
}

impl ResidentService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    // ── Queries ─────────────────────────────────────────────────

    /// Residents that have not moved out.
    pub async fn list_active(
        &self,
        filter: ResidentFilter,
        page: PageRequest,
    ) -> DomainResult<Page<Resident>> {
        let filter = ResidentFilter {
            exclude_moved: true,
            ..filter
        };
        self.store.residents().list(&filter, page).await
    }

    pub async fn list_all(
        &self,
        filter: ResidentFilter,
        page: PageRequest,
    ) -> DomainResult<Page<Resident>> {
        self.store.residents().list(&filter, page).await
    }

    pub async fn get(&self, id: i64) -> DomainResult<Resident> {
        require_resident(&*self.store, id).await
    }

    // ── Mutations ───────────────────────────────────────────────

    pub async fn create(&self, req: NewResident) -> DomainResult<Resident> {
        let uow = self.store.begin().await?;

        if uow.residents().find_by_id(req.id).await?.is_some() {
            return Err(DomainError::Conflict(format!(
                "Resident with id = {} already exists",
                req.id
            )));
        }

        let status = req.status.unwrap_or_default();
        let apartment_id = match req.apartment_id {
            Some(id) if status != ResidentStatus::Moved => {
                require_apartment(&*uow, id).await?;
                Some(id)
            }
            _ => None,
        };

        let now = Utc::now();
        let resident = uow
            .residents()
            .insert(Resident {
                id: req.id,
                name: req.name,
                dob: req.dob,
                gender: req.gender,
                cic: req.cic,
                status,
                apartment_id,
                created_at: now,
                updated_at: now,
            })
            .await?;

        uow.commit().await?;
        info!(resident_id = resident.id, "Resident created");
        Ok(resident)
    }

    /// Apply a partial update. Setting the status to `Moved` runs the
    /// move-out cascade instead of a plain field update.
    pub async fn update(&self, id: i64, changes: ResidentUpdate) -> DomainResult<Resident> {
        let uow = self.store.begin().await?;
        let mut resident = require_resident(&*uow, id).await?;

        if let Some(name) = changes.name {
            resident.name = name;
        }
        if changes.dob.is_some() {
            resident.dob = changes.dob;
        }
        if changes.gender.is_some() {
            resident.gender = changes.gender;
        }
        if changes.cic.is_some() {
            resident.cic = changes.cic;
        }

        let resident = if changes.status == Some(ResidentStatus::Moved) {
            move_out(&*uow, resident).await?
        } else {
            if let Some(status) = changes.status {
                resident.status = status;
            }
            if let Some(apartment_id) = changes.apartment_id {
                if resident.apartment_id != Some(apartment_id) {
                    if let Some(owned) = uow.apartments().find_by_owner(id).await? {
                        return Err(DomainError::Validation(format!(
                            "Resident {} owns apartment {}; assign another owner first",
                            id, owned.address_number
                        )));
                    }
                    require_apartment(&*uow, apartment_id).await?;
                    resident.attach(apartment_id);
                }
            }
            uow.residents().update(resident).await?
        };

        uow.commit().await?;
        info!(resident_id = id, status = %resident.status, "Resident updated");
        Ok(resident)
    }

    /// Delete a resident. Deleting an owner clears the ownership, deletes the
    /// apartment's vehicles and deletes every member along with the owner.
    pub async fn delete(&self, id: i64) -> DomainResult<()> {
        let uow = self.store.begin().await?;
        let resident = require_resident(&*uow, id).await?;

        if let Some(mut apartment) = uow.apartments().find_by_owner(id).await? {
            apartment.clear_owner();
            let address = apartment.address_number;
            uow.apartments().update(apartment).await?;

            let removed = uow.vehicles().delete_by_apartment(address).await?;
            let mut members = uow.residents().find_by_apartment(address).await?;
            if !members.iter().any(|m| m.id == id) {
                members.push(resident);
            }
            for member in members {
                uow.residents().delete(member.id).await?;
            }
            info!(
                resident_id = id,
                apartment = address,
                vehicles_removed = removed,
                "Owner deleted with apartment members"
            );
        } else {
            uow.residents().delete(id).await?;
            info!(resident_id = id, "Resident deleted");
        }

        uow.commit().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::*;
    use crate::domain::vehicle::VehicleCategory;
    use rust_decimal_macros::dec;

    fn new_resident(id: i64, apartment_id: Option<i64>) -> NewResident {
        NewResident {
            id,
            name: "Tran Thi B".into(),
            dob: NaiveDate::from_ymd_opt(1990, 1, 1),
            gender: Some(Gender::Female),
            cic: Some(id.to_string()),
            status: None,
            apartment_id,
        }
    }

    #[tokio::test]
    async fn create_validates_id_and_apartment() {
        let store = store();
        seed_apartment(&store, 101, dec!(50), None).await;
        let svc = ResidentService::new(store.clone());

        let created = svc.create(new_resident(1, Some(101))).await.unwrap();
        assert_eq!(created.apartment_id, Some(101));
        assert_eq!(created.status, ResidentStatus::Active);

        let dup = svc.create(new_resident(1, None)).await.unwrap_err();
        assert!(matches!(dup, DomainError::Conflict(_)));

        let missing = svc.create(new_resident(2, Some(999))).await.unwrap_err();
        assert!(matches!(missing, DomainError::NotFound { .. }));
        assert!(store.residents().find_by_id(2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn moving_owner_clears_apartment_and_moves_members() {
        let store = store();
        seed_apartment(&store, 101, dec!(50), Some(1)).await;
        seed_resident(&store, 1, Some(101)).await;
        seed_resident(&store, 2, Some(101)).await;
        seed_resident(&store, 3, Some(101)).await;
        let svc = ResidentService::new(store.clone());

        let moved = svc
            .update(
                1,
                ResidentUpdate {
                    status: Some(ResidentStatus::Moved),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(moved.is_moved());
        assert_eq!(moved.apartment_id, None);

        let apartment = store.apartments().find_by_id(101).await.unwrap().unwrap();
        assert_eq!(apartment.owner_id, None);
        assert_eq!(apartment.owner_phone, None);

        for id in [2, 3] {
            let member = store.residents().find_by_id(id).await.unwrap().unwrap();
            assert!(member.is_moved());
            assert_eq!(member.apartment_id, None);
        }
    }

    #[tokio::test]
    async fn moving_member_only_moves_that_member() {
        let store = store();
        seed_apartment(&store, 101, dec!(50), Some(1)).await;
        seed_resident(&store, 1, Some(101)).await;
        seed_resident(&store, 2, Some(101)).await;
        let svc = ResidentService::new(store.clone());

        svc.update(
            2,
            ResidentUpdate {
                status: Some(ResidentStatus::Moved),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let owner = store.residents().find_by_id(1).await.unwrap().unwrap();
        assert!(!owner.is_moved());
        let apartment = store.apartments().find_by_id(101).await.unwrap().unwrap();
        assert_eq!(apartment.owner_id, Some(1));
    }

    #[tokio::test]
    async fn deleting_owner_removes_vehicles_and_members() {
        let store = store();
        seed_apartment(&store, 101, dec!(50), Some(1)).await;
        seed_resident(&store, 1, Some(101)).await;
        seed_resident(&store, 2, Some(101)).await;
        seed_vehicle(&store, "29A-001", VehicleCategory::Car, 101).await;
        seed_vehicle(&store, "29B-002", VehicleCategory::Motorbike, 101).await;
        let svc = ResidentService::new(store.clone());

        svc.delete(1).await.unwrap();

        assert!(store.vehicles().find_by_apartment(101).await.unwrap().is_empty());
        assert!(store.residents().find_by_apartment(101).await.unwrap().is_empty());
        assert!(store.residents().find_by_id(1).await.unwrap().is_none());
        let apartment = store.apartments().find_by_id(101).await.unwrap().unwrap();
        assert_eq!(apartment.owner_id, None);
    }

    #[tokio::test]
    async fn deleting_member_keeps_apartment_intact() {
        let store = store();
        seed_apartment(&store, 101, dec!(50), Some(1)).await;
        seed_resident(&store, 1, Some(101)).await;
        seed_resident(&store, 2, Some(101)).await;
        seed_vehicle(&store, "29A-001", VehicleCategory::Car, 101).await;
        let svc = ResidentService::new(store.clone());

        svc.delete(2).await.unwrap();

        let members = store.residents().find_by_apartment(101).await.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(store.vehicles().find_by_apartment(101).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn active_listing_hides_moved_residents() {
        let store = store();
        seed_resident(&store, 1, None).await;
        let mut moved = seed_resident(&store, 2, None).await;
        moved.move_out();
        store.residents().update(moved).await.unwrap();
        let svc = ResidentService::new(store.clone());

        let active = svc
            .list_active(ResidentFilter::default(), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(active.total_elements, 1);

        let all = svc
            .list_all(ResidentFilter::default(), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(all.total_elements, 2);
    }
}
