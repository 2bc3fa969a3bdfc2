use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::info;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::{db_err, fetch_page};
use crate::domain::resident::{Gender, Resident, ResidentFilter, ResidentRepository, ResidentStatus};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::resident;
use crate::shared::{Page, PageRequest};

// ── Conversion helpers ──────────────────────────────────────────

fn status_to_domain(s: resident::ResidentStatus) -> ResidentStatus {
    match s {
        resident::ResidentStatus::Active => ResidentStatus::Active,
        resident::ResidentStatus::Temporary => ResidentStatus::Temporary,
        resident::ResidentStatus::Absent => ResidentStatus::Absent,
        resident::ResidentStatus::Moved => ResidentStatus::Moved,
    }
}

fn status_to_entity(s: ResidentStatus) -> resident::ResidentStatus {
    match s {
        ResidentStatus::Active => resident::ResidentStatus::Active,
        ResidentStatus::Temporary => resident::ResidentStatus::Temporary,
        ResidentStatus::Absent => resident::ResidentStatus::Absent,
        ResidentStatus::Moved => resident::ResidentStatus::Moved,
    }
}

fn gender_to_domain(g: resident::Gender) -> Gender {
    match g {
        resident::Gender::Male => Gender::Male,
        resident::Gender::Female => Gender::Female,
    }
}

fn gender_to_entity(g: Gender) -> resident::Gender {
    match g {
        Gender::Male => resident::Gender::Male,
        Gender::Female => resident::Gender::Female,
    }
}

fn entity_to_domain(m: resident::Model) -> Resident {
    Resident {
        id: m.id,
        name: m.name,
        dob: m.dob,
        gender: m.gender.map(gender_to_domain),
        cic: m.cic,
        status: status_to_domain(m.status),
        apartment_id: m.apartment_id,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn domain_to_active(r: Resident) -> resident::ActiveModel {
    resident::ActiveModel {
        id: Set(r.id),
        name: Set(r.name),
        dob: Set(r.dob),
        gender: Set(r.gender.map(gender_to_entity)),
        cic: Set(r.cic),
        status: Set(status_to_entity(r.status)),
        apartment_id: Set(r.apartment_id),
        created_at: Set(r.created_at),
        updated_at: Set(r.updated_at),
    }
}

// ── SeaOrmResidentRepository ────────────────────────────────────

pub struct SeaOrmResidentRepository<C> {
    conn: Arc<C>,
}

impl<C> SeaOrmResidentRepository<C> {
    pub fn new(conn: Arc<C>) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl<C> ResidentRepository for SeaOrmResidentRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Resident>> {
        let model = resident::Entity::find_by_id(id)
            .one(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        Ok(model.map(entity_to_domain))
    }

    async fn find_by_ids(&self, ids: &[i64]) -> DomainResult<Vec<Resident>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = resident::Entity::find()
            .filter(resident::Column::Id.is_in(ids.to_vec()))
            .order_by_asc(resident::Column::Id)
            .all(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(entity_to_domain).collect())
    }

    async fn find_by_apartment(&self, apartment_id: i64) -> DomainResult<Vec<Resident>> {
        let models = resident::Entity::find()
            .filter(resident::Column::ApartmentId.eq(apartment_id))
            .order_by_asc(resident::Column::Id)
            .all(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(entity_to_domain).collect())
    }

    async fn list(
        &self,
        filter: &ResidentFilter,
        page: PageRequest,
    ) -> DomainResult<Page<Resident>> {
        let mut query = resident::Entity::find().order_by_asc(resident::Column::Id);
        if filter.exclude_moved {
            query = query.filter(resident::Column::Status.ne(resident::ResidentStatus::Moved));
        }
        if let Some(name) = &filter.name {
            query = query.filter(resident::Column::Name.contains(name.as_str()));
        }
        if let Some(status) = filter.status {
            query = query.filter(resident::Column::Status.eq(status_to_entity(status)));
        }
        if let Some(apartment_id) = filter.apartment_id {
            query = query.filter(resident::Column::ApartmentId.eq(apartment_id));
        }
        let page = fetch_page(self.conn.as_ref(), query, page).await?;
        Ok(page.map(entity_to_domain))
    }

    async fn insert(&self, r: Resident) -> DomainResult<Resident> {
        let result = domain_to_active(r)
            .insert(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        info!("Resident created: {} ({})", result.name, result.id);
        Ok(entity_to_domain(result))
    }

    async fn update(&self, mut r: Resident) -> DomainResult<Resident> {
        r.updated_at = Utc::now();
        let result = domain_to_active(r)
            .update(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        Ok(entity_to_domain(result))
    }

    async fn delete(&self, id: i64) -> DomainResult<()> {
        resident::Entity::delete_by_id(id)
            .exec(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        info!("Resident deleted: {}", id);
        Ok(())
    }
}
