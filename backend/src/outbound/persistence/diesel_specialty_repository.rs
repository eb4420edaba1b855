//! PostgreSQL-backed `SpecialtyRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{SpecialtyRepository, SpecialtyRepositoryError};
use crate::domain::{NewSpecialty, Specialty, SpecialtyId, SpecialtyPatch};

use super::error_mapping::DbFailure;
use super::models::{NewSpecialtyRow, SpecialtyChangeset, SpecialtyRow};
use super::pool::DbPool;
use super::schema::specialties;

/// Diesel-backed implementation of the `SpecialtyRepository` port.
#[derive(Clone)]
pub struct DieselSpecialtyRepository {
    pool: DbPool,
}

impl DieselSpecialtyRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: impl Into<DbFailure>) -> SpecialtyRepositoryError {
    match failure.into() {
        DbFailure::Connection(message) => SpecialtyRepositoryError::connection(message),
        DbFailure::UniqueViolation { .. } => SpecialtyRepositoryError::duplicate_name(),
        // Both barber links and appointments restrict specialty deletes.
        DbFailure::ForeignKeyViolation { .. } => SpecialtyRepositoryError::in_use(),
        DbFailure::Query(message) => SpecialtyRepositoryError::query(message),
    }
}

#[async_trait]
impl SpecialtyRepository for DieselSpecialtyRepository {
    async fn list(&self) -> Result<Vec<Specialty>, SpecialtyRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let rows: Vec<SpecialtyRow> = specialties::table
            .order(specialties::name.asc())
            .select(SpecialtyRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_failure)?;
        Ok(rows.into_iter().map(Specialty::from).collect())
    }

    async fn find_by_id(
        &self,
        id: SpecialtyId,
    ) -> Result<Option<Specialty>, SpecialtyRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row: Option<SpecialtyRow> = specialties::table
            .find(id.get())
            .select(SpecialtyRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_failure)?;
        Ok(row.map(Specialty::from))
    }

    async fn missing_ids(
        &self,
        ids: &[SpecialtyId],
    ) -> Result<Vec<SpecialtyId>, SpecialtyRepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let raw: Vec<i32> = ids.iter().map(|id| id.get()).collect();
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let found: Vec<i32> = specialties::table
            .filter(specialties::id.eq_any(&raw))
            .select(specialties::id)
            .load(&mut conn)
            .await
            .map_err(map_failure)?;
        Ok(ids
            .iter()
            .copied()
            .filter(|id| !found.contains(&id.get()))
            .collect())
    }

    async fn create(&self, specialty: &NewSpecialty) -> Result<Specialty, SpecialtyRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row = NewSpecialtyRow {
            name: &specialty.name,
            description: specialty.description.as_deref(),
        };
        let stored: SpecialtyRow = diesel::insert_into(specialties::table)
            .values(&row)
            .returning(SpecialtyRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_failure)?;
        Ok(stored.into())
    }

    async fn update(
        &self,
        id: SpecialtyId,
        patch: &SpecialtyPatch,
    ) -> Result<Option<Specialty>, SpecialtyRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let changes = SpecialtyChangeset {
            name: patch.name.as_deref(),
            description: patch.description.as_deref(),
        };
        let row: Option<SpecialtyRow> = diesel::update(specialties::table.find(id.get()))
            .set(&changes)
            .returning(SpecialtyRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_failure)?;
        Ok(row.map(Specialty::from))
    }

    async fn delete(&self, id: SpecialtyId) -> Result<Option<Specialty>, SpecialtyRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row: Option<SpecialtyRow> = diesel::delete(specialties::table.find(id.get()))
            .returning(SpecialtyRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_failure)?;
        Ok(row.map(Specialty::from))
    }
}
