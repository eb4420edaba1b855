//! PostgreSQL-backed `BarberRepository` implementation using Diesel ORM.
//!
//! Barber creation and specialty replacement run inside a transaction so a
//! barber never ends up with a partial specialty set.

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{BarberRepository, BarberRepositoryError};
use crate::domain::{Barber, BarberId, BarberPatch, NewBarber, Specialty, SpecialtyId};

use super::error_mapping::DbFailure;
use super::models::{BarberChangeset, BarberRow, BarberSpecialtyRow, NewBarberRow, SpecialtyRow};
use super::pool::DbPool;
use super::schema::{barber_specialties, barbers, specialties};

/// Diesel-backed implementation of the `BarberRepository` port.
#[derive(Clone)]
pub struct DieselBarberRepository {
    pool: DbPool,
}

impl DieselBarberRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: impl Into<DbFailure>) -> BarberRepositoryError {
    match failure.into() {
        DbFailure::Connection(message) => BarberRepositoryError::connection(message),
        DbFailure::UniqueViolation { constraint } => BarberRepositoryError::query(format!(
            "unique violation on {}",
            constraint.as_deref().unwrap_or("unknown constraint")
        )),
        DbFailure::ForeignKeyViolation { .. } => {
            BarberRepositoryError::query("foreign key violation")
        }
        DbFailure::Query(message) => BarberRepositoryError::query(message),
    }
}

fn map_delete_failure(failure: DbFailure) -> BarberRepositoryError {
    match failure {
        // Appointments restrict barber deletes; specialty links cascade.
        DbFailure::ForeignKeyViolation { .. } => BarberRepositoryError::in_use(),
        other => map_failure(other),
    }
}

fn link_rows(barber_id: i32, specialty_ids: &[SpecialtyId]) -> Vec<BarberSpecialtyRow> {
    specialty_ids
        .iter()
        .map(|id| BarberSpecialtyRow {
            barber_id,
            specialty_id: id.get(),
        })
        .collect()
}

async fn load_specialties(
    conn: &mut AsyncPgConnection,
    barber_id: i32,
) -> Result<Vec<SpecialtyRow>, diesel::result::Error> {
    specialties::table
        .inner_join(barber_specialties::table)
        .filter(barber_specialties::barber_id.eq(barber_id))
        .order(specialties::name.asc())
        .select(SpecialtyRow::as_select())
        .load(conn)
        .await
}

#[async_trait]
impl BarberRepository for DieselBarberRepository {
    async fn list_active(&self) -> Result<Vec<Barber>, BarberRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let rows: Vec<BarberRow> = barbers::table
            .filter(barbers::active.eq(true))
            .order(barbers::name.asc())
            .select(BarberRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_failure)?;
        Ok(rows.into_iter().map(Barber::from).collect())
    }

    async fn find_by_id(&self, id: BarberId) -> Result<Option<Barber>, BarberRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row: Option<BarberRow> = barbers::table
            .find(id.get())
            .select(BarberRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_failure)?;
        Ok(row.map(Barber::from))
    }

    async fn specialties_of(&self, id: BarberId) -> Result<Vec<Specialty>, BarberRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let rows = load_specialties(&mut conn, id.get())
            .await
            .map_err(map_failure)?;
        Ok(rows.into_iter().map(Specialty::from).collect())
    }

    async fn list_by_specialty(
        &self,
        specialty_id: SpecialtyId,
    ) -> Result<Vec<Barber>, BarberRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let rows: Vec<BarberRow> = barbers::table
            .inner_join(barber_specialties::table)
            .filter(barber_specialties::specialty_id.eq(specialty_id.get()))
            .filter(barbers::active.eq(true))
            .order(barbers::name.asc())
            .select(BarberRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_failure)?;
        Ok(rows.into_iter().map(Barber::from).collect())
    }

    async fn offers_specialty(
        &self,
        barber_id: BarberId,
        specialty_id: SpecialtyId,
    ) -> Result<bool, BarberRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        diesel::select(exists(
            barber_specialties::table
                .filter(barber_specialties::barber_id.eq(barber_id.get()))
                .filter(barber_specialties::specialty_id.eq(specialty_id.get())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_failure)
    }

    async fn create(&self, barber: &NewBarber) -> Result<Barber, BarberRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row = NewBarberRow {
            name: &barber.name,
            age: barber.age,
            hire_date: barber.hire_date,
        };
        let specialty_ids = barber.specialty_ids.clone();

        let stored = conn
            .transaction::<BarberRow, DbFailure, _>(|conn| {
                async move {
                    let stored: BarberRow = diesel::insert_into(barbers::table)
                        .values(&row)
                        .returning(BarberRow::as_returning())
                        .get_result(conn)
                        .await?;
                    let links = link_rows(stored.id, &specialty_ids);
                    if !links.is_empty() {
                        diesel::insert_into(barber_specialties::table)
                            .values(&links)
                            .execute(conn)
                            .await?;
                    }
                    Ok(stored)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_failure)?;
        Ok(stored.into())
    }

    async fn update(
        &self,
        id: BarberId,
        patch: &BarberPatch,
    ) -> Result<Option<Barber>, BarberRepositoryError> {
        if patch == &BarberPatch::default() {
            return self.find_by_id(id).await;
        }
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let changes = BarberChangeset {
            name: patch.name.as_deref(),
            age: patch.age,
            hire_date: patch.hire_date,
            active: patch.active,
        };
        let row: Option<BarberRow> = diesel::update(barbers::table.find(id.get()))
            .set(&changes)
            .returning(BarberRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_failure)?;
        Ok(row.map(Barber::from))
    }

    async fn delete(&self, id: BarberId) -> Result<Option<Barber>, BarberRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row: Option<BarberRow> = diesel::delete(barbers::table.find(id.get()))
            .returning(BarberRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| map_delete_failure(err.into()))?;
        Ok(row.map(Barber::from))
    }

    async fn replace_specialties(
        &self,
        id: BarberId,
        specialty_ids: &[SpecialtyId],
    ) -> Result<Vec<Specialty>, BarberRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let barber_id = id.get();
        let links = link_rows(barber_id, specialty_ids);

        let rows = conn
            .transaction::<Vec<SpecialtyRow>, DbFailure, _>(|conn| {
                async move {
                    diesel::delete(
                        barber_specialties::table
                            .filter(barber_specialties::barber_id.eq(barber_id)),
                    )
                    .execute(conn)
                    .await?;
                    if !links.is_empty() {
                        diesel::insert_into(barber_specialties::table)
                            .values(&links)
                            .execute(conn)
                            .await?;
                    }
                    Ok(load_specialties(conn, barber_id).await?)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_failure)?;
        Ok(rows.into_iter().map(Specialty::from).collect())
    }
}
