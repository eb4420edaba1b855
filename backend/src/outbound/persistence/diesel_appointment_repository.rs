//! PostgreSQL-backed `AppointmentRepository` implementation using Diesel ORM.
//!
//! Slot exclusivity is enforced by the `appointments_scheduled_slot_idx`
//! partial unique index; a losing concurrent insert surfaces as
//! [`AppointmentRepositoryError::SlotTaken`].

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use diesel::dsl::{exists, now};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AppointmentRepository, AppointmentRepositoryError};
use crate::domain::{
    Appointment, AppointmentDetails, AppointmentId, AppointmentListing, AppointmentStatus,
    BarberId, NewAppointment, UserId,
};

use super::error_mapping::DbFailure;
use super::models::{AppointmentRow, NewAppointmentRow};
use super::pool::DbPool;
use super::schema::{appointments, barbers, specialties, users};

const SCHEDULED: &str = AppointmentStatus::Scheduled.as_str();

/// Diesel-backed implementation of the `AppointmentRepository` port.
#[derive(Clone)]
pub struct DieselAppointmentRepository {
    pool: DbPool,
}

impl DieselAppointmentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: impl Into<DbFailure>) -> AppointmentRepositoryError {
    match failure.into() {
        DbFailure::Connection(message) => AppointmentRepositoryError::connection(message),
        DbFailure::UniqueViolation { .. } => AppointmentRepositoryError::slot_taken(),
        DbFailure::ForeignKeyViolation { constraint } => AppointmentRepositoryError::query(
            format!(
                "foreign key violation on {}",
                constraint.as_deref().unwrap_or("unknown constraint")
            ),
        ),
        DbFailure::Query(message) => AppointmentRepositoryError::query(message),
    }
}

type DetailsRow = (AppointmentRow, String, String, String, String);

fn into_details(
    (row, barber_name, specialty_name, user_name, user_email): DetailsRow,
) -> AppointmentDetails {
    AppointmentDetails {
        appointment: row.into(),
        barber_name,
        specialty_name,
        user_name,
        user_email,
    }
}

/// Appointments joined with barber, specialty and customer names, boxed so
/// listings can add filters conditionally.
macro_rules! details_query {
    () => {
        appointments::table
            .inner_join(barbers::table)
            .inner_join(specialties::table)
            .inner_join(users::table)
            .select((
                AppointmentRow::as_select(),
                barbers::name,
                specialties::name,
                users::name,
                users::email,
            ))
            .into_boxed::<Pg>()
    };
}

#[async_trait]
impl AppointmentRepository for DieselAppointmentRepository {
    async fn booked_times(
        &self,
        barber_id: BarberId,
        date: NaiveDate,
    ) -> Result<Vec<NaiveTime>, AppointmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        appointments::table
            .filter(appointments::barber_id.eq(barber_id.get()))
            .filter(appointments::appointment_date.eq(date))
            .filter(appointments::status.eq(SCHEDULED))
            .order(appointments::appointment_time.asc())
            .select(appointments::appointment_time)
            .load(&mut conn)
            .await
            .map_err(map_failure)
    }

    async fn is_slot_taken(
        &self,
        barber_id: BarberId,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<bool, AppointmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        diesel::select(exists(
            appointments::table
                .filter(appointments::barber_id.eq(barber_id.get()))
                .filter(appointments::appointment_date.eq(date))
                .filter(appointments::appointment_time.eq(time))
                .filter(appointments::status.eq(SCHEDULED)),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_failure)
    }

    async fn insert(
        &self,
        appointment: &NewAppointment,
    ) -> Result<Appointment, AppointmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row = NewAppointmentRow {
            user_id: appointment.user_id.get(),
            barber_id: appointment.barber_id.get(),
            specialty_id: appointment.specialty_id.get(),
            appointment_date: appointment.appointment_date,
            appointment_time: appointment.appointment_time,
            status: SCHEDULED,
        };
        let stored: AppointmentRow = diesel::insert_into(appointments::table)
            .values(&row)
            .returning(AppointmentRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_failure)?;
        Ok(stored.into())
    }

    async fn find_by_id(
        &self,
        id: AppointmentId,
    ) -> Result<Option<Appointment>, AppointmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row: Option<AppointmentRow> = appointments::table
            .find(id.get())
            .select(AppointmentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_failure)?;
        Ok(row.map(Appointment::from))
    }

    async fn transition(
        &self,
        id: AppointmentId,
        status: AppointmentStatus,
    ) -> Result<Option<Appointment>, AppointmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        // Guarding on the current status makes the check-and-set atomic.
        let row: Option<AppointmentRow> = diesel::update(
            appointments::table
                .find(id.get())
                .filter(appointments::status.eq(SCHEDULED)),
        )
        .set((
            appointments::status.eq(status.as_str()),
            appointments::updated_at.eq(now),
        ))
        .returning(AppointmentRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_failure)?;
        Ok(row.map(Appointment::from))
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<AppointmentDetails>, AppointmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let rows: Vec<DetailsRow> = details_query!()
            .filter(appointments::user_id.eq(user_id.get()))
            .order((
                appointments::appointment_date.desc(),
                appointments::appointment_time.desc(),
            ))
            .load(&mut conn)
            .await
            .map_err(map_failure)?;
        Ok(rows.into_iter().map(into_details).collect())
    }

    async fn list(
        &self,
        listing: AppointmentListing,
    ) -> Result<Vec<AppointmentDetails>, AppointmentRepositoryError> {
        let mut query = details_query!();
        match listing {
            AppointmentListing::All { date, status } => {
                if let Some(date) = date {
                    query = query.filter(appointments::appointment_date.eq(date));
                }
                if let Some(status) = status {
                    query = query.filter(appointments::status.eq(status.as_str()));
                }
            }
            AppointmentListing::ScheduledOn(date) => {
                query = query
                    .filter(appointments::appointment_date.eq(date))
                    .filter(appointments::status.eq(SCHEDULED));
            }
            AppointmentListing::ScheduledAfter(date) => {
                query = query
                    .filter(appointments::appointment_date.gt(date))
                    .filter(appointments::status.eq(SCHEDULED));
            }
        }

        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let rows: Vec<DetailsRow> = query
            .order((
                appointments::appointment_date.asc(),
                appointments::appointment_time.asc(),
            ))
            .load(&mut conn)
            .await
            .map_err(map_failure)?;
        Ok(rows.into_iter().map(into_details).collect())
    }
}
