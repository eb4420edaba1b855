//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain entities live
//! next to each row.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use diesel::prelude::*;
use tracing::warn;

use crate::domain::{
    Appointment, AppointmentId, AppointmentStatus, Barber, BarberId, Specialty, SpecialtyId,
    StoredCredentials, User, UserId,
};

use super::schema::{appointments, barber_specialties, barbers, specialties, users};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl UserRow {
    pub(crate) fn into_credentials(self) -> StoredCredentials {
        StoredCredentials {
            user: User {
                id: UserId::new(self.id),
                name: self.name,
                email: self.email,
                is_admin: self.is_admin,
                created_at: self.created_at,
            },
            password_hash: self.password_hash,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub is_admin: bool,
}

// ---------------------------------------------------------------------------
// Specialties
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = specialties)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SpecialtyRow {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<SpecialtyRow> for Specialty {
    fn from(row: SpecialtyRow) -> Self {
        Self {
            id: SpecialtyId::new(row.id),
            name: row.name,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = specialties)]
pub(crate) struct NewSpecialtyRow<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
}

/// `None` fields are left untouched by Diesel.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = specialties)]
pub(crate) struct SpecialtyChangeset<'a> {
    pub name: Option<&'a str>,
    pub description: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Barbers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = barbers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BarberRow {
    pub id: i32,
    pub name: String,
    pub age: i32,
    pub hire_date: NaiveDate,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<BarberRow> for Barber {
    fn from(row: BarberRow) -> Self {
        Self {
            id: BarberId::new(row.id),
            name: row.name,
            age: row.age,
            hire_date: row.hire_date,
            active: row.active,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = barbers)]
pub(crate) struct NewBarberRow<'a> {
    pub name: &'a str,
    pub age: i32,
    pub hire_date: NaiveDate,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = barbers)]
pub(crate) struct BarberChangeset<'a> {
    pub name: Option<&'a str>,
    pub age: Option<i32>,
    pub hire_date: Option<NaiveDate>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = barber_specialties)]
pub(crate) struct BarberSpecialtyRow {
    pub barber_id: i32,
    pub specialty_id: i32,
}

// ---------------------------------------------------------------------------
// Appointments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = appointments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AppointmentRow {
    pub id: i32,
    pub user_id: i32,
    pub barber_id: i32,
    pub specialty_id: i32,
    pub appointment_date: NaiveDate,
    pub appointment_time: NaiveTime,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AppointmentRow> for Appointment {
    fn from(row: AppointmentRow) -> Self {
        // The CHECK constraint keeps unknown values out; treat one as terminal
        // rather than letting it be cancelled or completed again.
        let status = row.status.parse().unwrap_or_else(|_| {
            warn!(
                appointment_id = row.id,
                status = %row.status,
                "unrecognised appointment status, treating as cancelled"
            );
            AppointmentStatus::Cancelled
        });
        Self {
            id: AppointmentId::new(row.id),
            user_id: UserId::new(row.user_id),
            barber_id: BarberId::new(row.barber_id),
            specialty_id: SpecialtyId::new(row.specialty_id),
            appointment_date: row.appointment_date,
            appointment_time: row.appointment_time,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = appointments)]
pub(crate) struct NewAppointmentRow {
    pub user_id: i32,
    pub barber_id: i32,
    pub specialty_id: i32,
    pub appointment_date: NaiveDate,
    pub appointment_time: NaiveTime,
    pub status: &'static str,
}
