//! Port for appointment persistence.
//!
//! Adapters must guarantee that at most one `scheduled` row exists per
//! `(barber, date, time)`; a losing concurrent insert reports
//! [`AppointmentRepositoryError::SlotTaken`].

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};

use crate::domain::{
    Appointment, AppointmentDetails, AppointmentId, AppointmentListing, AppointmentStatus,
    BarberId, NewAppointment, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by appointment repository adapters.
    pub enum AppointmentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "appointment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "appointment repository query failed: {message}",
        /// Another scheduled appointment already holds the slot.
        SlotTaken => "slot already holds a scheduled appointment",
    }
}

/// Appointment storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Start times of the barber's `scheduled` appointments on `date`.
    async fn booked_times(
        &self,
        barber_id: BarberId,
        date: NaiveDate,
    ) -> Result<Vec<NaiveTime>, AppointmentRepositoryError>;

    /// Whether a `scheduled` appointment already holds the slot.
    async fn is_slot_taken(
        &self,
        barber_id: BarberId,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<bool, AppointmentRepositoryError>;

    /// Insert a new `scheduled` appointment.
    async fn insert(
        &self,
        appointment: &NewAppointment,
    ) -> Result<Appointment, AppointmentRepositoryError>;

    /// Fetch one appointment.
    async fn find_by_id(
        &self,
        id: AppointmentId,
    ) -> Result<Option<Appointment>, AppointmentRepositoryError>;

    /// Move a `scheduled` appointment to `status`, bumping `updated_at`.
    ///
    /// Returns `None` when the row is missing or no longer `scheduled`.
    async fn transition(
        &self,
        id: AppointmentId,
        status: AppointmentStatus,
    ) -> Result<Option<Appointment>, AppointmentRepositoryError>;

    /// A customer's appointments, newest first.
    async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<AppointmentDetails>, AppointmentRepositoryError>;

    /// Administrator listings.
    async fn list(
        &self,
        listing: AppointmentListing,
    ) -> Result<Vec<AppointmentDetails>, AppointmentRepositoryError>;
}
