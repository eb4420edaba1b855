//! Driving ports for booking, lifecycle transitions and listings.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};

use crate::domain::{
    Appointment, AppointmentDetails, AppointmentId, AppointmentStatus, AuthenticatedUser,
    BarberId, Error, SpecialtyId,
};

/// Booking request after transport-level parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookAppointmentRequest {
    pub barber_id: BarberId,
    pub specialty_id: SpecialtyId,
    pub appointment_date: NaiveDate,
    pub appointment_time: NaiveTime,
}

/// Optional filters for the administrator's full listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppointmentFilter {
    pub date: Option<NaiveDate>,
    pub status: Option<AppointmentStatus>,
}

/// Mutating appointment use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppointmentCommand: Send + Sync {
    /// Validate and persist a booking for `caller`.
    async fn book(
        &self,
        caller: &AuthenticatedUser,
        request: BookAppointmentRequest,
    ) -> Result<Appointment, Error>;

    /// Cancel an appointment on behalf of its owner or an administrator.
    async fn cancel(
        &self,
        caller: &AuthenticatedUser,
        id: AppointmentId,
    ) -> Result<Appointment, Error>;

    /// Mark a scheduled appointment as completed (administrators only).
    async fn complete(
        &self,
        caller: &AuthenticatedUser,
        id: AppointmentId,
    ) -> Result<Appointment, Error>;
}

/// Read-only appointment use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppointmentQuery: Send + Sync {
    /// Free start times for a barber on a date, in grid order.
    async fn available_slots(
        &self,
        barber_id: BarberId,
        date: NaiveDate,
    ) -> Result<Vec<NaiveTime>, Error>;

    /// The caller's appointments, newest first.
    async fn my_appointments(
        &self,
        caller: &AuthenticatedUser,
    ) -> Result<Vec<AppointmentDetails>, Error>;

    /// Every appointment, filtered (administrators only).
    async fn all(
        &self,
        caller: &AuthenticatedUser,
        filter: AppointmentFilter,
    ) -> Result<Vec<AppointmentDetails>, Error>;

    /// Scheduled appointments for the shop's current day (administrators only).
    async fn today(&self, caller: &AuthenticatedUser) -> Result<Vec<AppointmentDetails>, Error>;

    /// Scheduled appointments after the current day (administrators only).
    async fn future(&self, caller: &AuthenticatedUser)
    -> Result<Vec<AppointmentDetails>, Error>;
}
