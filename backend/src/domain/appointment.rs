//! Appointment aggregate and its lifecycle states.
//!
//! An appointment is created `scheduled` and moves exactly once to either
//! `cancelled` or `completed`. Rows are never deleted; terminal rows simply
//! stop occupying their slot.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use super::{AppointmentId, BarberId, SpecialtyId, UserId};

/// Lifecycle state of an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppointmentStatus {
    /// Booked and occupying its slot.
    Scheduled,
    /// Cancelled by the customer or an administrator.
    Cancelled,
    /// Marked as served by an administrator.
    Completed,
}

impl AppointmentStatus {
    /// Wire and storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    /// Terminal states accept no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Scheduled)
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when parsing an unknown status string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown appointment status: {0}")]
pub struct ParseStatusError(pub String);

impl FromStr for AppointmentStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(Self::Scheduled),
            "cancelled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            other => Err(ParseStatusError(other.to_owned())),
        }
    }
}

/// Persisted appointment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appointment {
    pub id: AppointmentId,
    pub user_id: UserId,
    pub barber_id: BarberId,
    pub specialty_id: SpecialtyId,
    pub appointment_date: NaiveDate,
    pub appointment_time: NaiveTime,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    /// Shop-local wall-clock instant the appointment starts.
    #[must_use]
    pub fn starts_at(&self) -> NaiveDateTime {
        self.appointment_date.and_time(self.appointment_time)
    }

    /// True while the appointment still occupies its slot.
    #[must_use]
    pub fn is_scheduled(&self) -> bool {
        self.status == AppointmentStatus::Scheduled
    }
}

/// Appointment joined with the display data used by listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentDetails {
    pub appointment: Appointment,
    pub barber_name: String,
    pub specialty_name: String,
    pub user_name: String,
    pub user_email: String,
}

/// Validated booking ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAppointment {
    pub user_id: UserId,
    pub barber_id: BarberId,
    pub specialty_id: SpecialtyId,
    pub appointment_date: NaiveDate,
    pub appointment_time: NaiveTime,
}

/// Selection applied to administrator listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentListing {
    /// Every appointment, optionally narrowed by date and status, ordered by
    /// date then time.
    All {
        date: Option<NaiveDate>,
        status: Option<AppointmentStatus>,
    },
    /// Scheduled appointments on the given day, ordered by time.
    ScheduledOn(NaiveDate),
    /// Scheduled appointments strictly after the given day, ordered by date
    /// then time.
    ScheduledAfter(NaiveDate),
}
