//! Capability decisions for appointment mutations.
//!
//! Handlers never branch on roles themselves. They ask this module what the
//! caller may do and act on the returned decision.

use chrono::{NaiveDateTime, TimeDelta};

use super::{Appointment, AuthenticatedUser, Error};

/// Minimum notice a customer must give to cancel, in hours.
pub const CANCELLATION_NOTICE_HOURS: i64 = 2;

pub(crate) const ADMIN_ONLY_MESSAGE: &str = "Acesso negado. Apenas administradores.";

/// What a caller may do to a specific appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelCapability {
    /// The caller neither owns the appointment nor administers the shop.
    Denied,
    /// The owning customer; subject to the notice period.
    Owner,
    /// An administrator; may cancel at any time.
    Administrator,
}

impl CancelCapability {
    /// Whether the notice period applies to this caller.
    #[must_use]
    pub const fn requires_notice(self) -> bool {
        matches!(self, Self::Owner)
    }
}

/// Decide how `caller` may cancel `appointment`.
///
/// # Examples
/// ```
/// use chrono::{NaiveDate, NaiveTime, Utc};
/// use clickbeard::domain::access::{cancel_capability, CancelCapability};
/// use clickbeard::domain::{
///     Appointment, AppointmentId, AppointmentStatus, AuthenticatedUser, BarberId, SpecialtyId,
///     UserId,
/// };
///
/// let appointment = Appointment {
///     id: AppointmentId::new(1),
///     user_id: UserId::new(2),
///     barber_id: BarberId::new(1),
///     specialty_id: SpecialtyId::new(1),
///     appointment_date: NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
///     appointment_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
///     status: AppointmentStatus::Scheduled,
///     created_at: Utc::now(),
///     updated_at: Utc::now(),
/// };
/// let stranger = AuthenticatedUser { user_id: UserId::new(9), email: "x@y.z".into(), is_admin: false };
/// assert_eq!(cancel_capability(&stranger, &appointment), CancelCapability::Denied);
/// ```
#[must_use]
pub fn cancel_capability(caller: &AuthenticatedUser, appointment: &Appointment) -> CancelCapability {
    if caller.is_admin {
        CancelCapability::Administrator
    } else if caller.user_id == appointment.user_id {
        CancelCapability::Owner
    } else {
        CancelCapability::Denied
    }
}

/// True when `starts_at` is at least the notice period after `now`.
#[must_use]
pub fn meets_cancellation_notice(starts_at: NaiveDateTime, now: NaiveDateTime) -> bool {
    starts_at - now >= TimeDelta::hours(CANCELLATION_NOTICE_HOURS)
}

/// Reject callers without the administrator flag.
///
/// # Errors
/// Returns a forbidden error for non-administrators.
pub fn require_admin(caller: &AuthenticatedUser) -> Result<(), Error> {
    if caller.is_admin {
        Ok(())
    } else {
        Err(Error::forbidden(ADMIN_ONLY_MESSAGE))
    }
}
