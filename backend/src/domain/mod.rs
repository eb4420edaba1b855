//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed scheduling entities and the services that
//! enforce booking rules. Nothing here knows about HTTP, SQL, bcrypt or JWT;
//! those live behind the traits in [`ports`].
//!
//! The slot grid lives in [`schedule`]; the role checks for cancelling and
//! admin operations live in [`access`].

pub mod access;
mod account;
mod account_service;
mod appointment;
mod appointment_service;
mod barber;
mod barber_service;
pub mod error;
mod ids;
pub mod ports;
pub mod schedule;
mod specialty_service;
#[cfg(test)]
pub(crate) mod test_support;
pub mod trace_id;

pub use self::account::{
    AuthSession, AuthenticatedUser, LoginCredentials, MIN_PASSWORD_LEN, NewUser, Registration,
    StoredCredentials, User, normalise_email,
};
pub use self::account_service::AccountServiceImpl;
pub use self::appointment::{
    Appointment, AppointmentDetails, AppointmentListing, AppointmentStatus, NewAppointment,
    ParseStatusError,
};
pub use self::appointment_service::AppointmentService;
pub use self::barber::{
    Barber, BarberPatch, BarberProfile, MAX_BARBER_AGE, MIN_BARBER_AGE, NewBarber, NewSpecialty,
    Specialty, SpecialtyPatch, is_valid_barber_age, unique_specialty_ids,
};
pub use self::barber_service::BarberService;
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::ids::{AppointmentId, BarberId, SpecialtyId, UserId};
pub use self::specialty_service::SpecialtyService;
pub use self::trace_id::TraceId;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use clickbeard::domain::{ApiResult, Error, ErrorCode};
///
/// fn guarded() -> ApiResult<()> {
///     Err(Error::forbidden("Acesso negado"))
/// }
/// assert_eq!(guarded().unwrap_err().code(), ErrorCode::Forbidden);
/// ```
pub type ApiResult<T> = Result<T, Error>;
