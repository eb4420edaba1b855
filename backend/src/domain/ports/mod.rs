//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`*Command`, `*Query`, [`AccountService`]) are implemented by
//! domain services and called by inbound adapters. Driven ports
//! (`*Repository`, [`PasswordHasher`], [`TokenService`]) are implemented by
//! outbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_service;
mod appointment_repository;
mod appointment_service;
mod barber_repository;
mod catalogue_service;
mod credentials;
mod specialty_repository;
mod user_repository;

#[cfg(test)]
pub use account_service::MockAccountService;
pub use account_service::{AccountService, AdminBootstrap};
#[cfg(test)]
pub use appointment_repository::MockAppointmentRepository;
pub use appointment_repository::{AppointmentRepository, AppointmentRepositoryError};
#[cfg(test)]
pub use appointment_service::{MockAppointmentCommand, MockAppointmentQuery};
pub use appointment_service::{
    AppointmentCommand, AppointmentFilter, AppointmentQuery, BookAppointmentRequest,
};
#[cfg(test)]
pub use barber_repository::MockBarberRepository;
pub use barber_repository::{BarberRepository, BarberRepositoryError};
#[cfg(test)]
pub use catalogue_service::{
    MockBarberCommand, MockBarberQuery, MockSpecialtyCommand, MockSpecialtyQuery,
};
pub use catalogue_service::{BarberCommand, BarberQuery, SpecialtyCommand, SpecialtyQuery};
#[cfg(test)]
pub use credentials::{MockPasswordHasher, MockTokenService};
pub use credentials::{PasswordHasher, PasswordHasherError, TokenService, TokenServiceError};
#[cfg(test)]
pub use specialty_repository::MockSpecialtyRepository;
pub use specialty_repository::{SpecialtyRepository, SpecialtyRepositoryError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
