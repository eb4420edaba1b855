//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only ever see driving
//! ports, so they can be exercised against mocks without any I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    AccountService, AppointmentCommand, AppointmentQuery, AppointmentRepository, BarberCommand,
    BarberQuery, BarberRepository, PasswordHasher, SpecialtyCommand, SpecialtyQuery,
    SpecialtyRepository, TokenService, UserRepository,
};
use crate::domain::{AccountServiceImpl, AppointmentService, BarberService, SpecialtyService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Registration, login and bearer token resolution.
    pub accounts: Arc<dyn AccountService>,
    /// Booking, cancellation and completion.
    pub appointments: Arc<dyn AppointmentCommand>,
    /// Availability and appointment listings.
    pub appointments_query: Arc<dyn AppointmentQuery>,
    /// Barber management.
    pub barbers: Arc<dyn BarberCommand>,
    /// Barber lookups.
    pub barbers_query: Arc<dyn BarberQuery>,
    /// Specialty management.
    pub specialties: Arc<dyn SpecialtyCommand>,
    /// Specialty lookups.
    pub specialties_query: Arc<dyn SpecialtyQuery>,
}

/// Driven adapters the domain services are built over.
pub struct HttpStateAdapters<U, S, B, A, H, T> {
    pub users: Arc<U>,
    pub specialties: Arc<S>,
    pub barbers: Arc<B>,
    pub appointments: Arc<A>,
    pub hasher: Arc<H>,
    pub tokens: Arc<T>,
    /// Shop-local clock used for booking rules and listings.
    pub clock: Arc<dyn Clock>,
}

impl HttpState {
    /// Build the domain services over `adapters` and expose them as ports.
    pub fn from_adapters<U, S, B, A, H, T>(adapters: HttpStateAdapters<U, S, B, A, H, T>) -> Self
    where
        U: UserRepository + 'static,
        S: SpecialtyRepository + 'static,
        B: BarberRepository + 'static,
        A: AppointmentRepository + 'static,
        H: PasswordHasher + 'static,
        T: TokenService + 'static,
    {
        let HttpStateAdapters {
            users,
            specialties,
            barbers,
            appointments,
            hasher,
            tokens,
            clock,
        } = adapters;

        let accounts = Arc::new(AccountServiceImpl::new(users, hasher, tokens));
        let appointment_service = Arc::new(AppointmentService::new(
            appointments,
            Arc::clone(&barbers),
            clock,
        ));
        let barber_service = Arc::new(BarberService::new(barbers, Arc::clone(&specialties)));
        let specialty_service = Arc::new(SpecialtyService::new(specialties));

        Self {
            accounts,
            appointments: appointment_service.clone(),
            appointments_query: appointment_service,
            barbers: barber_service.clone(),
            barbers_query: barber_service,
            specialties: specialty_service.clone(),
            specialties_query: specialty_service,
        }
    }
}
