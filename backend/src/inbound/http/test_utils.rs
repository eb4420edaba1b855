//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::web;

use crate::domain::AuthenticatedUser;
use crate::domain::ports::{
    MockAccountService, MockAppointmentCommand, MockAppointmentQuery, MockBarberCommand,
    MockBarberQuery, MockSpecialtyCommand, MockSpecialtyQuery,
};
pub(crate) use crate::domain::test_support::{
    admin, appointment, customer, date, fixture_timestamp, time,
};

use super::state::HttpState;

/// Header value accepted by [`TestPorts::authenticate_as`].
pub(crate) const BEARER: &str = "Bearer test-token";

/// Mocked driving ports; set expectations, then convert into state.
#[derive(Default)]
pub(crate) struct TestPorts {
    pub(crate) accounts: MockAccountService,
    pub(crate) appointments: MockAppointmentCommand,
    pub(crate) appointments_query: MockAppointmentQuery,
    pub(crate) barbers: MockBarberCommand,
    pub(crate) barbers_query: MockBarberQuery,
    pub(crate) specialties: MockSpecialtyCommand,
    pub(crate) specialties_query: MockSpecialtyQuery,
}

impl TestPorts {
    /// Resolve every bearer token to `user`.
    pub(crate) fn authenticate_as(mut self, user: AuthenticatedUser) -> Self {
        self.accounts
            .expect_authenticate()
            .returning(move |_| Ok(user.clone()));
        self
    }

    pub(crate) fn into_data(self) -> web::Data<HttpState> {
        web::Data::new(HttpState {
            accounts: Arc::new(self.accounts),
            appointments: Arc::new(self.appointments),
            appointments_query: Arc::new(self.appointments_query),
            barbers: Arc::new(self.barbers),
            barbers_query: Arc::new(self.barbers_query),
            specialties: Arc::new(self.specialties),
            specialties_query: Arc::new(self.specialties_query),
        })
    }
}
