//! Appointment domain service.
//!
//! Implements booking validation, the cancel/complete lifecycle and the
//! availability and listing queries. "Now" is the shop's local wall-clock
//! time, matching the naive date and time columns appointments are stored in.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use mockable::Clock;
use tracing::info;

use crate::domain::access::{self, CancelCapability};
use crate::domain::ports::{
    AppointmentCommand, AppointmentFilter, AppointmentQuery, AppointmentRepository,
    AppointmentRepositoryError, BarberRepository, BarberRepositoryError, BookAppointmentRequest,
};
use crate::domain::schedule;
use crate::domain::{
    Appointment, AppointmentDetails, AppointmentId, AppointmentListing, AppointmentStatus,
    AuthenticatedUser, BarberId, Error, NewAppointment,
};

pub(crate) const SPECIALTY_MISMATCH: &str = "Barbeiro não possui essa especialidade";
pub(crate) const OUTSIDE_WORKING_HOURS: &str = "Horário fora do expediente (8h-18h)";
pub(crate) const OFF_SLOT_GRID: &str = "Horário deve ser em intervalos de 30 minutos";
pub(crate) const SLOT_TAKEN: &str = "Horário já ocupado para este barbeiro";
pub(crate) const IN_THE_PAST: &str = "Não é possível agendar no passado";
pub(crate) const APPOINTMENT_NOT_FOUND: &str = "Agendamento não encontrado";
pub(crate) const NOT_OWNER: &str = "Não autorizado";
pub(crate) const NOT_CANCELLABLE: &str = "Agendamento não pode ser cancelado";
pub(crate) const NOTICE_TOO_SHORT: &str =
    "Cancelamento deve ser feito com pelo menos 2 horas de antecedência";
pub(crate) const NOT_FOUND_OR_FINISHED: &str = "Agendamento não encontrado ou já finalizado";

/// Appointment service implementing the appointment driving ports.
#[derive(Clone)]
pub struct AppointmentService<A, B> {
    appointments: Arc<A>,
    barbers: Arc<B>,
    clock: Arc<dyn Clock>,
}

impl<A, B> AppointmentService<A, B> {
    /// Create a new service over the given repositories.
    pub fn new(appointments: Arc<A>, barbers: Arc<B>, clock: Arc<dyn Clock>) -> Self {
        Self {
            appointments,
            barbers,
            clock,
        }
    }

    fn now(&self) -> NaiveDateTime {
        self.clock.local().naive_local()
    }

    fn local_date(&self) -> NaiveDate {
        self.now().date()
    }
}

pub(crate) fn map_appointment_error(error: AppointmentRepositoryError) -> Error {
    match error {
        AppointmentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("appointment repository unavailable: {message}"))
        }
        AppointmentRepositoryError::Query { message } => {
            Error::internal(format!("appointment repository error: {message}"))
        }
        AppointmentRepositoryError::SlotTaken => Error::conflict(SLOT_TAKEN),
    }
}

pub(crate) fn map_barber_error(error: BarberRepositoryError) -> Error {
    match error {
        BarberRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("barber repository unavailable: {message}"))
        }
        BarberRepositoryError::Query { message } => {
            Error::internal(format!("barber repository error: {message}"))
        }
        BarberRepositoryError::InUse => Error::conflict(super::barber_service::BARBER_IN_USE),
    }
}

impl<A, B> AppointmentService<A, B>
where
    A: AppointmentRepository,
    B: BarberRepository,
{
    /// Check the booking rules in order, stopping at the first failure.
    async fn validate_booking(
        &self,
        barber_id: BarberId,
        request: &BookAppointmentRequest,
    ) -> Result<(), Error> {
        let offers = self
            .barbers
            .offers_specialty(barber_id, request.specialty_id)
            .await
            .map_err(map_barber_error)?;
        if !offers {
            return Err(Error::invalid_request(SPECIALTY_MISMATCH));
        }

        let time = request.appointment_time;
        if !schedule::is_within_working_hours(time) {
            return Err(Error::invalid_request(OUTSIDE_WORKING_HOURS));
        }
        if !schedule::is_on_slot_grid(time) {
            return Err(Error::invalid_request(OFF_SLOT_GRID));
        }

        let taken = self
            .appointments
            .is_slot_taken(barber_id, request.appointment_date, time)
            .await
            .map_err(map_appointment_error)?;
        if taken {
            return Err(Error::conflict(SLOT_TAKEN));
        }

        if request.appointment_date.and_time(time) <= self.now() {
            return Err(Error::invalid_request(IN_THE_PAST));
        }
        Ok(())
    }

    async fn fetch(&self, id: AppointmentId) -> Result<Appointment, Error> {
        self.appointments
            .find_by_id(id)
            .await
            .map_err(map_appointment_error)?
            .ok_or_else(|| Error::not_found(APPOINTMENT_NOT_FOUND))
    }

    async fn listing(&self, listing: AppointmentListing) -> Result<Vec<AppointmentDetails>, Error> {
        self.appointments
            .list(listing)
            .await
            .map_err(map_appointment_error)
    }
}

#[async_trait]
impl<A, B> AppointmentCommand for AppointmentService<A, B>
where
    A: AppointmentRepository,
    B: BarberRepository,
{
    async fn book(
        &self,
        caller: &AuthenticatedUser,
        request: BookAppointmentRequest,
    ) -> Result<Appointment, Error> {
        self.validate_booking(request.barber_id, &request).await?;

        let new_appointment = NewAppointment {
            user_id: caller.user_id,
            barber_id: request.barber_id,
            specialty_id: request.specialty_id,
            appointment_date: request.appointment_date,
            appointment_time: request.appointment_time,
        };
        let appointment = self
            .appointments
            .insert(&new_appointment)
            .await
            .map_err(map_appointment_error)?;

        info!(
            appointment_id = %appointment.id,
            barber_id = %appointment.barber_id,
            user_id = %appointment.user_id,
            "appointment booked"
        );
        Ok(appointment)
    }

    async fn cancel(
        &self,
        caller: &AuthenticatedUser,
        id: AppointmentId,
    ) -> Result<Appointment, Error> {
        let appointment = self.fetch(id).await?;

        let capability = access::cancel_capability(caller, &appointment);
        if capability == CancelCapability::Denied {
            return Err(Error::forbidden(NOT_OWNER));
        }
        if !appointment.is_scheduled() {
            return Err(Error::invalid_request(NOT_CANCELLABLE));
        }
        if capability.requires_notice()
            && !access::meets_cancellation_notice(appointment.starts_at(), self.now())
        {
            return Err(Error::invalid_request(NOTICE_TOO_SHORT));
        }

        // A concurrent transition between the read and this update leaves
        // the row terminal, which is reported like any other terminal row.
        let cancelled = self
            .appointments
            .transition(id, AppointmentStatus::Cancelled)
            .await
            .map_err(map_appointment_error)?
            .ok_or_else(|| Error::invalid_request(NOT_CANCELLABLE))?;

        info!(
            appointment_id = %id,
            by_admin = caller.is_admin,
            "appointment cancelled"
        );
        Ok(cancelled)
    }

    async fn complete(
        &self,
        caller: &AuthenticatedUser,
        id: AppointmentId,
    ) -> Result<Appointment, Error> {
        access::require_admin(caller)?;
        let completed = self
            .appointments
            .transition(id, AppointmentStatus::Completed)
            .await
            .map_err(map_appointment_error)?
            .ok_or_else(|| Error::not_found(NOT_FOUND_OR_FINISHED))?;
        info!(appointment_id = %id, "appointment completed");
        Ok(completed)
    }
}

#[async_trait]
impl<A, B> AppointmentQuery for AppointmentService<A, B>
where
    A: AppointmentRepository,
    B: BarberRepository,
{
    async fn available_slots(
        &self,
        barber_id: BarberId,
        date: NaiveDate,
    ) -> Result<Vec<NaiveTime>, Error> {
        let booked = self
            .appointments
            .booked_times(barber_id, date)
            .await
            .map_err(map_appointment_error)?;
        Ok(schedule::available_slots(&booked))
    }

    async fn my_appointments(
        &self,
        caller: &AuthenticatedUser,
    ) -> Result<Vec<AppointmentDetails>, Error> {
        self.appointments
            .list_for_user(caller.user_id)
            .await
            .map_err(map_appointment_error)
    }

    async fn all(
        &self,
        caller: &AuthenticatedUser,
        filter: AppointmentFilter,
    ) -> Result<Vec<AppointmentDetails>, Error> {
        access::require_admin(caller)?;
        self.listing(AppointmentListing::All {
            date: filter.date,
            status: filter.status,
        })
        .await
    }

    async fn today(&self, caller: &AuthenticatedUser) -> Result<Vec<AppointmentDetails>, Error> {
        access::require_admin(caller)?;
        self.listing(AppointmentListing::ScheduledOn(self.local_date()))
            .await
    }

    async fn future(&self, caller: &AuthenticatedUser) -> Result<Vec<AppointmentDetails>, Error> {
        access::require_admin(caller)?;
        self.listing(AppointmentListing::ScheduledAfter(self.local_date()))
            .await
    }
}

#[cfg(test)]
#[path = "appointment_service_tests.rs"]
mod tests;
