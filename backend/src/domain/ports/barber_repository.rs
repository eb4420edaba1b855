//! Port for barber persistence, including the barber/specialty link table.

use async_trait::async_trait;

use crate::domain::{Barber, BarberId, BarberPatch, NewBarber, Specialty, SpecialtyId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by barber repository adapters.
    pub enum BarberRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "barber repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "barber repository query failed: {message}",
        /// The barber is still referenced by appointments.
        InUse => "barber is referenced by appointments",
    }
}

/// Barber storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BarberRepository: Send + Sync {
    /// Active barbers ordered by name.
    async fn list_active(&self) -> Result<Vec<Barber>, BarberRepositoryError>;

    /// Fetch one barber regardless of the active flag.
    async fn find_by_id(&self, id: BarberId) -> Result<Option<Barber>, BarberRepositoryError>;

    /// Specialties offered by the barber, ordered by name.
    async fn specialties_of(&self, id: BarberId) -> Result<Vec<Specialty>, BarberRepositoryError>;

    /// Active barbers offering the specialty, ordered by name.
    async fn list_by_specialty(
        &self,
        specialty_id: SpecialtyId,
    ) -> Result<Vec<Barber>, BarberRepositoryError>;

    /// Whether the barber offers the specialty.
    async fn offers_specialty(
        &self,
        barber_id: BarberId,
        specialty_id: SpecialtyId,
    ) -> Result<bool, BarberRepositoryError>;

    /// Insert a barber and link its specialties atomically.
    async fn create(&self, barber: &NewBarber) -> Result<Barber, BarberRepositoryError>;

    /// Apply a partial update. `None` when the barber is missing.
    async fn update(
        &self,
        id: BarberId,
        patch: &BarberPatch,
    ) -> Result<Option<Barber>, BarberRepositoryError>;

    /// Delete a barber. `None` when missing; [`BarberRepositoryError::InUse`]
    /// when appointments reference it.
    async fn delete(&self, id: BarberId) -> Result<Option<Barber>, BarberRepositoryError>;

    /// Replace the barber's specialty set atomically and return the new set.
    async fn replace_specialties(
        &self,
        id: BarberId,
        specialty_ids: &[SpecialtyId],
    ) -> Result<Vec<Specialty>, BarberRepositoryError>;
}
