//! Driving ports for barber and specialty management.

use async_trait::async_trait;

use crate::domain::{
    AuthenticatedUser, Barber, BarberId, BarberPatch, BarberProfile, Error, NewBarber,
    NewSpecialty, Specialty, SpecialtyId, SpecialtyPatch,
};

/// Public barber lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BarberQuery: Send + Sync {
    /// Active barbers ordered by name.
    async fn list_active(&self) -> Result<Vec<Barber>, Error>;

    /// A barber with their specialties.
    async fn profile(&self, id: BarberId) -> Result<BarberProfile, Error>;

    /// Active barbers offering a specialty.
    async fn by_specialty(&self, specialty_id: SpecialtyId) -> Result<Vec<Barber>, Error>;

    /// A barber's specialties (administrators only).
    async fn specialties(
        &self,
        caller: &AuthenticatedUser,
        id: BarberId,
    ) -> Result<Vec<Specialty>, Error>;
}

/// Administrator barber management.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BarberCommand: Send + Sync {
    /// Create a barber with an initial specialty set.
    async fn create(&self, caller: &AuthenticatedUser, barber: NewBarber) -> Result<Barber, Error>;

    /// Partially update a barber.
    async fn update(
        &self,
        caller: &AuthenticatedUser,
        id: BarberId,
        patch: BarberPatch,
    ) -> Result<Barber, Error>;

    /// Delete a barber with no appointments.
    async fn delete(&self, caller: &AuthenticatedUser, id: BarberId) -> Result<Barber, Error>;

    /// Replace a barber's specialty set.
    async fn replace_specialties(
        &self,
        caller: &AuthenticatedUser,
        id: BarberId,
        specialty_ids: Vec<SpecialtyId>,
    ) -> Result<Vec<Specialty>, Error>;
}

/// Public specialty lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpecialtyQuery: Send + Sync {
    /// All specialties ordered by name.
    async fn list(&self) -> Result<Vec<Specialty>, Error>;

    /// One specialty.
    async fn get(&self, id: SpecialtyId) -> Result<Specialty, Error>;
}

/// Administrator specialty management.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpecialtyCommand: Send + Sync {
    /// Create a specialty with a unique name.
    async fn create(
        &self,
        caller: &AuthenticatedUser,
        specialty: NewSpecialty,
    ) -> Result<Specialty, Error>;

    /// Partially update a specialty.
    async fn update(
        &self,
        caller: &AuthenticatedUser,
        id: SpecialtyId,
        patch: SpecialtyPatch,
    ) -> Result<Specialty, Error>;

    /// Delete an unused specialty.
    async fn delete(&self, caller: &AuthenticatedUser, id: SpecialtyId)
    -> Result<Specialty, Error>;
}
