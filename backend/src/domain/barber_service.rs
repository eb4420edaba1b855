//! Barber catalogue service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::access::require_admin;
use crate::domain::appointment_service::map_barber_error;
use crate::domain::ports::{BarberCommand, BarberQuery, BarberRepository, SpecialtyRepository};
use crate::domain::specialty_service::map_specialty_error;
use crate::domain::{
    AuthenticatedUser, Barber, BarberId, BarberPatch, BarberProfile, Error, NewBarber, Specialty,
    SpecialtyId, is_valid_barber_age, unique_specialty_ids,
};

pub(crate) const BARBER_NOT_FOUND: &str = "Barbeiro não encontrado";
pub(crate) const BARBER_IN_USE: &str =
    "Não é possível deletar este barbeiro pois ele possui agendamentos";
pub(crate) const BARBER_FIELDS_REQUIRED: &str = "Nome, idade e data de contratação são obrigatórios";
pub(crate) const INVALID_AGE: &str = "Idade inválida";
pub(crate) const UNKNOWN_SPECIALTIES: &str = "Uma ou mais especialidades não existem";

/// Barber service implementing the barber driving ports.
#[derive(Clone)]
pub struct BarberService<B, S> {
    barbers: Arc<B>,
    specialties: Arc<S>,
}

impl<B, S> BarberService<B, S> {
    /// Create a new service over the given repositories.
    pub fn new(barbers: Arc<B>, specialties: Arc<S>) -> Self {
        Self {
            barbers,
            specialties,
        }
    }
}

impl<B, S> BarberService<B, S>
where
    B: BarberRepository,
    S: SpecialtyRepository,
{
    async fn existing(&self, id: BarberId) -> Result<Barber, Error> {
        self.barbers
            .find_by_id(id)
            .await
            .map_err(map_barber_error)?
            .ok_or_else(|| Error::not_found(BARBER_NOT_FOUND))
    }

    /// Collapse duplicates and reject ids with no stored specialty.
    async fn known_specialties(&self, ids: &[SpecialtyId]) -> Result<Vec<SpecialtyId>, Error> {
        let unique = unique_specialty_ids(ids);
        if unique.is_empty() {
            return Ok(unique);
        }
        let missing = self
            .specialties
            .missing_ids(&unique)
            .await
            .map_err(map_specialty_error)?;
        if missing.is_empty() {
            Ok(unique)
        } else {
            Err(Error::invalid_request(UNKNOWN_SPECIALTIES))
        }
    }
}

fn validate_new_barber(barber: &NewBarber) -> Result<String, Error> {
    let name = barber.name.trim();
    if name.is_empty() {
        return Err(Error::invalid_request(BARBER_FIELDS_REQUIRED));
    }
    if !is_valid_barber_age(barber.age) {
        return Err(Error::invalid_request(INVALID_AGE));
    }
    Ok(name.to_owned())
}

fn validate_patch(mut patch: BarberPatch) -> Result<BarberPatch, Error> {
    if let Some(name) = patch.name.as_deref() {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(Error::invalid_request(BARBER_FIELDS_REQUIRED));
        }
        patch.name = Some(trimmed.to_owned());
    }
    if patch.age.is_some_and(|age| !is_valid_barber_age(age)) {
        return Err(Error::invalid_request(INVALID_AGE));
    }
    Ok(patch)
}

#[async_trait]
impl<B, S> BarberQuery for BarberService<B, S>
where
    B: BarberRepository,
    S: SpecialtyRepository,
{
    async fn list_active(&self) -> Result<Vec<Barber>, Error> {
        self.barbers.list_active().await.map_err(map_barber_error)
    }

    async fn profile(&self, id: BarberId) -> Result<BarberProfile, Error> {
        let barber = self.existing(id).await?;
        let specialties = self
            .barbers
            .specialties_of(id)
            .await
            .map_err(map_barber_error)?;
        Ok(BarberProfile {
            barber,
            specialties,
        })
    }

    async fn by_specialty(&self, specialty_id: SpecialtyId) -> Result<Vec<Barber>, Error> {
        self.barbers
            .list_by_specialty(specialty_id)
            .await
            .map_err(map_barber_error)
    }

    async fn specialties(
        &self,
        caller: &AuthenticatedUser,
        id: BarberId,
    ) -> Result<Vec<Specialty>, Error> {
        require_admin(caller)?;
        self.existing(id).await?;
        self.barbers
            .specialties_of(id)
            .await
            .map_err(map_barber_error)
    }
}

#[async_trait]
impl<B, S> BarberCommand for BarberService<B, S>
where
    B: BarberRepository,
    S: SpecialtyRepository,
{
    async fn create(&self, caller: &AuthenticatedUser, barber: NewBarber) -> Result<Barber, Error> {
        require_admin(caller)?;
        let name = validate_new_barber(&barber)?;
        let specialty_ids = self.known_specialties(&barber.specialty_ids).await?;
        let created = self
            .barbers
            .create(&NewBarber {
                name,
                specialty_ids,
                ..barber
            })
            .await
            .map_err(map_barber_error)?;
        info!(barber_id = %created.id, "barber created");
        Ok(created)
    }

    async fn update(
        &self,
        caller: &AuthenticatedUser,
        id: BarberId,
        patch: BarberPatch,
    ) -> Result<Barber, Error> {
        require_admin(caller)?;
        let patch = validate_patch(patch)?;
        self.barbers
            .update(id, &patch)
            .await
            .map_err(map_barber_error)?
            .ok_or_else(|| Error::not_found(BARBER_NOT_FOUND))
    }

    async fn delete(&self, caller: &AuthenticatedUser, id: BarberId) -> Result<Barber, Error> {
        require_admin(caller)?;
        let deleted = self
            .barbers
            .delete(id)
            .await
            .map_err(map_barber_error)?
            .ok_or_else(|| Error::not_found(BARBER_NOT_FOUND))?;
        info!(barber_id = %id, "barber deleted");
        Ok(deleted)
    }

    async fn replace_specialties(
        &self,
        caller: &AuthenticatedUser,
        id: BarberId,
        specialty_ids: Vec<SpecialtyId>,
    ) -> Result<Vec<Specialty>, Error> {
        require_admin(caller)?;
        self.existing(id).await?;
        let specialty_ids = self.known_specialties(&specialty_ids).await?;
        self.barbers
            .replace_specialties(id, &specialty_ids)
            .await
            .map_err(map_barber_error)
    }
}

#[cfg(test)]
#[path = "barber_service_tests.rs"]
mod tests;
