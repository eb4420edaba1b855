//! Port for specialty persistence.

use async_trait::async_trait;

use crate::domain::{NewSpecialty, Specialty, SpecialtyId, SpecialtyPatch};

use super::define_port_error;

define_port_error! {
    /// Errors raised by specialty repository adapters.
    pub enum SpecialtyRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "specialty repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "specialty repository query failed: {message}",
        /// Another specialty already uses the name.
        DuplicateName => "specialty name already exists",
        /// Barbers or appointments still reference the specialty.
        InUse => "specialty is referenced by barbers or appointments",
    }
}

/// Specialty storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpecialtyRepository: Send + Sync {
    /// All specialties ordered by name.
    async fn list(&self) -> Result<Vec<Specialty>, SpecialtyRepositoryError>;

    /// Fetch one specialty.
    async fn find_by_id(
        &self,
        id: SpecialtyId,
    ) -> Result<Option<Specialty>, SpecialtyRepositoryError>;

    /// The subset of `ids` with no stored specialty.
    async fn missing_ids(
        &self,
        ids: &[SpecialtyId],
    ) -> Result<Vec<SpecialtyId>, SpecialtyRepositoryError>;

    /// Insert a specialty.
    async fn create(&self, specialty: &NewSpecialty) -> Result<Specialty, SpecialtyRepositoryError>;

    /// Apply a partial update. `None` when the specialty is missing.
    async fn update(
        &self,
        id: SpecialtyId,
        patch: &SpecialtyPatch,
    ) -> Result<Option<Specialty>, SpecialtyRepositoryError>;

    /// Delete a specialty. `None` when missing.
    async fn delete(&self, id: SpecialtyId) -> Result<Option<Specialty>, SpecialtyRepositoryError>;
}
