//! Specialty catalogue service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::access::require_admin;
use crate::domain::ports::{
    SpecialtyCommand, SpecialtyQuery, SpecialtyRepository, SpecialtyRepositoryError,
};
use crate::domain::{
    AuthenticatedUser, Error, NewSpecialty, Specialty, SpecialtyId, SpecialtyPatch,
};

pub(crate) const SPECIALTY_NOT_FOUND: &str = "Especialidade não encontrada";
pub(crate) const SPECIALTY_EXISTS: &str = "Especialidade já existe";
pub(crate) const SPECIALTY_IN_USE: &str =
    "Não é possível deletar esta especialidade pois ela está sendo utilizada";
pub(crate) const NAME_REQUIRED: &str = "Nome é obrigatório";
pub(crate) const EMPTY_PATCH: &str = "Pelo menos um campo deve ser fornecido";

pub(crate) fn map_specialty_error(error: SpecialtyRepositoryError) -> Error {
    match error {
        SpecialtyRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("specialty repository unavailable: {message}"))
        }
        SpecialtyRepositoryError::Query { message } => {
            Error::internal(format!("specialty repository error: {message}"))
        }
        SpecialtyRepositoryError::DuplicateName => Error::conflict(SPECIALTY_EXISTS),
        SpecialtyRepositoryError::InUse => Error::conflict(SPECIALTY_IN_USE),
    }
}

fn required_name(raw: &str) -> Result<String, Error> {
    let name = raw.trim();
    if name.is_empty() {
        Err(Error::invalid_request(NAME_REQUIRED))
    } else {
        Ok(name.to_owned())
    }
}

/// Specialty service implementing the specialty driving ports.
#[derive(Clone)]
pub struct SpecialtyService<S> {
    specialties: Arc<S>,
}

impl<S> SpecialtyService<S> {
    /// Create a new service over the given repository.
    pub fn new(specialties: Arc<S>) -> Self {
        Self { specialties }
    }
}

#[async_trait]
impl<S> SpecialtyQuery for SpecialtyService<S>
where
    S: SpecialtyRepository,
{
    async fn list(&self) -> Result<Vec<Specialty>, Error> {
        self.specialties.list().await.map_err(map_specialty_error)
    }

    async fn get(&self, id: SpecialtyId) -> Result<Specialty, Error> {
        self.specialties
            .find_by_id(id)
            .await
            .map_err(map_specialty_error)?
            .ok_or_else(|| Error::not_found(SPECIALTY_NOT_FOUND))
    }
}

#[async_trait]
impl<S> SpecialtyCommand for SpecialtyService<S>
where
    S: SpecialtyRepository,
{
    async fn create(
        &self,
        caller: &AuthenticatedUser,
        specialty: NewSpecialty,
    ) -> Result<Specialty, Error> {
        require_admin(caller)?;
        let specialty = NewSpecialty {
            name: required_name(&specialty.name)?,
            description: specialty.description,
        };
        let created = self
            .specialties
            .create(&specialty)
            .await
            .map_err(map_specialty_error)?;
        info!(specialty_id = %created.id, "specialty created");
        Ok(created)
    }

    async fn update(
        &self,
        caller: &AuthenticatedUser,
        id: SpecialtyId,
        patch: SpecialtyPatch,
    ) -> Result<Specialty, Error> {
        require_admin(caller)?;
        if patch.is_empty() {
            return Err(Error::invalid_request(EMPTY_PATCH));
        }
        let patch = SpecialtyPatch {
            name: patch.name.as_deref().map(required_name).transpose()?,
            description: patch.description,
        };
        self.specialties
            .update(id, &patch)
            .await
            .map_err(map_specialty_error)?
            .ok_or_else(|| Error::not_found(SPECIALTY_NOT_FOUND))
    }

    async fn delete(
        &self,
        caller: &AuthenticatedUser,
        id: SpecialtyId,
    ) -> Result<Specialty, Error> {
        require_admin(caller)?;
        let deleted = self
            .specialties
            .delete(id)
            .await
            .map_err(map_specialty_error)?
            .ok_or_else(|| Error::not_found(SPECIALTY_NOT_FOUND))?;
        info!(specialty_id = %id, "specialty deleted");
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockSpecialtyRepository;
    use crate::domain::test_support::{admin, customer, fixture_timestamp};
    use rstest::rstest;

    fn make_service(repo: MockSpecialtyRepository) -> SpecialtyService<MockSpecialtyRepository> {
        SpecialtyService::new(Arc::new(repo))
    }

    fn specialty(id: i32, name: &str) -> Specialty {
        Specialty {
            id: SpecialtyId::new(id),
            name: name.to_owned(),
            description: None,
            created_at: fixture_timestamp(),
        }
    }

    #[tokio::test]
    async fn create_trims_the_name() {
        let mut repo = MockSpecialtyRepository::new();
        repo.expect_create()
            .withf(|new| new.name == "Barba")
            .times(1)
            .return_once(|new| Ok(specialty(4, &new.name)));

        let created = make_service(repo)
            .create(
                &admin(),
                NewSpecialty {
                    name: "  Barba ".into(),
                    description: None,
                },
            )
            .await
            .expect("created");

        assert_eq!(created.name, "Barba");
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[tokio::test]
    async fn create_rejects_blank_names(#[case] name: &str) {
        let mut repo = MockSpecialtyRepository::new();
        repo.expect_create().times(0);

        let err = make_service(repo)
            .create(
                &admin(),
                NewSpecialty {
                    name: name.into(),
                    description: None,
                },
            )
            .await
            .expect_err("blank");

        assert_eq!(err.message(), NAME_REQUIRED);
    }

    #[tokio::test]
    async fn create_maps_duplicate_name_to_conflict() {
        let mut repo = MockSpecialtyRepository::new();
        repo.expect_create()
            .times(1)
            .return_once(|_| Err(SpecialtyRepositoryError::duplicate_name()));

        let err = make_service(repo)
            .create(
                &admin(),
                NewSpecialty {
                    name: "Corte".into(),
                    description: None,
                },
            )
            .await
            .expect_err("duplicate");

        assert_eq!(err.code(), ErrorCode::Conflict);
        assert_eq!(err.message(), SPECIALTY_EXISTS);
    }

    #[tokio::test]
    async fn create_requires_admin() {
        let err = make_service(MockSpecialtyRepository::new())
            .create(
                &customer(5),
                NewSpecialty {
                    name: "Corte".into(),
                    description: None,
                },
            )
            .await
            .expect_err("forbidden");

        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn update_rejects_empty_patch() {
        let err = make_service(MockSpecialtyRepository::new())
            .update(&admin(), SpecialtyId::new(1), SpecialtyPatch::default())
            .await
            .expect_err("empty");

        assert_eq!(err.message(), EMPTY_PATCH);
    }

    #[tokio::test]
    async fn update_missing_specialty_is_not_found() {
        let mut repo = MockSpecialtyRepository::new();
        repo.expect_update().times(1).return_once(|_, _| Ok(None));

        let err = make_service(repo)
            .update(
                &admin(),
                SpecialtyId::new(9),
                SpecialtyPatch {
                    name: None,
                    description: Some("Navalha".into()),
                },
            )
            .await
            .expect_err("missing");

        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn delete_in_use_specialty_is_conflict() {
        let mut repo = MockSpecialtyRepository::new();
        repo.expect_delete()
            .times(1)
            .return_once(|_| Err(SpecialtyRepositoryError::in_use()));

        let err = make_service(repo)
            .delete(&admin(), SpecialtyId::new(1))
            .await
            .expect_err("in use");

        assert_eq!(err.code(), ErrorCode::Conflict);
        assert_eq!(err.message(), SPECIALTY_IN_USE);
    }

    #[tokio::test]
    async fn get_missing_specialty_is_not_found() {
        let mut repo = MockSpecialtyRepository::new();
        repo.expect_find_by_id().times(1).return_once(|_| Ok(None));

        let err = make_service(repo)
            .get(SpecialtyId::new(3))
            .await
            .expect_err("missing");

        assert_eq!(err.message(), SPECIALTY_NOT_FOUND);
    }
}
