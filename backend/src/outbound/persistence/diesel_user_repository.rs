//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{NewUser, StoredCredentials, User, UserId};

use super::error_mapping::DbFailure;
use super::models::{NewUserRow, UserRow};
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: impl Into<DbFailure>) -> UserRepositoryError {
    match failure.into() {
        DbFailure::Connection(message) => UserRepositoryError::connection(message),
        DbFailure::UniqueViolation { .. } => UserRepositoryError::duplicate_email(),
        DbFailure::ForeignKeyViolation { .. } => {
            UserRepositoryError::query("foreign key violation")
        }
        DbFailure::Query(message) => UserRepositoryError::query(message),
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_failure)?;
        Ok(row.map(UserRow::into_credentials))
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row: Option<UserRow> = users::table
            .find(id.get())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_failure)?;
        Ok(row.map(|row| row.into_credentials().user))
    }

    async fn create(&self, user: &NewUser) -> Result<User, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row = NewUserRow {
            name: &user.name,
            email: &user.email,
            password_hash: &user.password_hash,
            is_admin: user.is_admin,
        };
        let stored: UserRow = diesel::insert_into(users::table)
            .values(&row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_failure)?;
        Ok(stored.into_credentials().user)
    }
}
