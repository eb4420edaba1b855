//! Port for account persistence.

use async_trait::async_trait;

use crate::domain::{NewUser, StoredCredentials, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "user repository query failed: {message}",
        /// The email is already registered.
        DuplicateEmail => "email already registered",
    }
}

/// Account storage. Emails are stored normalised.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Look up an account and its password hash by email.
    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError>;

    /// Fetch one account.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Insert an account.
    async fn create(&self, user: &NewUser) -> Result<User, UserRepositoryError>;
}
