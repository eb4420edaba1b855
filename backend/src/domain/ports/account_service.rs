//! Driving port for registration, login and bearer authentication.

use async_trait::async_trait;

use crate::domain::{AuthSession, AuthenticatedUser, Error, LoginCredentials, Registration, User};

/// Outcome of the startup administrator bootstrap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminBootstrap {
    /// A new administrator account was created.
    Created(User),
    /// An account with that email already exists; nothing changed.
    AlreadyPresent,
}

/// Account use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Register a customer account and sign them in.
    async fn register(&self, registration: Registration) -> Result<AuthSession, Error>;

    /// Check credentials and issue a token.
    async fn login(&self, credentials: LoginCredentials) -> Result<AuthSession, Error>;

    /// The caller's current account.
    async fn profile(&self, caller: &AuthenticatedUser) -> Result<User, Error>;

    /// Resolve a bearer token into the caller identity.
    fn authenticate(&self, token: &str) -> Result<AuthenticatedUser, Error>;

    /// Create an administrator account unless the email is already taken.
    async fn ensure_admin(&self, registration: Registration) -> Result<AdminBootstrap, Error>;
}
