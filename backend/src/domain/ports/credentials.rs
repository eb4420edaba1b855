//! Ports for password hashing and bearer token handling.
//!
//! Both are driven adapters: the domain decides when to hash or issue, the
//! adapters decide how.

use async_trait::async_trait;

use crate::domain::{AuthenticatedUser, User};

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashers.
    pub enum PasswordHasherError {
        /// Hashing or verification could not run.
        Hashing { message: String } => "password hashing failed: {message}",
    }
}

define_port_error! {
    /// Errors raised by token services.
    pub enum TokenServiceError {
        /// A token could not be signed.
        Issue { message: String } => "token issue failed: {message}",
        /// The presented token failed signature or expiry checks.
        Invalid { message: String } => "token rejected: {message}",
    }
}

/// One-way password hashing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password.
    async fn hash(&self, password: &str) -> Result<String, PasswordHasherError>;

    /// Check a plaintext password against a stored hash.
    async fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHasherError>;
}

/// Signed bearer tokens carrying the caller identity.
#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    /// Issue a token for `user`.
    fn issue(&self, user: &User) -> Result<String, TokenServiceError>;

    /// Verify a token and return the identity it asserts.
    fn verify(&self, token: &str) -> Result<AuthenticatedUser, TokenServiceError>;
}
