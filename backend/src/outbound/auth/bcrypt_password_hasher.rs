//! bcrypt adapter for the [`PasswordHasher`] port.
//!
//! bcrypt is deliberately slow, so both operations run on the blocking pool
//! to keep the async workers responsive.

use async_trait::async_trait;

use crate::domain::ports::{PasswordHasher, PasswordHasherError};

/// Work factor used when none is configured.
pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// Hashes passwords with bcrypt.
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    /// Create a hasher with an explicit work factor.
    #[must_use]
    pub const fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_BCRYPT_COST)
    }
}

fn map_bcrypt_error(error: bcrypt::BcryptError) -> PasswordHasherError {
    PasswordHasherError::hashing(error.to_string())
}

async fn run_blocking<T, F>(task: F) -> Result<T, PasswordHasherError>
where
    F: FnOnce() -> Result<T, bcrypt::BcryptError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|err| PasswordHasherError::hashing(err.to_string()))?
        .map_err(map_bcrypt_error)
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, password: &str) -> Result<String, PasswordHasherError> {
        let password = password.to_owned();
        let cost = self.cost;
        run_blocking(move || bcrypt::hash(password, cost)).await
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHasherError> {
        let password = password.to_owned();
        let hash = hash.to_owned();
        run_blocking(move || bcrypt::verify(password, &hash)).await
    }
}
