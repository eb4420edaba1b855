//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use clickbeard::outbound::auth::TokenSettings;
use clickbeard::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) tokens: TokenSettings,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) bcrypt_cost: Option<u32>,
}

impl ServerConfig {
    /// Configuration running on the in-memory store and the system clock.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, tokens: TokenSettings) -> Self {
        Self {
            bind_addr,
            tokens,
            db_pool: None,
            clock: Arc::new(DefaultClock),
            bcrypt_cost: None,
        }
    }

    /// Attach a database connection pool for the Diesel repositories.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Override the bcrypt work factor.
    #[cfg_attr(
        not(test),
        expect(dead_code, reason = "Lowered by tests to keep hashing fast")
    )]
    #[must_use]
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = Some(cost);
        self
    }

    /// Return the socket address the server will bind to.
    #[cfg_attr(
        not(test),
        expect(dead_code, reason = "Exercised by bootstrap tests")
    )]
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
