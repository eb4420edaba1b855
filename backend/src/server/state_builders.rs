//! Builders choosing the driven adapters behind [`HttpState`].

use std::sync::Arc;

use actix_web::web;
use tracing::warn;

use clickbeard::inbound::http::state::{HttpState, HttpStateAdapters};
use clickbeard::outbound::auth::{BcryptPasswordHasher, JwtTokenService};
use clickbeard::outbound::memory::MemoryStore;
use clickbeard::outbound::persistence::{
    DieselAppointmentRepository, DieselBarberRepository, DieselSpecialtyRepository,
    DieselUserRepository,
};

use super::ServerConfig;

/// Build the HTTP state over PostgreSQL when a pool is configured and over
/// the in-memory store otherwise.
pub fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let hasher = Arc::new(
        config
            .bcrypt_cost
            .map_or_else(BcryptPasswordHasher::default, BcryptPasswordHasher::new),
    );
    let tokens = Arc::new(JwtTokenService::from_settings(
        &config.tokens,
        Arc::clone(&config.clock),
    ));
    let clock = Arc::clone(&config.clock);

    let state = match &config.db_pool {
        Some(pool) => HttpState::from_adapters(HttpStateAdapters {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            specialties: Arc::new(DieselSpecialtyRepository::new(pool.clone())),
            barbers: Arc::new(DieselBarberRepository::new(pool.clone())),
            appointments: Arc::new(DieselAppointmentRepository::new(pool.clone())),
            hasher,
            tokens,
            clock,
        }),
        None => {
            warn!("no database configured; using the in-memory store");
            let store = Arc::new(MemoryStore::new(Arc::clone(&clock)));
            HttpState::from_adapters(HttpStateAdapters {
                users: Arc::clone(&store),
                specialties: Arc::clone(&store),
                barbers: Arc::clone(&store),
                appointments: store,
                hasher,
                tokens,
                clock,
            })
        }
    };
    web::Data::new(state)
}
