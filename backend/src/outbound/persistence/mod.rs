//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports backed by
//! PostgreSQL via `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types. Booking rules live in the domain services.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Constraints as errors**: unique and foreign key violations become
//!   port-specific variants such as `SlotTaken` or `InUse`.
//!
//! # Example
//!
//! ```ignore
//! use clickbeard::outbound::persistence::{DbPool, DieselBarberRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/clickbeard")).await?;
//! let barbers = DieselBarberRepository::new(pool);
//! ```

mod diesel_appointment_repository;
mod diesel_barber_repository;
mod diesel_specialty_repository;
mod diesel_user_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_appointment_repository::DieselAppointmentRepository;
pub use diesel_barber_repository::DieselBarberRepository;
pub use diesel_specialty_repository::DieselSpecialtyRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
