//! PostgreSQL persistence adapters using Diesel and `diesel-async`.
//!
//! Row structs (`models`) and table definitions (`schema`) stay private to this
//! module; repositories translate them to and from domain types.
//!
//! ```ignore
//! use campus_backend::outbound::persistence::{DbPool, DieselRosterRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/campus")).await?;
//! let rosters = DieselRosterRepository::new(pool);
//! ```

mod diesel_attendance_repository;
mod diesel_identity_repository;
mod diesel_news_repository;
mod diesel_roster_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_attendance_repository::DieselAttendanceRepository;
pub use diesel_identity_repository::DieselIdentityRepository;
pub use diesel_news_repository::DieselNewsRepository;
pub use diesel_roster_repository::DieselRosterRepository;
pub use migrations::{MigrationError, migrate, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
