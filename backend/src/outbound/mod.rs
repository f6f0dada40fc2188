//! Outbound adapters implementing the domain's driven ports.
//!
//! - **persistence**: PostgreSQL repositories on Diesel.
//! - **memory**: mutex-guarded stores for tests and database-less runs.
//! - **credentials**: password hashing behind `CredentialHasher`.
//!
//! Adapters translate between domain and storage representations and hold no
//! policy.

pub mod credentials;
pub mod memory;
pub mod persistence;
