//! Campus backend library.
//!
//! Hexagonal layout: `domain` holds entities, the access policy, services and
//! ports; `inbound` adapts HTTP onto the driving ports; `outbound` implements
//! the driven ports against PostgreSQL and in-memory stores.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use middleware::Trace;
