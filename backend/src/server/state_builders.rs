//! Builders for the HTTP state over PostgreSQL or in-memory adapters.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::warn;

use campus_backend::domain::IdentityService;
use campus_backend::domain::ports::{
    CredentialHasher, IdentityRepository, PrincipalBootstrap,
};
use campus_backend::inbound::http::state::{HttpState, ServiceAdapters};
use campus_backend::outbound::credentials::BcryptCredentialHasher;
use campus_backend::outbound::memory::{
    InMemoryAttendanceRepository, InMemoryIdentityRepository, InMemoryNewsRepository,
    InMemoryRosterRepository,
};
use campus_backend::outbound::persistence::{
    DbPool, DieselAttendanceRepository, DieselIdentityRepository, DieselNewsRepository,
    DieselRosterRepository,
};

/// Ports assembled for one process.
#[derive(Clone)]
pub(crate) struct BackendPorts {
    pub(crate) http: HttpState,
    pub(crate) bootstrap: Arc<dyn PrincipalBootstrap>,
}

fn bootstrap_port<I, H>(
    identities: Arc<I>,
    hasher: Arc<H>,
    clock: Arc<dyn Clock>,
) -> Arc<dyn PrincipalBootstrap>
where
    I: IdentityRepository + 'static,
    H: CredentialHasher + 'static,
{
    Arc::new(IdentityService::new(identities, hasher, clock))
}

fn build_diesel_ports(pool: &DbPool, clock: Arc<dyn Clock>) -> BackendPorts {
    let identities = Arc::new(DieselIdentityRepository::new(pool.clone()));
    let hasher = Arc::new(BcryptCredentialHasher::new());
    BackendPorts {
        bootstrap: bootstrap_port(identities.clone(), hasher.clone(), clock.clone()),
        http: HttpState::from_adapters(ServiceAdapters {
            identities,
            hasher,
            rosters: Arc::new(DieselRosterRepository::new(pool.clone())),
            attendance: Arc::new(DieselAttendanceRepository::new(pool.clone())),
            news: Arc::new(DieselNewsRepository::new(pool.clone())),
            clock,
        }),
    }
}

fn build_memory_ports(clock: Arc<dyn Clock>) -> BackendPorts {
    warn!("no database configured; state is held in memory and lost on restart");
    let identities = Arc::new(InMemoryIdentityRepository::new());
    let hasher = Arc::new(BcryptCredentialHasher::new());
    BackendPorts {
        bootstrap: bootstrap_port(identities.clone(), hasher.clone(), clock.clone()),
        http: HttpState::from_adapters(ServiceAdapters {
            identities,
            hasher,
            rosters: Arc::new(InMemoryRosterRepository::new()),
            attendance: Arc::new(InMemoryAttendanceRepository::new()),
            news: Arc::new(InMemoryNewsRepository::new()),
            clock,
        }),
    }
}

/// Select PostgreSQL adapters when a pool is available, otherwise in-memory
/// stores.
pub(crate) fn build_backend_ports(db_pool: Option<&DbPool>) -> BackendPorts {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    match db_pool {
        Some(pool) => build_diesel_ports(pool, clock),
        None => build_memory_ports(clock),
    }
}
