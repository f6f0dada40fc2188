//! In-memory adapters for the driven ports.
//!
//! Used by tests and by the server when no database URL is configured. State
//! lives behind a `std::sync::Mutex`; each operation takes the lock once, so
//! individual reads and upserts are atomic.

mod attendance;
mod identities;
mod news;
mod rosters;

pub use attendance::InMemoryAttendanceRepository;
pub use identities::InMemoryIdentityRepository;
pub use news::InMemoryNewsRepository;
pub use rosters::InMemoryRosterRepository;

use std::sync::{Mutex, MutexGuard};

/// Lock `mutex`, mapping poisoning to an adapter error.
fn lock<'a, T, E>(mutex: &'a Mutex<T>, query: impl FnOnce(String) -> E) -> Result<MutexGuard<'a, T>, E> {
    mutex
        .lock()
        .map_err(|_| query("in-memory store lock poisoned".to_owned()))
}
