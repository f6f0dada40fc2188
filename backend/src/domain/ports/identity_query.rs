//! Driving port resolving session identities and listing staff.

use async_trait::async_trait;

use crate::domain::{Caller, Error, Identity, StaffId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityQuery: Send + Sync {
    /// Resolve the identity behind a session into a policy [`Caller`].
    ///
    /// Identities deleted since login fail with `unauthorized`.
    async fn resolve_caller(&self, id: &StaffId) -> Result<Caller, Error>;

    /// Full identity record of an authenticated session.
    async fn profile(&self, id: &StaffId) -> Result<Identity, Error>;

    /// Staff identities ordered by name then email. Principal only.
    async fn list_staff(&self, caller: &Caller) -> Result<Vec<Identity>, Error>;
}
