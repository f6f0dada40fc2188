//! Driving ports for identity lifecycle: staff management and the one-time
//! principal bootstrap.

use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::{Caller, Department, Email, Error, Identity, StaffId};

/// Staff account to create.
#[derive(Debug, Clone)]
pub struct NewStaffRequest {
    pub name: String,
    pub email: Email,
    pub password: Zeroizing<String>,
    pub department: Department,
}

/// Principal account created by the bootstrap.
#[derive(Debug, Clone)]
pub struct PrincipalBootstrapRequest {
    pub name: String,
    pub email: Email,
    pub password: Zeroizing<String>,
}

/// Result of [`PrincipalBootstrap::ensure_principal`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapOutcome {
    Created(StaffId),
    AlreadyExists(StaffId),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StaffAdministration: Send + Sync {
    /// Create a staff identity. Principal only; duplicate emails conflict.
    async fn create_staff(
        &self,
        caller: &Caller,
        request: NewStaffRequest,
    ) -> Result<Identity, Error>;

    /// Delete a staff identity. Principal only; principals cannot be deleted.
    async fn delete_staff(&self, caller: &Caller, id: &StaffId) -> Result<(), Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PrincipalBootstrap: Send + Sync {
    /// Create the principal unless an identity with the email exists.
    async fn ensure_principal(
        &self,
        request: PrincipalBootstrapRequest,
    ) -> Result<BootstrapOutcome, Error>;
}
