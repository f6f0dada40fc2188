//! Port for identity directory persistence.

use async_trait::async_trait;

use crate::domain::{Email, Identity, RoleKind, StaffId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by identity repository adapters.
    pub enum IdentityRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "identity repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "identity repository query failed: {message}",
        /// An identity with the same email already exists.
        DuplicateEmail { email: String } =>
            "identity with email {email} already exists",
    }
}

/// Keyed store of identity records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityRepository: Send + Sync {
    /// Insert a new identity; emails are unique.
    async fn insert(&self, identity: &Identity) -> Result<(), IdentityRepositoryError>;

    async fn find_by_id(&self, id: &StaffId) -> Result<Option<Identity>, IdentityRepositoryError>;

    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<Identity>, IdentityRepositoryError>;

    /// Identities holding `role`, ordered by name then email.
    async fn list_by_role(&self, role: RoleKind) -> Result<Vec<Identity>, IdentityRepositoryError>;

    /// Remove an identity; returns whether a record was deleted.
    async fn delete(&self, id: &StaffId) -> Result<bool, IdentityRepositoryError>;
}
