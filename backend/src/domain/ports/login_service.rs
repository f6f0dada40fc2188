//! Driving port for login/authentication use-cases.
//!
//! Inbound adapters call it to authenticate credentials without importing
//! the backing directory or credential hasher.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, StaffId};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated identity id.
    ///
    /// Unknown emails and wrong passwords fail identically with
    /// `unauthorized`.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<StaffId, Error>;
}
