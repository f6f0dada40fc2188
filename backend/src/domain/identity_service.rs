//! Identity directory services.
//!
//! [`IdentityService`] implements login, caller resolution, staff management
//! and the principal bootstrap over an [`IdentityRepository`] and a
//! [`CredentialHasher`].

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{error, info, warn};

use crate::domain::access_policy::{Scope, authorize};
use crate::domain::ports::{
    BootstrapOutcome, CredentialHasher, CredentialHasherError, IdentityQuery, IdentityRepository,
    IdentityRepositoryError, LoginService, NewStaffRequest, PrincipalBootstrap,
    PrincipalBootstrapRequest, StaffAdministration,
};
use crate::domain::{
    Caller, Error, Identity, IdentityValidationError, LoginCredentials, Role, RoleKind, StaffId,
};

fn map_repository_error(error: IdentityRepositoryError) -> Error {
    match error {
        IdentityRepositoryError::Connection { message } => {
            error!(%message, "identity repository unavailable");
            Error::service_unavailable(format!("identity repository unavailable: {message}"))
        }
        IdentityRepositoryError::Query { message } => {
            error!(%message, "identity repository query failed");
            Error::internal(format!("identity repository error: {message}"))
        }
        IdentityRepositoryError::DuplicateEmail { email } => {
            Error::conflict("email already exists").with_details(json!({ "email": email }))
        }
    }
}

fn map_validation_error(error: IdentityValidationError) -> Error {
    Error::invalid_request(error.to_string())
}

fn map_hasher_error(error: CredentialHasherError) -> Error {
    error!(%error, "credential hashing failed");
    Error::internal("credential hashing failed")
}

fn invalid_credentials() -> Error {
    Error::unauthorized("invalid credentials")
}

/// Identity service implementing the identity driving ports.
#[derive(Clone)]
pub struct IdentityService<R, H> {
    identities: Arc<R>,
    hasher: Arc<H>,
    clock: Arc<dyn Clock>,
}

impl<R, H> IdentityService<R, H> {
    pub fn new(identities: Arc<R>, hasher: Arc<H>, clock: Arc<dyn Clock>) -> Self {
        Self {
            identities,
            hasher,
            clock,
        }
    }
}

impl<R, H> IdentityService<R, H>
where
    R: IdentityRepository,
    H: CredentialHasher,
{
    async fn find(&self, id: &StaffId) -> Result<Option<Identity>, Error> {
        self.identities
            .find_by_id(id)
            .await
            .map_err(map_repository_error)
    }

    async fn insert(&self, identity: &Identity) -> Result<(), Error> {
        self.identities
            .insert(identity)
            .await
            .map_err(map_repository_error)
    }
}

#[async_trait]
impl<R, H> LoginService for IdentityService<R, H>
where
    R: IdentityRepository,
    H: CredentialHasher,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<StaffId, Error> {
        let identity = self
            .identities
            .find_by_email(credentials.email())
            .await
            .map_err(map_repository_error)?
            .ok_or_else(invalid_credentials)?;

        let verified = self
            .hasher
            .verify(credentials.password(), identity.credential_secret())
            .map_err(|err| {
                warn!(identity = %identity.id(), error = %err, "stored credential unreadable");
                invalid_credentials()
            })?;
        if !verified {
            return Err(invalid_credentials());
        }
        Ok(identity.id())
    }
}

#[async_trait]
impl<R, H> IdentityQuery for IdentityService<R, H>
where
    R: IdentityRepository,
    H: CredentialHasher,
{
    async fn resolve_caller(&self, id: &StaffId) -> Result<Caller, Error> {
        self.profile(id).await.map(|identity| Caller::from(&identity))
    }

    async fn profile(&self, id: &StaffId) -> Result<Identity, Error> {
        self.find(id)
            .await?
            .ok_or_else(|| Error::unauthorized("session identity no longer exists"))
    }

    async fn list_staff(&self, caller: &Caller) -> Result<Vec<Identity>, Error> {
        authorize(caller, Scope::PrincipalOnly)?;
        self.identities
            .list_by_role(RoleKind::Staff)
            .await
            .map_err(map_repository_error)
    }
}

#[async_trait]
impl<R, H> StaffAdministration for IdentityService<R, H>
where
    R: IdentityRepository,
    H: CredentialHasher,
{
    async fn create_staff(
        &self,
        caller: &Caller,
        request: NewStaffRequest,
    ) -> Result<Identity, Error> {
        authorize(caller, Scope::PrincipalOnly)?;

        if self
            .identities
            .find_by_email(&request.email)
            .await
            .map_err(map_repository_error)?
            .is_some()
        {
            return Err(Error::conflict("email already exists")
                .with_details(json!({ "email": request.email.as_str() })));
        }

        let secret = self
            .hasher
            .hash(request.password.as_str())
            .map_err(map_hasher_error)?;
        let identity = Identity::new(
            StaffId::random(),
            &request.name,
            request.email,
            secret,
            Role::Staff(request.department),
            self.clock.utc(),
        )
        .map_err(map_validation_error)?;
        self.insert(&identity).await?;

        info!(
            identity = %identity.id(),
            department = identity.department().map(|d| d.as_str()).unwrap_or_default(),
            "staff identity created"
        );
        Ok(identity)
    }

    async fn delete_staff(&self, caller: &Caller, id: &StaffId) -> Result<(), Error> {
        authorize(caller, Scope::PrincipalOnly)?;

        let identity = self
            .find(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("staff {id} not found")))?;
        if identity.role().kind() == RoleKind::Principal {
            return Err(Error::forbidden("the principal account cannot be deleted"));
        }

        let deleted = self
            .identities
            .delete(id)
            .await
            .map_err(map_repository_error)?;
        if !deleted {
            return Err(Error::not_found(format!("staff {id} not found")));
        }
        info!(identity = %id, "staff identity deleted");
        Ok(())
    }
}

#[async_trait]
impl<R, H> PrincipalBootstrap for IdentityService<R, H>
where
    R: IdentityRepository,
    H: CredentialHasher,
{
    async fn ensure_principal(
        &self,
        request: PrincipalBootstrapRequest,
    ) -> Result<BootstrapOutcome, Error> {
        if let Some(existing) = self
            .identities
            .find_by_email(&request.email)
            .await
            .map_err(map_repository_error)?
        {
            return Ok(BootstrapOutcome::AlreadyExists(existing.id()));
        }

        let secret = self
            .hasher
            .hash(request.password.as_str())
            .map_err(map_hasher_error)?;
        let identity = Identity::new(
            StaffId::random(),
            &request.name,
            request.email,
            secret,
            Role::Principal,
            self.clock.utc(),
        )
        .map_err(map_validation_error)?;
        self.insert(&identity).await?;

        info!(identity = %identity.id(), "principal identity created");
        Ok(BootstrapOutcome::Created(identity.id()))
    }
}

#[cfg(test)]
#[path = "identity_service_tests.rs"]
mod tests;
