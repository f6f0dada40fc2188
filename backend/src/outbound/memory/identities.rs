//! In-memory identity directory.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{IdentityRepository, IdentityRepositoryError};
use crate::domain::{Email, Identity, RoleKind, StaffId};

use super::lock;

#[derive(Debug, Default)]
pub struct InMemoryIdentityRepository {
    store: Mutex<HashMap<StaffId, Identity>>,
}

impl InMemoryIdentityRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityRepository for InMemoryIdentityRepository {
    async fn insert(&self, identity: &Identity) -> Result<(), IdentityRepositoryError> {
        let mut guard = lock(&self.store, IdentityRepositoryError::query)?;
        if guard
            .values()
            .any(|existing| existing.email() == identity.email())
        {
            return Err(IdentityRepositoryError::duplicate_email(
                identity.email().as_str(),
            ));
        }
        guard.insert(identity.id(), identity.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &StaffId) -> Result<Option<Identity>, IdentityRepositoryError> {
        let guard = lock(&self.store, IdentityRepositoryError::query)?;
        Ok(guard.get(id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<Identity>, IdentityRepositoryError> {
        let guard = lock(&self.store, IdentityRepositoryError::query)?;
        Ok(guard
            .values()
            .find(|identity| identity.email() == email)
            .cloned())
    }

    async fn list_by_role(&self, role: RoleKind) -> Result<Vec<Identity>, IdentityRepositoryError> {
        let guard = lock(&self.store, IdentityRepositoryError::query)?;
        let mut identities: Vec<Identity> = guard
            .values()
            .filter(|identity| identity.role().kind() == role)
            .cloned()
            .collect();
        identities.sort_by(|a, b| {
            a.name()
                .cmp(b.name())
                .then_with(|| a.email().as_str().cmp(b.email().as_str()))
        });
        Ok(identities)
    }

    async fn delete(&self, id: &StaffId) -> Result<bool, IdentityRepositoryError> {
        let mut guard = lock(&self.store, IdentityRepositoryError::query)?;
        Ok(guard.remove(id).is_some())
    }
}
