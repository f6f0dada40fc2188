//! In-memory class roster store.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{RosterRepository, RosterRepositoryError};
use crate::domain::{ClassCode, ClassRoster, Department};

use super::lock;

/// Rosters keyed by `(department, class_code)`; the ordered map yields class
/// code order within a department.
#[derive(Debug, Default)]
pub struct InMemoryRosterRepository {
    store: Mutex<BTreeMap<(Department, ClassCode), ClassRoster>>,
}

impl InMemoryRosterRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RosterRepository for InMemoryRosterRepository {
    async fn find(
        &self,
        department: &Department,
        class_code: &ClassCode,
    ) -> Result<Option<ClassRoster>, RosterRepositoryError> {
        let guard = lock(&self.store, RosterRepositoryError::query)?;
        Ok(guard
            .get(&(department.clone(), class_code.clone()))
            .cloned())
    }

    async fn upsert(&self, roster: &ClassRoster) -> Result<(), RosterRepositoryError> {
        let mut guard = lock(&self.store, RosterRepositoryError::query)?;
        guard.insert(
            (roster.department.clone(), roster.class_code.clone()),
            roster.clone(),
        );
        Ok(())
    }

    async fn list_for_department(
        &self,
        department: &Department,
    ) -> Result<Vec<ClassRoster>, RosterRepositoryError> {
        let guard = lock(&self.store, RosterRepositoryError::query)?;
        Ok(guard
            .values()
            .filter(|roster| roster.department == *department)
            .cloned()
            .collect())
    }

    async fn list_departments(&self) -> Result<Vec<Department>, RosterRepositoryError> {
        let guard = lock(&self.store, RosterRepositoryError::query)?;
        let departments: BTreeSet<Department> =
            guard.keys().map(|(department, _)| department.clone()).collect();
        Ok(departments.into_iter().collect())
    }
}
