//! Port for class roster persistence.

use async_trait::async_trait;

use crate::domain::{ClassCode, ClassRoster, Department};

use super::define_port_error;

define_port_error! {
    /// Errors raised by roster repository adapters.
    pub enum RosterRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "roster repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "roster repository query failed: {message}",
    }
}

/// Keyed store of rosters, one per `(department, class_code)`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RosterRepository: Send + Sync {
    async fn find(
        &self,
        department: &Department,
        class_code: &ClassCode,
    ) -> Result<Option<ClassRoster>, RosterRepositoryError>;

    /// Insert or wholly replace the roster at its natural key.
    async fn upsert(&self, roster: &ClassRoster) -> Result<(), RosterRepositoryError>;

    /// Rosters of `department` ordered by class code ascending.
    async fn list_for_department(
        &self,
        department: &Department,
    ) -> Result<Vec<ClassRoster>, RosterRepositoryError>;

    /// Distinct departments across all rosters, sorted ascending.
    async fn list_departments(&self) -> Result<Vec<Department>, RosterRepositoryError>;
}
