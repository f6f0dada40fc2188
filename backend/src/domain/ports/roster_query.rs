//! Driving port for roster reads and the department directory.

use async_trait::async_trait;

use crate::domain::{Caller, ClassCode, ClassRoster, Department, Error};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RosterQuery: Send + Sync {
    /// Roster of one class; `not_found` when none was written.
    async fn get_roster(
        &self,
        caller: &Caller,
        department: Option<Department>,
        class_code: &ClassCode,
    ) -> Result<ClassRoster, Error>;

    /// Rosters of a department ordered by class code.
    async fn list_rosters(
        &self,
        caller: &Caller,
        department: Option<Department>,
    ) -> Result<Vec<ClassRoster>, Error>;

    /// Sorted distinct departments across all rosters. Principal only.
    async fn list_departments(&self, caller: &Caller) -> Result<Vec<Department>, Error>;
}
