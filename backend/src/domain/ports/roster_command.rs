//! Driving port for roster writes.

use async_trait::async_trait;

use crate::domain::{Caller, ClassCode, ClassRoster, Department, Error, Student};

/// Full replacement of one class roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceRosterRequest {
    /// Defaults to the caller's own department.
    pub department: Option<Department>,
    pub class_code: ClassCode,
    /// Defaults to the class code when blank.
    pub display_name: Option<String>,
    /// Stored in the given order; duplicate rolls are kept.
    pub students: Vec<Student>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RosterCommand: Send + Sync {
    /// Create or wholly replace a roster. Staff of that department only.
    async fn replace_roster(
        &self,
        caller: &Caller,
        request: ReplaceRosterRequest,
    ) -> Result<ClassRoster, Error>;
}
