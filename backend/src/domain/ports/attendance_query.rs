//! Driving port for attendance reads.

use async_trait::async_trait;

use crate::domain::{
    AttendanceDate, AttendanceKey, AttendanceRecord, Caller, ClassCode, Department, Error,
};

/// Staff lookup of one class on one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceLookup {
    /// Defaults to the caller's own department.
    pub department: Option<Department>,
    pub class_code: ClassCode,
    pub date: AttendanceDate,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttendanceQuery: Send + Sync {
    /// Persisted record, or an unsaved all-present default built from the
    /// roster. Staff of that department only.
    async fn get_or_default(
        &self,
        caller: &Caller,
        lookup: AttendanceLookup,
    ) -> Result<AttendanceRecord, Error>;

    /// Persisted record of any department; `not_found` when unsaved.
    /// Principal only.
    async fn get_committed(
        &self,
        caller: &Caller,
        key: AttendanceKey,
    ) -> Result<AttendanceRecord, Error>;
}
