//! Driving port for attendance writes.

use async_trait::async_trait;

use crate::domain::{
    AttendanceDate, AttendanceEntry, AttendanceRecord, Caller, ClassCode, Department, Error,
};

/// Full replacement of one day's attendance for a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveAttendanceRequest {
    /// Defaults to the caller's own department.
    pub department: Option<Department>,
    pub class_code: ClassCode,
    pub date: AttendanceDate,
    /// Caller-trusted: rolls are not checked against the roster.
    pub entries: Vec<AttendanceEntry>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttendanceCommand: Send + Sync {
    /// Fail with `past_date_locked` when `date` is before today.
    ///
    /// Needs no caller and no payload, so adapters can apply the lock before
    /// validating anything else.
    fn ensure_open(&self, date: &AttendanceDate) -> Result<(), Error>;

    /// Upsert attendance. Staff of that department only; past days fail
    /// with `past_date_locked`; an unknown class fails with `not_found`.
    async fn save(
        &self,
        caller: &Caller,
        request: SaveAttendanceRequest,
    ) -> Result<AttendanceRecord, Error>;
}
