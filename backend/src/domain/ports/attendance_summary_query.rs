//! Driving port for committed-attendance summaries.

use async_trait::async_trait;

use crate::domain::{
    AttendanceDate, AttendanceKey, Caller, ClassAttendanceSummary, Department,
    DepartmentAttendanceSummary, Error,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttendanceSummaryQuery: Send + Sync {
    /// Summary of one persisted record; defaults are never synthesized.
    async fn summarize_class(
        &self,
        caller: &Caller,
        key: AttendanceKey,
    ) -> Result<ClassAttendanceSummary, Error>;

    /// Per-class summaries; `not_found` when no record matches.
    async fn summarize_department(
        &self,
        caller: &Caller,
        department: Department,
        date: AttendanceDate,
    ) -> Result<DepartmentAttendanceSummary, Error>;
}
