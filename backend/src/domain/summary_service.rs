//! Summary aggregation over committed attendance.
//!
//! Only persisted records are summarised; an unsaved day is `not_found`
//! rather than an all-present default.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::access_policy::{Scope, authorize};
use crate::domain::attendance_service::{attendance_not_found, map_attendance_repository_error};
use crate::domain::ports::{AttendanceRepository, AttendanceSummaryQuery};
use crate::domain::{
    AttendanceDate, AttendanceKey, AttendanceSummary, Caller, ClassAttendanceSummary,
    ClassSummaryLine, Department, DepartmentAttendanceSummary, Error,
};

#[derive(Clone)]
pub struct SummaryService<A> {
    records: Arc<A>,
}

impl<A> SummaryService<A> {
    pub fn new(records: Arc<A>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl<A> AttendanceSummaryQuery for SummaryService<A>
where
    A: AttendanceRepository,
{
    async fn summarize_class(
        &self,
        caller: &Caller,
        key: AttendanceKey,
    ) -> Result<ClassAttendanceSummary, Error> {
        authorize(caller, Scope::PrincipalOnly)?;
        let record = self
            .records
            .find(&key)
            .await
            .map_err(map_attendance_repository_error)?
            .ok_or_else(|| attendance_not_found(&key))?;

        Ok(ClassAttendanceSummary {
            summary: AttendanceSummary::from_entries(&record.entries),
            key,
        })
    }

    async fn summarize_department(
        &self,
        caller: &Caller,
        department: Department,
        date: AttendanceDate,
    ) -> Result<DepartmentAttendanceSummary, Error> {
        authorize(caller, Scope::PrincipalOnly)?;
        let records = self
            .records
            .list_for_department_on(&department, &date)
            .await
            .map_err(map_attendance_repository_error)?;
        if records.is_empty() {
            return Err(Error::not_found(format!(
                "no attendance recorded for department {department} on {date}"
            )));
        }

        let classes = records
            .into_iter()
            .map(|record| ClassSummaryLine {
                summary: AttendanceSummary::from_entries(&record.entries),
                class_code: record.key.class_code,
            })
            .collect();
        Ok(DepartmentAttendanceSummary {
            department,
            date,
            classes,
        })
    }
}
