//! Attendance services: default synthesis, the past-date lock and upserts.
//!
//! Reads of an unsaved day return an all-present record built from the
//! roster without persisting it. Writes replace the day's entries wholesale
//! and are refused once the day is over.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, error, info};

use crate::domain::access_policy::{Scope, authorize, target_department};
use crate::domain::ports::{
    AttendanceCommand, AttendanceLookup, AttendanceQuery, AttendanceRepository,
    AttendanceRepositoryError, RosterRepository, SaveAttendanceRequest,
};
use crate::domain::roster_service::{map_roster_repository_error, roster_not_found};
use crate::domain::{
    AttendanceDate, AttendanceKey, AttendanceRecord, AttendanceWrite, Caller, ClassRoster, Error,
};

pub(crate) fn map_attendance_repository_error(error: AttendanceRepositoryError) -> Error {
    match error {
        AttendanceRepositoryError::Connection { message } => {
            error!(%message, "attendance repository unavailable");
            Error::service_unavailable(format!("attendance repository unavailable: {message}"))
        }
        AttendanceRepositoryError::Query { message } => {
            error!(%message, "attendance repository query failed");
            Error::internal(format!("attendance repository error: {message}"))
        }
    }
}

pub(crate) fn attendance_not_found(key: &AttendanceKey) -> Error {
    Error::not_found(format!("no attendance recorded for {key}"))
}

/// Attendance service implementing the attendance driving ports.
#[derive(Clone)]
pub struct AttendanceService<A, R> {
    records: Arc<A>,
    rosters: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<A, R> AttendanceService<A, R> {
    pub fn new(records: Arc<A>, rosters: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            records,
            rosters,
            clock,
        }
    }

    fn today(&self) -> AttendanceDate {
        AttendanceDate::of_instant(self.clock.utc())
    }
}

impl<A, R> AttendanceService<A, R>
where
    A: AttendanceRepository,
    R: RosterRepository,
{
    async fn require_roster(&self, key: &AttendanceKey) -> Result<ClassRoster, Error> {
        self.rosters
            .find(&key.department, &key.class_code)
            .await
            .map_err(map_roster_repository_error)?
            .ok_or_else(|| roster_not_found(&key.department, &key.class_code))
    }
}

#[async_trait]
impl<A, R> AttendanceCommand for AttendanceService<A, R>
where
    A: AttendanceRepository,
    R: RosterRepository,
{
    fn ensure_open(&self, date: &AttendanceDate) -> Result<(), Error> {
        let today = self.today();
        if *date < today {
            debug!(%date, %today, "write to past date refused");
            return Err(Error::past_date_locked(date));
        }
        Ok(())
    }

    async fn save(
        &self,
        caller: &Caller,
        request: SaveAttendanceRequest,
    ) -> Result<AttendanceRecord, Error> {
        // A past day fails with past_date_locked whoever the caller is.
        self.ensure_open(&request.date)?;

        let department = target_department(caller, request.department.as_ref())?;
        let key = AttendanceKey {
            department,
            class_code: request.class_code,
            date: request.date,
        };
        self.require_roster(&key).await?;

        let write = AttendanceWrite {
            key,
            entries: request.entries,
            recorded_by: caller.id,
            written_at: self.clock.utc(),
        };
        let record = self
            .records
            .upsert(&write)
            .await
            .map_err(map_attendance_repository_error)?;

        info!(
            department = %record.key.department,
            class_code = %record.key.class_code,
            date = %record.key.date,
            entries = record.entries.len(),
            recorded_by = %caller.id,
            "attendance saved"
        );
        Ok(record)
    }
}

#[async_trait]
impl<A, R> AttendanceQuery for AttendanceService<A, R>
where
    A: AttendanceRepository,
    R: RosterRepository,
{
    async fn get_or_default(
        &self,
        caller: &Caller,
        lookup: AttendanceLookup,
    ) -> Result<AttendanceRecord, Error> {
        let department = target_department(caller, lookup.department.as_ref())?;
        let key = AttendanceKey {
            department,
            class_code: lookup.class_code,
            date: lookup.date,
        };
        let roster = self.require_roster(&key).await?;

        let persisted = self
            .records
            .find(&key)
            .await
            .map_err(map_attendance_repository_error)?;
        Ok(persisted.unwrap_or_else(|| AttendanceRecord::synthesize(&roster, key.date)))
    }

    async fn get_committed(
        &self,
        caller: &Caller,
        key: AttendanceKey,
    ) -> Result<AttendanceRecord, Error> {
        authorize(caller, Scope::PrincipalOnly)?;
        self.records
            .find(&key)
            .await
            .map_err(map_attendance_repository_error)?
            .ok_or_else(|| attendance_not_found(&key))
    }
}

#[cfg(test)]
#[path = "attendance_service_tests.rs"]
mod tests;
