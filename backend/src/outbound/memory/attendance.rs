//! In-memory attendance ledger.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{AttendanceRepository, AttendanceRepositoryError};
use crate::domain::{
    AttendanceDate, AttendanceKey, AttendanceRecord, AttendanceWrite, Department, RecordAudit,
};

/// Records in insertion order, which is creation order.
#[derive(Debug, Default)]
pub struct InMemoryAttendanceRepository {
    store: Mutex<Vec<AttendanceRecord>>,
}

impl InMemoryAttendanceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AttendanceRepository for InMemoryAttendanceRepository {
    async fn find(
        &self,
        key: &AttendanceKey,
    ) -> Result<Option<AttendanceRecord>, AttendanceRepositoryError> {
        let guard = super::lock(&self.store, AttendanceRepositoryError::query)?;
        Ok(guard.iter().find(|record| record.key == *key).cloned())
    }

    async fn upsert(
        &self,
        write: &AttendanceWrite,
    ) -> Result<AttendanceRecord, AttendanceRepositoryError> {
        let mut guard = super::lock(&self.store, AttendanceRepositoryError::query)?;
        if let Some(existing) = guard.iter_mut().find(|record| record.key == write.key) {
            let created_at = existing
                .audit
                .as_ref()
                .map_or(write.written_at, |audit| audit.created_at);
            existing.entries = write.entries.clone();
            existing.audit = Some(RecordAudit {
                recorded_by: write.recorded_by,
                created_at,
                updated_at: write.written_at,
            });
            return Ok(existing.clone());
        }

        let record = AttendanceRecord {
            key: write.key.clone(),
            entries: write.entries.clone(),
            audit: Some(RecordAudit {
                recorded_by: write.recorded_by,
                created_at: write.written_at,
                updated_at: write.written_at,
            }),
        };
        guard.push(record.clone());
        Ok(record)
    }

    async fn list_for_department_on(
        &self,
        department: &Department,
        date: &AttendanceDate,
    ) -> Result<Vec<AttendanceRecord>, AttendanceRepositoryError> {
        let guard = super::lock(&self.store, AttendanceRepositoryError::query)?;
        Ok(guard
            .iter()
            .filter(|record| record.key.department == *department && record.key.date == *date)
            .cloned()
            .collect())
    }
}
