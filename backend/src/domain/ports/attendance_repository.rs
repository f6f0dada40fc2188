//! Port for the attendance ledger.
//!
//! Entries are stored as given. Adapters do not check rolls against the
//! roster; callers own that consistency.

use async_trait::async_trait;

use crate::domain::{AttendanceDate, AttendanceKey, AttendanceRecord, AttendanceWrite, Department};

use super::define_port_error;

define_port_error! {
    /// Errors raised by attendance repository adapters.
    pub enum AttendanceRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "attendance repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "attendance repository query failed: {message}",
    }
}

/// Keyed store of attendance records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    async fn find(
        &self,
        key: &AttendanceKey,
    ) -> Result<Option<AttendanceRecord>, AttendanceRepositoryError>;

    /// Insert or replace the entries at `write.key` and return the stored
    /// record. `created_at` of an existing record is preserved; concurrent
    /// writers resolve last-write-wins.
    async fn upsert(
        &self,
        write: &AttendanceWrite,
    ) -> Result<AttendanceRecord, AttendanceRepositoryError>;

    /// Persisted records of `department` on `date`, in creation order.
    async fn list_for_department_on(
        &self,
        department: &Department,
        date: &AttendanceDate,
    ) -> Result<Vec<AttendanceRecord>, AttendanceRepositoryError>;
}
