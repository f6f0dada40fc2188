//! PostgreSQL-backed `AttendanceRepository`.
//!
//! Saves are a single `INSERT .. ON CONFLICT DO UPDATE .. RETURNING`, so the
//! stored row, with its original `created_at`, comes back from one statement.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AttendanceRepository, AttendanceRepositoryError};
use crate::domain::{
    AttendanceDate, AttendanceEntry, AttendanceKey, AttendanceRecord, AttendanceWrite, ClassCode,
    Department, RecordAudit, StaffId,
};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{
    AttendanceRecordRow, EntryDocument, NewAttendanceRecordRow, decode_documents, encode_documents,
};
use super::pool::{DbPool, PoolError};
use super::schema::attendance_records;

#[derive(Clone)]
pub struct DieselAttendanceRepository {
    pool: DbPool,
}

impl DieselAttendanceRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> AttendanceRepositoryError {
    map_pool_error(error, AttendanceRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> AttendanceRepositoryError {
    map_diesel_error(
        error,
        AttendanceRepositoryError::query,
        AttendanceRepositoryError::connection,
    )
}

fn row_to_record(row: AttendanceRecordRow) -> Result<AttendanceRecord, AttendanceRepositoryError> {
    let department = Department::new(&row.department)
        .map_err(|err| AttendanceRepositoryError::query(format!("stored department: {err}")))?;
    let class_code = ClassCode::new(&row.class_code)
        .map_err(|err| AttendanceRepositoryError::query(format!("stored class code: {err}")))?;
    let key = AttendanceKey {
        department,
        class_code,
        date: AttendanceDate::from_naive(row.attendance_date),
    };
    let entries = decode_documents::<AttendanceEntry, EntryDocument>(row.entries)
        .map_err(|err| AttendanceRepositoryError::query(format!("stored record {key}: {err}")))?;
    Ok(AttendanceRecord {
        key,
        entries,
        audit: Some(RecordAudit {
            recorded_by: StaffId::from_uuid(row.recorded_by),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }),
    })
}

#[async_trait]
impl AttendanceRepository for DieselAttendanceRepository {
    async fn find(
        &self,
        key: &AttendanceKey,
    ) -> Result<Option<AttendanceRecord>, AttendanceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<AttendanceRecordRow> = attendance_records::table
            .filter(attendance_records::department.eq(key.department.as_str()))
            .filter(attendance_records::class_code.eq(key.class_code.as_str()))
            .filter(attendance_records::attendance_date.eq(key.date.as_naive()))
            .select(AttendanceRecordRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(row_to_record).transpose()
    }

    async fn upsert(
        &self,
        write: &AttendanceWrite,
    ) -> Result<AttendanceRecord, AttendanceRepositoryError> {
        let entries = encode_documents::<_, EntryDocument>(&write.entries)
            .map_err(AttendanceRepositoryError::query)?;
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = NewAttendanceRecordRow {
            department: write.key.department.as_str(),
            class_code: write.key.class_code.as_str(),
            attendance_date: write.key.date.as_naive(),
            entries: &entries,
            recorded_by: *write.recorded_by.as_uuid(),
            created_at: write.written_at,
            updated_at: write.written_at,
        };

        let stored: AttendanceRecordRow = diesel::insert_into(attendance_records::table)
            .values(&row)
            .on_conflict((
                attendance_records::department,
                attendance_records::class_code,
                attendance_records::attendance_date,
            ))
            .do_update()
            .set((
                attendance_records::entries.eq(excluded(attendance_records::entries)),
                attendance_records::recorded_by.eq(excluded(attendance_records::recorded_by)),
                attendance_records::updated_at.eq(excluded(attendance_records::updated_at)),
            ))
            .returning(AttendanceRecordRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        row_to_record(stored)
    }

    async fn list_for_department_on(
        &self,
        department: &Department,
        date: &AttendanceDate,
    ) -> Result<Vec<AttendanceRecord>, AttendanceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<AttendanceRecordRow> = attendance_records::table
            .filter(attendance_records::department.eq(department.as_str()))
            .filter(attendance_records::attendance_date.eq(date.as_naive()))
            .order((
                attendance_records::created_at.asc(),
                attendance_records::class_code.asc(),
            ))
            .select(AttendanceRecordRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter().map(row_to_record).collect()
    }
}
