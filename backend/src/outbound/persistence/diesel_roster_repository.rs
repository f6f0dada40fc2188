//! PostgreSQL-backed `RosterRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{RosterRepository, RosterRepositoryError};
use crate::domain::{ClassCode, ClassRoster, Department, Student};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{
    ClassRosterRow, NewClassRosterRow, StudentDocument, decode_documents, encode_documents,
};
use super::pool::{DbPool, PoolError};
use super::schema::class_rosters;

#[derive(Clone)]
pub struct DieselRosterRepository {
    pool: DbPool,
}

impl DieselRosterRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> RosterRepositoryError {
    map_pool_error(error, RosterRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> RosterRepositoryError {
    map_diesel_error(
        error,
        RosterRepositoryError::query,
        RosterRepositoryError::connection,
    )
}

fn row_to_roster(row: ClassRosterRow) -> Result<ClassRoster, RosterRepositoryError> {
    let department = Department::new(&row.department)
        .map_err(|err| RosterRepositoryError::query(format!("stored department: {err}")))?;
    let class_code = ClassCode::new(&row.class_code)
        .map_err(|err| RosterRepositoryError::query(format!("stored class code: {err}")))?;
    let students = decode_documents::<Student, StudentDocument>(row.students).map_err(|err| {
        RosterRepositoryError::query(format!("stored roster {department}/{class_code}: {err}"))
    })?;
    Ok(ClassRoster::new(
        department,
        class_code,
        Some(&row.display_name),
        students,
    ))
}

#[async_trait]
impl RosterRepository for DieselRosterRepository {
    async fn find(
        &self,
        department: &Department,
        class_code: &ClassCode,
    ) -> Result<Option<ClassRoster>, RosterRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<ClassRosterRow> = class_rosters::table
            .filter(class_rosters::department.eq(department.as_str()))
            .filter(class_rosters::class_code.eq(class_code.as_str()))
            .select(ClassRosterRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(row_to_roster).transpose()
    }

    async fn upsert(&self, roster: &ClassRoster) -> Result<(), RosterRepositoryError> {
        let students = encode_documents::<_, StudentDocument>(&roster.students)
            .map_err(RosterRepositoryError::query)?;
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = NewClassRosterRow {
            department: roster.department.as_str(),
            class_code: roster.class_code.as_str(),
            display_name: roster.display_name.as_str(),
            students: &students,
        };

        diesel::insert_into(class_rosters::table)
            .values(&row)
            .on_conflict((class_rosters::department, class_rosters::class_code))
            .do_update()
            .set((
                class_rosters::display_name.eq(excluded(class_rosters::display_name)),
                class_rosters::students.eq(excluded(class_rosters::students)),
                class_rosters::updated_at.eq(diesel::dsl::now),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn list_for_department(
        &self,
        department: &Department,
    ) -> Result<Vec<ClassRoster>, RosterRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<ClassRosterRow> = class_rosters::table
            .filter(class_rosters::department.eq(department.as_str()))
            .order(class_rosters::class_code.asc())
            .select(ClassRosterRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter().map(row_to_roster).collect()
    }

    async fn list_departments(&self) -> Result<Vec<Department>, RosterRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let names: Vec<String> = class_rosters::table
            .select(class_rosters::department)
            .distinct()
            .order(class_rosters::department.asc())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        names
            .iter()
            .map(|name| {
                Department::new(name)
                    .map_err(|err| RosterRepositoryError::query(format!("stored department: {err}")))
            })
            .collect()
    }
}
