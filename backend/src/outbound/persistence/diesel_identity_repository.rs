//! PostgreSQL-backed `IdentityRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{IdentityRepository, IdentityRepositoryError};
use crate::domain::{Department, Email, Identity, Role, RoleKind, StaffId};

use super::error_mapping::{is_unique_violation, map_diesel_error, map_pool_error};
use super::models::{IdentityRow, NewIdentityRow};
use super::pool::{DbPool, PoolError};
use super::schema::identities;

#[derive(Clone)]
pub struct DieselIdentityRepository {
    pool: DbPool,
}

impl DieselIdentityRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> IdentityRepositoryError {
    map_pool_error(error, IdentityRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> IdentityRepositoryError {
    map_diesel_error(
        error,
        IdentityRepositoryError::query,
        IdentityRepositoryError::connection,
    )
}

fn row_to_identity(row: IdentityRow) -> Result<Identity, IdentityRepositoryError> {
    let invalid = |what: &str, err: &dyn std::fmt::Display| {
        IdentityRepositoryError::query(format!("stored identity {}: {what}: {err}", row.id))
    };
    let kind: RoleKind = row.role.parse().map_err(|err: String| invalid("role", &err))?;
    let role = match (kind, row.department.as_deref()) {
        (RoleKind::Principal, _) => Role::Principal,
        (RoleKind::Staff, Some(department)) => {
            Role::Staff(Department::new(department).map_err(|err| invalid("department", &err))?)
        }
        (RoleKind::Staff, None) => {
            return Err(invalid("department", &"missing for staff role"));
        }
    };
    let email = Email::new(&row.email).map_err(|err| invalid("email", &err))?;
    Identity::new(
        StaffId::from_uuid(row.id),
        &row.name,
        email,
        row.credential_secret.as_str(),
        role,
        row.created_at,
    )
    .map_err(|err| invalid("name", &err))
}

#[async_trait]
impl IdentityRepository for DieselIdentityRepository {
    async fn insert(&self, identity: &Identity) -> Result<(), IdentityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = NewIdentityRow {
            id: *identity.id().as_uuid(),
            name: identity.name(),
            email: identity.email().as_str(),
            credential_secret: identity.credential_secret(),
            role: identity.role().kind().as_str(),
            department: identity.department().map(Department::as_str),
            created_at: identity.created_at(),
        };

        diesel::insert_into(identities::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| {
                if is_unique_violation(&err) {
                    IdentityRepositoryError::duplicate_email(identity.email().as_str())
                } else {
                    diesel_error(err)
                }
            })
    }

    async fn find_by_id(&self, id: &StaffId) -> Result<Option<Identity>, IdentityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<IdentityRow> = identities::table
            .filter(identities::id.eq(id.as_uuid()))
            .select(IdentityRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(row_to_identity).transpose()
    }

    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<Identity>, IdentityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<IdentityRow> = identities::table
            .filter(identities::email.eq(email.as_str()))
            .select(IdentityRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(row_to_identity).transpose()
    }

    async fn list_by_role(&self, role: RoleKind) -> Result<Vec<Identity>, IdentityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<IdentityRow> = identities::table
            .filter(identities::role.eq(role.as_str()))
            .order((identities::name.asc(), identities::email.asc()))
            .select(IdentityRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter().map(row_to_identity).collect()
    }

    async fn delete(&self, id: &StaffId) -> Result<bool, IdentityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let deleted = diesel::delete(identities::table.filter(identities::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use chrono::Utc;
    use rstest::rstest;
    use uuid::Uuid;

    fn row(role: &str, department: Option<&str>) -> IdentityRow {
        IdentityRow {
            id: Uuid::new_v4(),
            name: "Ada".to_owned(),
            email: "ada@school.edu".to_owned(),
            credential_secret: "00$00".to_owned(),
            role: role.to_owned(),
            department: department.map(str::to_owned),
            created_at: Utc::now(),
        }
    }

    #[rstest]
    fn staff_rows_carry_their_department() {
        let identity = row_to_identity(row("staff", Some("CSE"))).expect("identity");
        assert_eq!(identity.department().map(Department::as_str), Some("CSE"));
    }

    #[rstest]
    fn principal_rows_have_no_department() {
        let identity = row_to_identity(row("principal", None)).expect("identity");
        assert_eq!(identity.role(), &Role::Principal);
    }

    #[rstest]
    #[case::unknown_role(row("janitor", None))]
    #[case::staff_without_department(row("staff", None))]
    fn malformed_rows_are_query_errors(#[case] row: IdentityRow) {
        assert!(matches!(
            row_to_identity(row),
            Err(IdentityRepositoryError::Query { .. })
        ));
    }
}
