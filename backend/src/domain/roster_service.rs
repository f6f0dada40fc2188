//! Class roster services.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use crate::domain::access_policy::{Scope, authorize, target_department};
use crate::domain::ports::{
    ReplaceRosterRequest, RosterCommand, RosterQuery, RosterRepository, RosterRepositoryError,
};
use crate::domain::{Caller, ClassCode, ClassRoster, Department, Error};

pub(crate) fn map_roster_repository_error(error: RosterRepositoryError) -> Error {
    match error {
        RosterRepositoryError::Connection { message } => {
            error!(%message, "roster repository unavailable");
            Error::service_unavailable(format!("roster repository unavailable: {message}"))
        }
        RosterRepositoryError::Query { message } => {
            error!(%message, "roster repository query failed");
            Error::internal(format!("roster repository error: {message}"))
        }
    }
}

pub(crate) fn roster_not_found(department: &Department, class_code: &ClassCode) -> Error {
    Error::not_found(format!(
        "class {class_code} not found in department {department}"
    ))
}

/// Roster service implementing the roster driving ports.
#[derive(Clone)]
pub struct RosterService<R> {
    rosters: Arc<R>,
}

impl<R> RosterService<R> {
    pub fn new(rosters: Arc<R>) -> Self {
        Self { rosters }
    }
}

#[async_trait]
impl<R> RosterCommand for RosterService<R>
where
    R: RosterRepository,
{
    async fn replace_roster(
        &self,
        caller: &Caller,
        request: ReplaceRosterRequest,
    ) -> Result<ClassRoster, Error> {
        let department = target_department(caller, request.department.as_ref())?;
        let roster = ClassRoster::new(
            department,
            request.class_code,
            request.display_name.as_deref(),
            request.students,
        );

        self.rosters
            .upsert(&roster)
            .await
            .map_err(map_roster_repository_error)?;

        info!(
            department = %roster.department,
            class_code = %roster.class_code,
            students = roster.students.len(),
            "roster replaced"
        );
        Ok(roster)
    }
}

#[async_trait]
impl<R> RosterQuery for RosterService<R>
where
    R: RosterRepository,
{
    async fn get_roster(
        &self,
        caller: &Caller,
        department: Option<Department>,
        class_code: &ClassCode,
    ) -> Result<ClassRoster, Error> {
        let department = target_department(caller, department.as_ref())?;
        self.rosters
            .find(&department, class_code)
            .await
            .map_err(map_roster_repository_error)?
            .ok_or_else(|| roster_not_found(&department, class_code))
    }

    async fn list_rosters(
        &self,
        caller: &Caller,
        department: Option<Department>,
    ) -> Result<Vec<ClassRoster>, Error> {
        let department = target_department(caller, department.as_ref())?;
        self.rosters
            .list_for_department(&department)
            .await
            .map_err(map_roster_repository_error)
    }

    async fn list_departments(&self, caller: &Caller) -> Result<Vec<Department>, Error> {
        authorize(caller, Scope::PrincipalOnly)?;
        self.rosters
            .list_departments()
            .await
            .map_err(map_roster_repository_error)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::MockRosterRepository;
    use crate::domain::{ErrorCode, RoleKind, StaffId, Student};
    use mockall::predicate::eq;
    use rstest::{fixture, rstest};
    use serde_json::json;

    fn department(name: &str) -> Department {
        Department::new(name).expect("department")
    }

    fn class_code(code: &str) -> ClassCode {
        ClassCode::new(code).expect("class code")
    }

    #[fixture]
    fn cse_staff() -> Caller {
        Caller::new(StaffId::random(), RoleKind::Staff, Some(department("CSE")))
    }

    #[fixture]
    fn principal() -> Caller {
        Caller::new(StaffId::random(), RoleKind::Principal, None)
    }

    fn request(department: Option<&str>, students: Vec<Student>) -> ReplaceRosterRequest {
        ReplaceRosterRequest {
            department: department.map(|name| Department::new(name).expect("department")),
            class_code: class_code("CSE-I"),
            display_name: None,
            students,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn replace_roster_upserts_in_callers_department(cse_staff: Caller) {
        let students = vec![
            Student::new("2", "B").expect("student"),
            Student::new("1", "A").expect("student"),
            Student::new("1", "A again").expect("student"),
        ];
        let mut repo = MockRosterRepository::new();
        repo.expect_upsert()
            .withf(|roster| {
                roster.department.as_str() == "CSE"
                    && roster.display_name == "CSE-I"
                    && roster.students.len() == 3
                    && roster.students[0].roll() == "2"
            })
            .times(1)
            .return_once(|_| Ok(()));

        let roster = RosterService::new(Arc::new(repo))
            .replace_roster(&cse_staff, request(None, students))
            .await
            .expect("replaced");

        assert_eq!(roster.students.len(), 3);
    }

    #[rstest]
    #[tokio::test]
    async fn replace_roster_rejects_other_departments(cse_staff: Caller) {
        let mut repo = MockRosterRepository::new();
        repo.expect_upsert().times(0);

        let error = RosterService::new(Arc::new(repo))
            .replace_roster(&cse_staff, request(Some("ECE"), Vec::new()))
            .await
            .expect_err("denied");

        assert_eq!(error.code(), ErrorCode::Forbidden);
        assert_eq!(
            error.details().and_then(|d| d.get("reason")),
            Some(&json!("cross-department"))
        );
    }

    #[rstest]
    #[tokio::test]
    async fn principal_cannot_edit_rosters(principal: Caller) {
        let mut repo = MockRosterRepository::new();
        repo.expect_upsert().times(0);

        let error = RosterService::new(Arc::new(repo))
            .replace_roster(&principal, request(Some("CSE"), Vec::new()))
            .await
            .expect_err("denied");

        assert_eq!(
            error.details().and_then(|d| d.get("reason")),
            Some(&json!("staff-only"))
        );
    }

    #[rstest]
    #[tokio::test]
    async fn get_roster_reports_missing_class(cse_staff: Caller) {
        let mut repo = MockRosterRepository::new();
        repo.expect_find()
            .with(eq(department("CSE")), eq(class_code("CSE-IX")))
            .return_once(|_, _| Ok(None));

        let error = RosterService::new(Arc::new(repo))
            .get_roster(&cse_staff, None, &class_code("CSE-IX"))
            .await
            .expect_err("missing");

        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn list_departments_is_principal_only(cse_staff: Caller, principal: Caller) {
        let mut repo = MockRosterRepository::new();
        repo.expect_list_departments()
            .times(1)
            .return_once(|| Ok(vec![department("CSE"), department("ECE")]));
        let service = RosterService::new(Arc::new(repo));

        let denied = service.list_departments(&cse_staff).await.expect_err("denied");
        let departments = service.list_departments(&principal).await.expect("listed");

        assert_eq!(denied.code(), ErrorCode::Forbidden);
        assert_eq!(departments.len(), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn query_failure_is_not_an_empty_listing(cse_staff: Caller) {
        let mut repo = MockRosterRepository::new();
        repo.expect_list_for_department()
            .return_once(|_| Err(RosterRepositoryError::query("syntax error")));

        let error = RosterService::new(Arc::new(repo))
            .list_rosters(&cse_staff, None)
            .await
            .expect_err("failure surfaces");

        assert_eq!(error.code(), ErrorCode::InternalError);
    }
}
