//! Class roster handlers.
//!
//! ```text
//! GET /api/v1/staff/classes[?department=CSE]
//! GET /api/v1/staff/classes/{classCode}/students[?department=CSE]
//! PUT /api/v1/staff/classes/{classCode}/students[?department=CSE] {"students":[{"roll":"1","name":"Asha"}]}
//! GET /api/v1/admin/departments
//! ```

use actix_web::{get, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::ReplaceRosterRequest;
use crate::domain::{ClassRoster, Error, ErrorCode, Student};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, missing_field_error, optional_department, require_class_code,
};

const CLASS_CODE: FieldName = FieldName::new("classCode");
const STUDENTS: FieldName = FieldName::new("students");
const DEPARTMENT: FieldName = FieldName::new("department");

/// Optional department scope; staff may only name their own.
#[derive(Debug, Default, Deserialize, Serialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct RosterScopeQuery {
    /// Defaults to the caller's department.
    #[serde(default, alias = "dept")]
    pub department: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentBody {
    pub roll: String,
    pub name: String,
}

impl From<&Student> for StudentBody {
    fn from(student: &Student) -> Self {
        Self {
            roll: student.roll().to_owned(),
            name: student.name().to_owned(),
        }
    }
}

/// Student list of one class.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentsResponse {
    pub students: Vec<StudentBody>,
}

/// Roster with its key.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassRosterResponse {
    pub department: String,
    pub class_code: String,
    pub display_name: String,
    pub students: Vec<StudentBody>,
}

impl From<&ClassRoster> for ClassRosterResponse {
    fn from(roster: &ClassRoster) -> Self {
        Self {
            department: roster.department.to_string(),
            class_code: roster.class_code.to_string(),
            display_name: roster.display_name.clone(),
            students: roster.students.iter().map(StudentBody::from).collect(),
        }
    }
}

/// Full replacement of a class roster.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceStudentsRequest {
    pub display_name: Option<String>,
    pub students: Option<Vec<StudentBody>>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentsResponse {
    pub departments: Vec<String>,
}

fn parse_students(students: Option<Vec<StudentBody>>) -> ApiResult<Vec<Student>> {
    let students = students.ok_or_else(|| missing_field_error(STUDENTS))?;
    students
        .iter()
        .enumerate()
        .map(|(index, body)| {
            Student::new(&body.roll, &body.name).map_err(|err| {
                Error::invalid_request(format!("students[{index}]: {err}")).with_details(json!({
                    "field": STUDENTS.as_str(),
                    "index": index,
                    "code": "invalid_student",
                }))
            })
        })
        .collect()
}

/// Rosters of the caller's own department.
#[utoipa::path(
    get,
    path = "/api/v1/staff/classes",
    params(RosterScopeQuery),
    responses(
        (status = 200, description = "Department rosters", body = [ClassRosterResponse]),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Staff only", body = ErrorSchema)
    ),
    tags = ["rosters"],
    operation_id = "listClasses",
    security(("SessionCookie" = []))
)]
#[get("/staff/classes")]
pub async fn list_classes(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<RosterScopeQuery>,
) -> ApiResult<web::Json<Vec<ClassRosterResponse>>> {
    let caller = session.require_caller(state.identities.as_ref()).await?;
    let department = optional_department(query.into_inner().department, DEPARTMENT)?;
    let rosters = state.roster_query.list_rosters(&caller, department).await?;
    Ok(web::Json(rosters.iter().map(ClassRosterResponse::from).collect()))
}

/// Students of one class. An unknown class yields an empty list.
#[utoipa::path(
    get,
    path = "/api/v1/staff/classes/{class_code}/students",
    params(
        ("class_code" = String, Path, description = "Class code"),
        RosterScopeQuery
    ),
    responses(
        (status = 200, description = "Enrolled students", body = StudentsResponse),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Staff only", body = ErrorSchema)
    ),
    tags = ["rosters"],
    operation_id = "getClassStudents",
    security(("SessionCookie" = []))
)]
#[get("/staff/classes/{class_code}/students")]
pub async fn get_class_students(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    query: web::Query<RosterScopeQuery>,
) -> ApiResult<web::Json<StudentsResponse>> {
    let caller = session.require_caller(state.identities.as_ref()).await?;
    let class_code = require_class_code(Some(path.into_inner()), CLASS_CODE)?;
    let department = optional_department(query.into_inner().department, DEPARTMENT)?;

    let students = match state
        .roster_query
        .get_roster(&caller, department, &class_code)
        .await
    {
        Ok(roster) => roster.students.iter().map(StudentBody::from).collect(),
        Err(error) if error.code() == ErrorCode::NotFound => Vec::new(),
        Err(error) => return Err(error),
    };
    Ok(web::Json(StudentsResponse { students }))
}

/// Create or replace the roster of one class in the caller's department.
#[utoipa::path(
    put,
    path = "/api/v1/staff/classes/{class_code}/students",
    params(
        ("class_code" = String, Path, description = "Class code"),
        RosterScopeQuery
    ),
    request_body = ReplaceStudentsRequest,
    responses(
        (status = 200, description = "Stored roster", body = ClassRosterResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Staff only", body = ErrorSchema)
    ),
    tags = ["rosters"],
    operation_id = "replaceClassStudents",
    security(("SessionCookie" = []))
)]
#[put("/staff/classes/{class_code}/students")]
pub async fn replace_class_students(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    query: web::Query<RosterScopeQuery>,
    payload: web::Json<ReplaceStudentsRequest>,
) -> ApiResult<web::Json<ClassRosterResponse>> {
    let caller = session.require_caller(state.identities.as_ref()).await?;
    let class_code = require_class_code(Some(path.into_inner()), CLASS_CODE)?;
    let department = optional_department(query.into_inner().department, DEPARTMENT)?;
    let ReplaceStudentsRequest {
        display_name,
        students,
    } = payload.into_inner();

    let roster = state
        .roster_command
        .replace_roster(
            &caller,
            ReplaceRosterRequest {
                department,
                class_code,
                display_name,
                students: parse_students(students)?,
            },
        )
        .await?;
    Ok(web::Json(ClassRosterResponse::from(&roster)))
}

/// Departments that have at least one roster.
#[utoipa::path(
    get,
    path = "/api/v1/admin/departments",
    responses(
        (status = 200, description = "Sorted department names", body = DepartmentsResponse),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Principal only", body = ErrorSchema)
    ),
    tags = ["rosters"],
    operation_id = "listDepartments",
    security(("SessionCookie" = []))
)]
#[get("/admin/departments")]
pub async fn list_departments(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<DepartmentsResponse>> {
    let caller = session.require_caller(state.identities.as_ref()).await?;
    let departments = state.roster_query.list_departments(&caller).await?;
    Ok(web::Json(DepartmentsResponse {
        departments: departments.iter().map(ToString::to_string).collect(),
    }))
}

#[cfg(test)]
#[path = "rosters_tests.rs"]
mod tests;
