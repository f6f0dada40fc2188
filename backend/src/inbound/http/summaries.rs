//! Principal summaries over committed attendance.
//!
//! ```text
//! GET /api/v1/admin/attendance-summary?department=CSE&classCode=CSE-I&date=2025-01-06
//! GET /api/v1/admin/attendance-summary/by-department?department=CSE&date=2025-01-06
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    AttendanceKey, AttendanceSummary, ClassAttendanceSummary, ClassSummaryLine,
    DepartmentAttendanceSummary,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, require_class_code, require_date, require_department,
};

const DEPARTMENT: FieldName = FieldName::new("department");
const CLASS_CODE: FieldName = FieldName::new("classCode");
const DATE: FieldName = FieldName::new("date");

/// Counts and whole-number percentages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SummaryCounts {
    pub total: u32,
    pub present_count: u32,
    pub absent_count: u32,
    #[schema(maximum = 100)]
    pub present_percent: u32,
    #[schema(maximum = 100)]
    pub absent_percent: u32,
}

impl From<AttendanceSummary> for SummaryCounts {
    fn from(summary: AttendanceSummary) -> Self {
        Self {
            total: summary.total,
            present_count: summary.present_count,
            absent_count: summary.absent_count,
            present_percent: summary.present_percent,
            absent_percent: summary.absent_percent,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassSummaryResponse {
    pub department: String,
    pub class_code: String,
    #[schema(format = "date")]
    pub date: String,
    #[serde(flatten)]
    pub counts: SummaryCounts,
}

impl From<&ClassAttendanceSummary> for ClassSummaryResponse {
    fn from(value: &ClassAttendanceSummary) -> Self {
        Self {
            department: value.key.department.to_string(),
            class_code: value.key.class_code.to_string(),
            date: value.key.date.to_string(),
            counts: value.summary.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassSummaryLineResponse {
    pub class_code: String,
    #[serde(flatten)]
    pub counts: SummaryCounts,
}

impl From<&ClassSummaryLine> for ClassSummaryLineResponse {
    fn from(line: &ClassSummaryLine) -> Self {
        Self {
            class_code: line.class_code.to_string(),
            counts: line.summary.into(),
        }
    }
}

/// Per-class lines in the order the records were first saved.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentSummaryResponse {
    pub department: String,
    #[schema(format = "date")]
    pub date: String,
    pub classes: Vec<ClassSummaryLineResponse>,
}

impl From<&DepartmentAttendanceSummary> for DepartmentSummaryResponse {
    fn from(value: &DepartmentAttendanceSummary) -> Self {
        Self {
            department: value.department.to_string(),
            date: value.date.to_string(),
            classes: value
                .classes
                .iter()
                .map(ClassSummaryLineResponse::from)
                .collect(),
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ClassSummaryQuery {
    #[serde(default, alias = "dept")]
    pub department: Option<String>,
    pub class_code: Option<String>,
    /// Calendar day, `YYYY-MM-DD`.
    pub date: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DepartmentSummaryQuery {
    #[serde(default, alias = "dept")]
    pub department: Option<String>,
    /// Calendar day, `YYYY-MM-DD`.
    pub date: Option<String>,
}

/// Summary of one committed record.
#[utoipa::path(
    get,
    path = "/api/v1/admin/attendance-summary",
    params(ClassSummaryQuery),
    responses(
        (status = 200, description = "Class summary", body = ClassSummaryResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Principal only", body = ErrorSchema),
        (status = 404, description = "Nothing saved for that day", body = ErrorSchema)
    ),
    tags = ["summaries"],
    operation_id = "classAttendanceSummary",
    security(("SessionCookie" = []))
)]
#[get("/admin/attendance-summary")]
pub async fn class_summary(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ClassSummaryQuery>,
) -> ApiResult<web::Json<ClassSummaryResponse>> {
    let caller = session.require_caller(state.identities.as_ref()).await?;
    let ClassSummaryQuery {
        department,
        class_code,
        date,
    } = query.into_inner();
    let key = AttendanceKey {
        department: require_department(department, DEPARTMENT)?,
        class_code: require_class_code(class_code, CLASS_CODE)?,
        date: require_date(date, DATE)?,
    };

    let summary = state.summaries.summarize_class(&caller, key).await?;
    Ok(web::Json(ClassSummaryResponse::from(&summary)))
}

/// Summaries of every class of a department with a record on `date`.
#[utoipa::path(
    get,
    path = "/api/v1/admin/attendance-summary/by-department",
    params(DepartmentSummaryQuery),
    responses(
        (status = 200, description = "Department summary", body = DepartmentSummaryResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Principal only", body = ErrorSchema),
        (status = 404, description = "No records for that day", body = ErrorSchema)
    ),
    tags = ["summaries"],
    operation_id = "departmentAttendanceSummary",
    security(("SessionCookie" = []))
)]
#[get("/admin/attendance-summary/by-department")]
pub async fn department_summary(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<DepartmentSummaryQuery>,
) -> ApiResult<web::Json<DepartmentSummaryResponse>> {
    let caller = session.require_caller(state.identities.as_ref()).await?;
    let DepartmentSummaryQuery { department, date } = query.into_inner();
    let department = require_department(department, DEPARTMENT)?;
    let date = require_date(date, DATE)?;

    let summary = state
        .summaries
        .summarize_department(&caller, department, date)
        .await?;
    Ok(web::Json(DepartmentSummaryResponse::from(&summary)))
}

#[cfg(test)]
#[path = "summaries_tests.rs"]
mod tests;
