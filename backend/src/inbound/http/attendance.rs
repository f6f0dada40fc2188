//! Attendance ledger handlers.
//!
//! ```text
//! GET /api/v1/staff/attendance?classCode=CSE-I&date=2025-01-06
//! PUT /api/v1/staff/attendance {"classCode":"CSE-I","date":"2025-01-06","entries":[{"roll":"1","status":"absent"}]}
//! GET /api/v1/admin/attendance?department=CSE&classCode=CSE-I&date=2025-01-06
//! ```
//!
//! Staff reads of an unsaved day return an all-present default without
//! audit fields. The principal view only returns committed records.

use actix_web::{get, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{AttendanceLookup, SaveAttendanceRequest};
use crate::domain::{
    AttendanceDate, AttendanceEntry, AttendanceKey, AttendanceRecord, AttendanceStatus, Error,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, ValidationCode, invalid_field_error, missing_field_error, optional_department,
    require_class_code, require_date, require_department,
};

const DEPARTMENT: FieldName = FieldName::new("department");
const CLASS_CODE: FieldName = FieldName::new("classCode");
const DATE: FieldName = FieldName::new("date");
const ENTRIES: FieldName = FieldName::new("entries");

/// One student's status. `status` is `present` or `absent`; `P`/`A` are
/// accepted on input.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEntryBody {
    pub roll: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[schema(example = "present")]
    pub status: String,
}

impl From<&AttendanceEntry> for AttendanceEntryBody {
    fn from(entry: &AttendanceEntry) -> Self {
        Self {
            roll: entry.roll.clone(),
            name: entry.name.clone(),
            status: entry.status.to_string(),
        }
    }
}

/// Attendance of one class on one day.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecordResponse {
    pub department: String,
    pub class_code: String,
    #[schema(format = "date", example = "2025-01-06")]
    pub date: String,
    pub entries: Vec<AttendanceEntryBody>,
    /// Absent on a default that has never been saved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&AttendanceRecord> for AttendanceRecordResponse {
    fn from(record: &AttendanceRecord) -> Self {
        let audit = record.audit.as_ref();
        Self {
            department: record.key.department.to_string(),
            class_code: record.key.class_code.to_string(),
            date: record.key.date.to_string(),
            entries: record.entries.iter().map(AttendanceEntryBody::from).collect(),
            recorded_by: audit.map(|audit| audit.recorded_by.to_string()),
            created_at: audit.map(|audit| audit.created_at),
            updated_at: audit.map(|audit| audit.updated_at),
        }
    }
}

/// Staff lookup; `department` defaults to the caller's own.
#[derive(Debug, Default, Deserialize, Serialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct StaffAttendanceQuery {
    #[serde(default, alias = "dept")]
    pub department: Option<String>,
    pub class_code: Option<String>,
    /// Calendar day, `YYYY-MM-DD`.
    pub date: Option<String>,
}

/// Principal lookup of a committed record.
#[derive(Debug, Default, Deserialize, Serialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CommittedAttendanceQuery {
    #[serde(default, alias = "dept")]
    pub department: Option<String>,
    pub class_code: Option<String>,
    /// Calendar day, `YYYY-MM-DD`.
    pub date: Option<String>,
}

/// Full replacement of one day's entries.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveAttendanceBody {
    #[serde(default, alias = "dept")]
    pub department: Option<String>,
    pub class_code: Option<String>,
    #[schema(format = "date")]
    pub date: Option<String>,
    #[serde(default, alias = "records")]
    pub entries: Option<Vec<AttendanceEntryBody>>,
}

fn invalid_entry(index: usize, message: impl std::fmt::Display, value: &str) -> Error {
    Error::invalid_request(format!("entries[{index}]: {message}")).with_details(json!({
        "field": ENTRIES.as_str(),
        "index": index,
        "value": value,
        "code": "invalid_entry",
    }))
}

/// Read `field` from a raw body without assuming the rest of its shape.
fn date_field(payload: &Value, field: FieldName) -> ApiResult<Option<String>> {
    match payload.get(field.as_str()) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(raw)) => Ok(Some(raw.clone())),
        Some(other) => Err(invalid_field_error(
            field,
            ValidationCode::InvalidDate,
            format!("{} must be a calendar day in YYYY-MM-DD form", field.as_str()),
            &other.to_string(),
        )),
    }
}

fn parse_entries(entries: Option<Vec<AttendanceEntryBody>>) -> ApiResult<Vec<AttendanceEntry>> {
    let entries = entries.ok_or_else(|| missing_field_error(ENTRIES))?;
    entries
        .iter()
        .enumerate()
        .map(|(index, body)| {
            let status: AttendanceStatus = body
                .status
                .parse()
                .map_err(|err| invalid_entry(index, err, &body.status))?;
            AttendanceEntry::new(&body.roll, body.name.as_deref(), status)
                .map_err(|err| invalid_entry(index, err, &body.roll))
        })
        .collect()
}

/// Attendance for a class of the caller's department, defaulting to all
/// present when nothing was saved.
#[utoipa::path(
    get,
    path = "/api/v1/staff/attendance",
    params(StaffAttendanceQuery),
    responses(
        (status = 200, description = "Saved or default record", body = AttendanceRecordResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Staff of that department only", body = ErrorSchema),
        (status = 404, description = "Unknown class", body = ErrorSchema)
    ),
    tags = ["attendance"],
    operation_id = "getAttendance",
    security(("SessionCookie" = []))
)]
#[get("/staff/attendance")]
pub async fn get_staff_attendance(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<StaffAttendanceQuery>,
) -> ApiResult<web::Json<AttendanceRecordResponse>> {
    let caller = session.require_caller(state.identities.as_ref()).await?;
    let StaffAttendanceQuery {
        department,
        class_code,
        date,
    } = query.into_inner();
    let lookup = AttendanceLookup {
        department: optional_department(department, DEPARTMENT)?,
        class_code: require_class_code(class_code, CLASS_CODE)?,
        date: require_date(date, DATE)?,
    };

    let record = state.attendance_query.get_or_default(&caller, lookup).await?;
    Ok(web::Json(AttendanceRecordResponse::from(&record)))
}

/// Save a day's attendance, replacing any earlier entries.
///
/// Past days are refused with `past_date_locked` before the rest of the
/// payload is examined, so the body is read untyped until the date passes.
#[utoipa::path(
    put,
    path = "/api/v1/staff/attendance",
    request_body = SaveAttendanceBody,
    responses(
        (status = 200, description = "Stored record", body = AttendanceRecordResponse),
        (status = 400, description = "Invalid request or past date", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Staff of that department only", body = ErrorSchema),
        (status = 404, description = "Unknown class", body = ErrorSchema)
    ),
    tags = ["attendance"],
    operation_id = "saveAttendance",
    security(("SessionCookie" = []))
)]
#[put("/staff/attendance")]
pub async fn save_staff_attendance(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<Value>,
) -> ApiResult<web::Json<AttendanceRecordResponse>> {
    let caller = session.require_caller(state.identities.as_ref()).await?;
    let payload = payload.into_inner();
    let date: AttendanceDate = require_date(date_field(&payload, DATE)?, DATE)?;
    state.attendance_command.ensure_open(&date)?;

    let SaveAttendanceBody {
        department,
        class_code,
        entries,
        ..
    } = serde_json::from_value(payload)
        .map_err(|err| Error::invalid_request(format!("invalid JSON body: {err}")))?;
    let request = SaveAttendanceRequest {
        department: optional_department(department, DEPARTMENT)?,
        class_code: require_class_code(class_code, CLASS_CODE)?,
        date,
        entries: parse_entries(entries)?,
    };
    let record = state.attendance_command.save(&caller, request).await?;
    Ok(web::Json(AttendanceRecordResponse::from(&record)))
}

/// Committed attendance of any department. Never synthesised.
#[utoipa::path(
    get,
    path = "/api/v1/admin/attendance",
    params(CommittedAttendanceQuery),
    responses(
        (status = 200, description = "Committed record", body = AttendanceRecordResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Principal only", body = ErrorSchema),
        (status = 404, description = "Nothing saved for that day", body = ErrorSchema)
    ),
    tags = ["attendance"],
    operation_id = "getCommittedAttendance",
    security(("SessionCookie" = []))
)]
#[get("/admin/attendance")]
pub async fn get_committed_attendance(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<CommittedAttendanceQuery>,
) -> ApiResult<web::Json<AttendanceRecordResponse>> {
    let caller = session.require_caller(state.identities.as_ref()).await?;
    let CommittedAttendanceQuery {
        department,
        class_code,
        date,
    } = query.into_inner();
    let key = AttendanceKey {
        department: require_department(department, DEPARTMENT)?,
        class_code: require_class_code(class_code, CLASS_CODE)?,
        date: require_date(date, DATE)?,
    };

    let record = state.attendance_query.get_committed(&caller, key).await?;
    Ok(web::Json(AttendanceRecordResponse::from(&record)))
}

#[cfg(test)]
#[path = "attendance_tests.rs"]
mod tests;
