//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every `/api/v1` handler plus the health probes, the
//! request/response DTOs and the session cookie security scheme. Swagger UI
//! serves it in debug builds and `openapi-dump` prints it for tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::attendance::{
    AttendanceEntryBody, AttendanceRecordResponse, SaveAttendanceBody,
};
use crate::inbound::http::auth::{IdentityResponse, LoginRequest};
use crate::inbound::http::news::{CreateNewsRequest, NewsPostResponse};
use crate::inbound::http::rosters::{
    ClassRosterResponse, DepartmentsResponse, ReplaceStudentsRequest, StudentBody,
    StudentsResponse,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::staff::CreateStaffRequest;
use crate::inbound::http::summaries::{
    ClassSummaryLineResponse, ClassSummaryResponse, DepartmentSummaryResponse, SummaryCounts,
};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Campus attendance API",
        description = "Staff directory, class rosters, daily attendance, summaries and department news."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::current_identity,
        crate::inbound::http::staff::create_staff,
        crate::inbound::http::staff::list_staff,
        crate::inbound::http::staff::delete_staff,
        crate::inbound::http::rosters::list_classes,
        crate::inbound::http::rosters::get_class_students,
        crate::inbound::http::rosters::replace_class_students,
        crate::inbound::http::rosters::list_departments,
        crate::inbound::http::attendance::get_staff_attendance,
        crate::inbound::http::attendance::save_staff_attendance,
        crate::inbound::http::attendance::get_committed_attendance,
        crate::inbound::http::summaries::class_summary,
        crate::inbound::http::summaries::department_summary,
        crate::inbound::http::news::list_public_news,
        crate::inbound::http::news::list_department_news,
        crate::inbound::http::news::create_news,
        crate::inbound::http::news::delete_news,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        LoginRequest,
        IdentityResponse,
        CreateStaffRequest,
        StudentBody,
        StudentsResponse,
        ClassRosterResponse,
        ReplaceStudentsRequest,
        DepartmentsResponse,
        AttendanceEntryBody,
        AttendanceRecordResponse,
        SaveAttendanceBody,
        SummaryCounts,
        ClassSummaryResponse,
        ClassSummaryLineResponse,
        DepartmentSummaryResponse,
        CreateNewsRequest,
        NewsPostResponse,
    )),
    tags(
        (name = "auth", description = "Sign-in and the current identity"),
        (name = "staff", description = "Principal-only staff administration"),
        (name = "rosters", description = "Class rosters per department"),
        (name = "attendance", description = "Daily attendance ledger"),
        (name = "summaries", description = "Principal attendance summaries"),
        (name = "news", description = "Department news feeds"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
