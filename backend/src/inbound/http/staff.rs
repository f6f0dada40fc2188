//! Principal-only staff administration.
//!
//! ```text
//! POST   /api/v1/admin/staff {"name":"Ravi","email":"ravi@school.edu","password":"pw","department":"CSE"}
//! GET    /api/v1/admin/staff
//! DELETE /api/v1/admin/staff/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroizing;

use crate::domain::ports::NewStaffRequest;
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::IdentityResponse;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_staff_id, require_department, require_email, require_text,
};

/// Request body for creating a staff identity. Every field is required.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStaffRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub department: Option<String>,
}

fn parse_create_staff(body: CreateStaffRequest) -> ApiResult<NewStaffRequest> {
    Ok(NewStaffRequest {
        name: require_text(body.name, FieldName::new("name"))?,
        email: require_email(body.email, FieldName::new("email"))?,
        password: Zeroizing::new(require_text(body.password, FieldName::new("password"))?),
        department: require_department(body.department, FieldName::new("department"))?,
    })
}

/// Create a staff identity.
#[utoipa::path(
    post,
    path = "/api/v1/admin/staff",
    request_body = CreateStaffRequest,
    responses(
        (status = 201, description = "Staff created", body = IdentityResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Principal only", body = ErrorSchema),
        (status = 409, description = "Email already exists", body = ErrorSchema)
    ),
    tags = ["staff"],
    operation_id = "createStaff",
    security(("SessionCookie" = []))
)]
#[post("/admin/staff")]
pub async fn create_staff(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateStaffRequest>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_caller(state.identities.as_ref()).await?;
    let request = parse_create_staff(payload.into_inner())?;
    let identity = state.staff_admin.create_staff(&caller, request).await?;
    Ok(HttpResponse::Created().json(IdentityResponse::from(&identity)))
}

/// List staff identities by name then email.
#[utoipa::path(
    get,
    path = "/api/v1/admin/staff",
    responses(
        (status = 200, description = "Staff directory", body = [IdentityResponse]),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Principal only", body = ErrorSchema)
    ),
    tags = ["staff"],
    operation_id = "listStaff",
    security(("SessionCookie" = []))
)]
#[get("/admin/staff")]
pub async fn list_staff(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<IdentityResponse>>> {
    let caller = session.require_caller(state.identities.as_ref()).await?;
    let staff = state.identities.list_staff(&caller).await?;
    Ok(web::Json(staff.iter().map(IdentityResponse::from).collect()))
}

/// Delete a staff identity. Principals cannot be deleted.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/staff/{id}",
    params(("id" = uuid::Uuid, Path, description = "Staff identifier")),
    responses(
        (status = 204, description = "Staff deleted"),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 403, description = "Principal only", body = ErrorSchema),
        (status = 404, description = "Unknown staff member", body = ErrorSchema)
    ),
    tags = ["staff"],
    operation_id = "deleteStaff",
    security(("SessionCookie" = []))
)]
#[delete("/admin/staff/{id}")]
pub async fn delete_staff(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_caller(state.identities.as_ref()).await?;
    let id = parse_staff_id(&path.into_inner(), FieldName::new("id"))?;
    state.staff_admin.delete_staff(&caller, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "staff_tests.rs"]
mod tests;
