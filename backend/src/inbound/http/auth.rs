//! Login, logout and profile handlers.
//!
//! ```text
//! POST /api/v1/login {"email":"head@school.edu","password":"secret"}
//! POST /api/v1/logout
//! GET  /api/v1/me
//! ```

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{Error, ErrorCode, Identity, LoginCredentials, LoginValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, require_text};

/// Login request body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Public view of an identity. Credential secrets are never included.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IdentityResponse {
    #[schema(format = "uuid")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[schema(example = "staff")]
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Identity> for IdentityResponse {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id().to_string(),
            name: identity.name().to_owned(),
            email: identity.email().to_string(),
            role: identity.role().kind().to_string(),
            department: identity.department().map(ToString::to_string),
            created_at: identity.created_at(),
        }
    }
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::Email(inner) => Error::invalid_request(inner.to_string())
            .with_details(json!({ "field": "email", "code": "invalid_email" })),
        LoginValidationError::EmptyPassword => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password", "code": "empty_password" })),
    }
}

/// Authenticate and open a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = IdentityResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<IdentityResponse>> {
    let LoginRequest { email, password } = payload.into_inner();
    let email = require_text(email, FieldName::new("email"))?;
    let credentials =
        LoginCredentials::try_from_parts(&email, password.as_deref().unwrap_or_default())
            .map_err(map_login_validation_error)?;

    let staff_id = state.login.authenticate(&credentials).await?;
    let identity = state.identities.profile(&staff_id).await?;
    session.persist_staff(&staff_id)?;
    Ok(web::Json(IdentityResponse::from(&identity)))
}

/// End the current session.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::NoContent().finish()
}

/// Profile of the signed-in identity.
#[utoipa::path(
    get,
    path = "/api/v1/me",
    responses(
        (status = 200, description = "Current identity", body = IdentityResponse),
        (status = 401, description = "Unauthorized", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "currentIdentity",
    security(("SessionCookie" = []))
)]
#[get("/me")]
pub async fn current_identity(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<IdentityResponse>> {
    let staff_id = session.require_staff_id()?;
    let identity = state.identities.profile(&staff_id).await.inspect_err(|error| {
        if error.code() == ErrorCode::Unauthorized {
            session.purge();
        }
    })?;
    Ok(web::Json(IdentityResponse::from(&identity)))
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
