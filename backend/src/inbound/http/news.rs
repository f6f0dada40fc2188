//! Department news feed handlers.
//!
//! ```text
//! GET    /api/v1/public/news?department=CSE
//! GET    /api/v1/staff/news
//! POST   /api/v1/news {"title":"Exam timetable","content":"...","imageUrl":null}
//! DELETE /api/v1/news/{id}
//! ```
//!
//! The public feed needs no session. Principal posts land in the common
//! `News` channel.

use actix_web::{HttpResponse, delete, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Error, NewsDraft, NewsPost, NewsValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, optional_department, parse_uuid};

/// Stored post as returned by every feed.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewsPostResponse {
    #[schema(format = "uuid")]
    pub id: String,
    pub title: String,
    pub content: String,
    #[schema(example = "CSE")]
    pub department: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&NewsPost> for NewsPostResponse {
    fn from(post: &NewsPost) -> Self {
        Self {
            id: post.id.to_string(),
            title: post.title.clone(),
            content: post.content.clone(),
            department: post.department.to_string(),
            image_url: post.image_url.clone(),
            created_at: post.created_at,
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateNewsRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PublicNewsQuery {
    /// Restrict the feed to one department or `News`.
    #[serde(default, alias = "dept")]
    pub department: Option<String>,
}

fn map_draft_error(err: NewsValidationError) -> Error {
    let field = match err {
        NewsValidationError::EmptyTitle => "title",
        NewsValidationError::EmptyContent => "content",
    };
    Error::invalid_request(err.to_string())
        .with_details(json!({ "field": field, "code": "missing_field" }))
}

fn posts(feed: &[NewsPost]) -> Vec<NewsPostResponse> {
    feed.iter().map(NewsPostResponse::from).collect()
}

/// Newest-first feed, optionally for one department.
#[utoipa::path(
    get,
    path = "/api/v1/public/news",
    params(PublicNewsQuery),
    responses(
        (status = 200, description = "News feed", body = [NewsPostResponse]),
        (status = 400, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["news"],
    operation_id = "listPublicNews",
    security([])
)]
#[get("/public/news")]
pub async fn list_public_news(
    state: web::Data<HttpState>,
    query: web::Query<PublicNewsQuery>,
) -> ApiResult<web::Json<Vec<NewsPostResponse>>> {
    let department =
        optional_department(query.into_inner().department, FieldName::new("department"))?;
    let feed = state.news_query.list_public(department).await?;
    Ok(web::Json(posts(&feed)))
}

/// Feed of the caller's own department.
#[utoipa::path(
    get,
    path = "/api/v1/staff/news",
    responses(
        (status = 200, description = "Department feed", body = [NewsPostResponse]),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Staff only", body = ErrorSchema)
    ),
    tags = ["news"],
    operation_id = "listDepartmentNews",
    security(("SessionCookie" = []))
)]
#[get("/staff/news")]
pub async fn list_department_news(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<NewsPostResponse>>> {
    let caller = session.require_caller(state.identities.as_ref()).await?;
    let feed = state.news_query.list_own_department(&caller).await?;
    Ok(web::Json(posts(&feed)))
}

/// Publish a post to the caller's channel.
#[utoipa::path(
    post,
    path = "/api/v1/news",
    request_body = CreateNewsRequest,
    responses(
        (status = 201, description = "Post created", body = NewsPostResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["news"],
    operation_id = "createNews",
    security(("SessionCookie" = []))
)]
#[post("/news")]
pub async fn create_news(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateNewsRequest>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_caller(state.identities.as_ref()).await?;
    let CreateNewsRequest {
        title,
        content,
        image_url,
    } = payload.into_inner();
    let draft = NewsDraft::new(
        title.as_deref().unwrap_or_default(),
        content.as_deref().unwrap_or_default(),
        image_url.as_deref(),
    )
    .map_err(map_draft_error)?;

    let post = state.news_command.create(&caller, draft).await?;
    Ok(HttpResponse::Created().json(NewsPostResponse::from(&post)))
}

/// Delete a post. Staff may only delete their department's posts.
#[utoipa::path(
    delete,
    path = "/api/v1/news/{id}",
    params(("id" = uuid::Uuid, Path, description = "Post identifier")),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Unknown post", body = ErrorSchema)
    ),
    tags = ["news"],
    operation_id = "deleteNews",
    security(("SessionCookie" = []))
)]
#[delete("/news/{id}")]
pub async fn delete_news(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_caller(state.identities.as_ref()).await?;
    let id = parse_uuid(&path.into_inner(), FieldName::new("id"))?;
    state.news_command.delete(&caller, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "news_tests.rs"]
mod tests;
