//! HTTP inbound adapter exposing REST endpoints.

pub mod attendance;
pub mod auth;
pub mod error;
pub mod health;
pub mod news;
pub mod rosters;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod staff;
pub mod state;
pub mod summaries;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;

use actix_web::{HttpRequest, web};

use crate::domain::Error;

fn json_error(err: actix_web::error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_request(format!("invalid JSON body: {err}")).into()
}

fn query_error(err: actix_web::error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_request(format!("invalid query string: {err}")).into()
}

/// Register every `/api/v1` handler along with payload error mapping.
///
/// Callers mount this inside the `/api/v1` scope and supply
/// `web::Data<HttpState>` plus a session middleware.
pub fn api_services(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::QueryConfig::default().error_handler(query_error))
        .service(auth::login)
        .service(auth::logout)
        .service(auth::current_identity)
        .service(staff::create_staff)
        .service(staff::list_staff)
        .service(staff::delete_staff)
        .service(rosters::list_classes)
        .service(rosters::get_class_students)
        .service(rosters::replace_class_students)
        .service(rosters::list_departments)
        .service(attendance::get_staff_attendance)
        .service(attendance::save_staff_attendance)
        .service(attendance::get_committed_attendance)
        .service(summaries::class_summary)
        .service(summaries::department_summary)
        .service(news::list_public_news)
        .service(news::list_department_news)
        .service(news::create_news)
        .service(news::delete_news);
}
