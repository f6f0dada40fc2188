//! Tests for the login, logout and profile handlers.

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

use crate::domain::ports::StaffAdministration;
use crate::domain::{Caller, RoleKind};
use crate::inbound::http::test_utils::{PASSWORD, PRINCIPAL_EMAIL, TestBackend, login_cookie};

#[rstest]
#[actix_web::test]
async fn login_returns_the_profile_and_a_session_cookie() {
    let backend = TestBackend::new();
    let principal = backend.seed_principal().await;
    let app = actix_test::init_service(backend.app()).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(json!({ "email": PRINCIPAL_EMAIL, "password": PASSWORD }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .response()
            .cookies()
            .any(|cookie| cookie.name() == "session")
    );
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["id"], principal.to_string());
    assert_eq!(body["role"], "principal");
    assert!(body.get("department").is_none());
    assert!(body.get("passwordHash").is_none());
}

#[rstest]
#[case(json!({ "email": PRINCIPAL_EMAIL, "password": "wrong" }))]
#[case(json!({ "email": "nobody@school.edu", "password": PASSWORD }))]
#[actix_web::test]
async fn bad_credentials_are_unauthorized(#[case] payload: Value) {
    let backend = TestBackend::new();
    backend.seed_principal().await;
    let app = actix_test::init_service(backend.app()).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(payload)
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "unauthorized");
    assert_eq!(body["message"], "invalid credentials");
}

#[rstest]
#[case(json!({ "password": PASSWORD }), "email")]
#[case(json!({ "email": "not-an-email", "password": PASSWORD }), "email")]
#[case(json!({ "email": PRINCIPAL_EMAIL, "password": "" }), "password")]
#[actix_web::test]
async fn malformed_login_is_rejected(#[case] payload: Value, #[case] field: &str) {
    let backend = TestBackend::new();
    let app = actix_test::init_service(backend.app()).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(payload)
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], field);
}

#[rstest]
#[actix_web::test]
async fn non_json_body_is_invalid_request() {
    let backend = TestBackend::new();
    let app = actix_test::init_service(backend.app()).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/login")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "invalid_request");
}

#[rstest]
#[actix_web::test]
async fn me_requires_a_session() {
    let backend = TestBackend::new();
    let app = actix_test::init_service(backend.app()).await;

    let request = actix_test::TestRequest::get().uri("/api/v1/me").to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn me_returns_staff_profile_with_department() {
    let backend = TestBackend::new();
    backend.seed_staff("ravi@school.edu", "CSE").await;
    let app = actix_test::init_service(backend.app()).await;
    let cookie = login_cookie(&app, "ravi@school.edu").await;

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/me")
        .cookie(cookie)
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["email"], "ravi@school.edu");
    assert_eq!(body["role"], "staff");
    assert_eq!(body["department"], "CSE");
}

#[rstest]
#[actix_web::test]
async fn deleted_identity_loses_its_session() {
    let backend = TestBackend::new();
    let principal = backend.seed_principal().await;
    let staff = backend.seed_staff("ravi@school.edu", "CSE").await;
    let app = actix_test::init_service(backend.app()).await;
    let cookie = login_cookie(&app, "ravi@school.edu").await;

    backend
        .state
        .staff_admin
        .delete_staff(&Caller::new(principal, RoleKind::Principal, None), &staff)
        .await
        .expect("staff deleted");

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/me")
        .cookie(cookie)
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn logout_is_no_content() {
    let backend = TestBackend::new();
    backend.seed_principal().await;
    let app = actix_test::init_service(backend.app()).await;
    let cookie = login_cookie(&app, PRINCIPAL_EMAIL).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/logout")
        .cookie(cookie)
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
