//! Tests for staff administration handlers.

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

use crate::inbound::http::test_utils::{PASSWORD, PRINCIPAL_EMAIL, TestBackend, login_cookie};

fn new_staff(email: &str) -> Value {
    json!({
        "name": "Ravi Kumar",
        "email": email,
        "password": PASSWORD,
        "department": "CSE",
    })
}

#[rstest]
#[actix_web::test]
async fn principal_creates_staff_who_can_then_log_in() {
    let backend = TestBackend::new();
    backend.seed_principal().await;
    let app = actix_test::init_service(backend.app()).await;
    let cookie = login_cookie(&app, PRINCIPAL_EMAIL).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/admin/staff")
        .cookie(cookie)
        .set_json(new_staff("Ravi@School.edu"))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["email"], "ravi@school.edu");
    assert_eq!(body["role"], "staff");
    assert_eq!(body["department"], "CSE");

    login_cookie(&app, "ravi@school.edu").await;
}

#[rstest]
#[actix_web::test]
async fn duplicate_email_is_a_conflict() {
    let backend = TestBackend::new();
    backend.seed_staff("ravi@school.edu", "ECE").await;
    let app = actix_test::init_service(backend.app()).await;
    let cookie = login_cookie(&app, PRINCIPAL_EMAIL).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/admin/staff")
        .cookie(cookie)
        .set_json(new_staff("ravi@school.edu"))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "conflict");
}

#[rstest]
#[case("name")]
#[case("email")]
#[case("password")]
#[case("department")]
#[actix_web::test]
async fn every_field_is_required(#[case] field: &str) {
    let backend = TestBackend::new();
    backend.seed_principal().await;
    let app = actix_test::init_service(backend.app()).await;
    let cookie = login_cookie(&app, PRINCIPAL_EMAIL).await;
    let mut payload = new_staff("ravi@school.edu");
    payload[field] = json!("  ");

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/admin/staff")
        .cookie(cookie)
        .set_json(payload)
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["field"], field);
    assert_eq!(body["details"]["code"], "missing_field");
}

#[rstest]
#[actix_web::test]
async fn staff_cannot_administer_staff() {
    let backend = TestBackend::new();
    backend.seed_staff("ravi@school.edu", "CSE").await;
    let app = actix_test::init_service(backend.app()).await;
    let cookie = login_cookie(&app, "ravi@school.edu").await;

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/admin/staff")
        .cookie(cookie)
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["reason"], "principal-only");
}

#[rstest]
#[actix_web::test]
async fn list_excludes_the_principal() {
    let backend = TestBackend::new();
    backend.seed_staff("ravi@school.edu", "CSE").await;
    backend.seed_staff("asha@school.edu", "ECE").await;
    let app = actix_test::init_service(backend.app()).await;
    let cookie = login_cookie(&app, PRINCIPAL_EMAIL).await;

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/admin/staff")
        .cookie(cookie)
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, request).await;

    let emails: Vec<&str> = body
        .as_array()
        .expect("array body")
        .iter()
        .filter_map(|entry| entry["email"].as_str())
        .collect();
    assert_eq!(emails.len(), 2);
    assert!(!emails.contains(&PRINCIPAL_EMAIL));
}

#[rstest]
#[actix_web::test]
async fn delete_removes_staff() {
    let backend = TestBackend::new();
    let staff = backend.seed_staff("ravi@school.edu", "CSE").await;
    let app = actix_test::init_service(backend.app()).await;
    let cookie = login_cookie(&app, PRINCIPAL_EMAIL).await;

    let delete = actix_test::TestRequest::delete()
        .uri(&format!("/api/v1/admin/staff/{staff}"))
        .cookie(cookie.clone())
        .to_request();
    let response = actix_test::call_service(&app, delete).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let again = actix_test::TestRequest::delete()
        .uri(&format!("/api/v1/admin/staff/{staff}"))
        .cookie(cookie)
        .to_request();
    let response = actix_test::call_service(&app, again).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn principal_account_cannot_be_deleted() {
    let backend = TestBackend::new();
    let principal = backend.seed_principal().await;
    let app = actix_test::init_service(backend.app()).await;
    let cookie = login_cookie(&app, PRINCIPAL_EMAIL).await;

    let request = actix_test::TestRequest::delete()
        .uri(&format!("/api/v1/admin/staff/{principal}"))
        .cookie(cookie)
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[rstest]
#[actix_web::test]
async fn delete_rejects_malformed_identifiers() {
    let backend = TestBackend::new();
    backend.seed_principal().await;
    let app = actix_test::init_service(backend.app()).await;
    let cookie = login_cookie(&app, PRINCIPAL_EMAIL).await;

    let request = actix_test::TestRequest::delete()
        .uri("/api/v1/admin/staff/not-a-uuid")
        .cookie(cookie)
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["code"], "invalid_uuid");
}
