//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test as actix_test, web};
use serde_json::json;
use zeroize::Zeroizing;

use crate::domain::ports::{
    BootstrapOutcome, NewStaffRequest, PrincipalBootstrap, PrincipalBootstrapRequest, RosterRepository,
    StaffAdministration,
};
use crate::domain::{
    Caller, ClassCode, ClassRoster, Department, Email, IdentityService,
    RoleKind, StaffId, Student,
};
use crate::inbound::http::api_services;
use crate::inbound::http::state::{HttpState, ServiceAdapters};
use crate::outbound::credentials::{BcryptCredentialHasher, MIN_COST};
use crate::outbound::memory::{
    InMemoryAttendanceRepository, InMemoryIdentityRepository, InMemoryNewsRepository,
    InMemoryRosterRepository,
};
use crate::test_support::MutableClock;

pub(crate) const TODAY: &str = "2025-01-06";
pub(crate) const PRINCIPAL_EMAIL: &str = "head@school.edu";
pub(crate) const PASSWORD: &str = "correct horse";

/// Build a session middleware configured for tests.
///
/// Uses a fresh key per call, the `session` cookie name and no `Secure` flag.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

type TestIdentityService = IdentityService<InMemoryIdentityRepository, BcryptCredentialHasher>;

/// HTTP state over in-memory adapters with a movable clock.
pub(crate) struct TestBackend {
    pub state: HttpState,
    pub clock: MutableClock,
    identities: Arc<TestIdentityService>,
    rosters: Arc<InMemoryRosterRepository>,
}

impl TestBackend {
    pub fn new() -> Self {
        let clock = MutableClock::on_day(TODAY);
        let identities = Arc::new(InMemoryIdentityRepository::new());
        let hasher = Arc::new(BcryptCredentialHasher::with_cost(MIN_COST));
        let rosters = Arc::new(InMemoryRosterRepository::new());
        let state = HttpState::from_adapters(ServiceAdapters {
            identities: identities.clone(),
            hasher: hasher.clone(),
            rosters: rosters.clone(),
            attendance: Arc::new(InMemoryAttendanceRepository::new()),
            news: Arc::new(InMemoryNewsRepository::new()),
            clock: Arc::new(clock.clone()),
        });
        Self {
            state,
            identities: Arc::new(IdentityService::new(
                identities,
                hasher,
                Arc::new(clock.clone()),
            )),
            clock,
            rosters,
        }
    }

    pub async fn seed_principal(&self) -> StaffId {
        let outcome = self
            .identities
            .ensure_principal(PrincipalBootstrapRequest {
                name: "Head Teacher".to_owned(),
                email: Email::new(PRINCIPAL_EMAIL).expect("principal email"),
                password: Zeroizing::new(PASSWORD.to_owned()),
            })
            .await
            .expect("principal bootstrap");
        match outcome {
            BootstrapOutcome::Created(id) | BootstrapOutcome::AlreadyExists(id) => id,
        }
    }

    /// Create a staff member in `department` whose email is `email`.
    pub async fn seed_staff(&self, email: &str, department: &str) -> StaffId {
        let principal = Caller::new(self.seed_principal().await, RoleKind::Principal, None);
        self.identities
            .create_staff(
                &principal,
                NewStaffRequest {
                    name: format!("Staff {department}"),
                    email: Email::new(email).expect("staff email"),
                    password: Zeroizing::new(PASSWORD.to_owned()),
                    department: Department::new(department).expect("department"),
                },
            )
            .await
            .expect("staff created")
            .id()
    }

    pub async fn seed_roster(&self, department: &str, class_code: &str, students: &[(&str, &str)]) {
        let roster = ClassRoster::new(
            Department::new(department).expect("department"),
            ClassCode::new(class_code).expect("class code"),
            None,
            students
                .iter()
                .map(|(roll, name)| Student::new(roll, name).expect("student"))
                .collect(),
        );
        self.rosters.upsert(&roster).await.expect("roster stored");
    }

    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        App::new()
            .app_data(web::Data::new(self.state.clone()))
            .wrap(test_session_middleware())
            .service(web::scope("/api/v1").configure(api_services))
    }
}

/// Log in through the API and return the issued session cookie.
pub(crate) async fn login_cookie(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    email: &str,
) -> Cookie<'static> {
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(json!({ "email": email, "password": PASSWORD }))
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert!(response.status().is_success(), "login should succeed");
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}
