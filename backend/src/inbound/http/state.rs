//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see driving ports, so
//! they can be exercised against in-memory adapters or mocks.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    AttendanceCommand, AttendanceQuery, AttendanceRepository, AttendanceSummaryQuery,
    CredentialHasher, IdentityQuery, IdentityRepository, LoginService, NewsCommand, NewsQuery,
    NewsRepository, RosterCommand, RosterQuery, RosterRepository, StaffAdministration,
};
use crate::domain::{AttendanceService, IdentityService, NewsService, RosterService, SummaryService};

/// Port implementations backing the HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub identities: Arc<dyn IdentityQuery>,
    pub staff_admin: Arc<dyn StaffAdministration>,
    pub roster_command: Arc<dyn RosterCommand>,
    pub roster_query: Arc<dyn RosterQuery>,
    pub attendance_command: Arc<dyn AttendanceCommand>,
    pub attendance_query: Arc<dyn AttendanceQuery>,
    pub summaries: Arc<dyn AttendanceSummaryQuery>,
    pub news_command: Arc<dyn NewsCommand>,
    pub news_query: Arc<dyn NewsQuery>,
}

/// Driven adapters the domain services are assembled over.
pub struct ServiceAdapters<I, H, R, A, N> {
    pub identities: Arc<I>,
    pub hasher: Arc<H>,
    pub rosters: Arc<R>,
    pub attendance: Arc<A>,
    pub news: Arc<N>,
    pub clock: Arc<dyn Clock>,
}

impl HttpState {
    /// Wire every driving port to the domain services over `adapters`.
    pub fn from_adapters<I, H, R, A, N>(adapters: ServiceAdapters<I, H, R, A, N>) -> Self
    where
        I: IdentityRepository + 'static,
        H: CredentialHasher + 'static,
        R: RosterRepository + 'static,
        A: AttendanceRepository + 'static,
        N: NewsRepository + 'static,
    {
        let ServiceAdapters {
            identities,
            hasher,
            rosters,
            attendance,
            news,
            clock,
        } = adapters;
        let identity_service = Arc::new(IdentityService::new(identities, hasher, clock.clone()));
        let roster_service = Arc::new(RosterService::new(rosters.clone()));
        let attendance_service = Arc::new(AttendanceService::new(
            attendance.clone(),
            rosters,
            clock.clone(),
        ));
        let news_service = Arc::new(NewsService::new(news, clock));

        Self {
            login: identity_service.clone(),
            identities: identity_service.clone(),
            staff_admin: identity_service,
            roster_command: roster_service.clone(),
            roster_query: roster_service,
            attendance_command: attendance_service.clone(),
            attendance_query: attendance_service,
            summaries: Arc::new(SummaryService::new(attendance)),
            news_command: news_service.clone(),
            news_query: news_service,
        }
    }
}
