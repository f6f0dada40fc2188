//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`CredentialHasher`]) are implemented by
//! outbound adapters. Driving ports (`*Command`, `*Query`, [`LoginService`])
//! are implemented by domain services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod attendance_command;
mod attendance_query;
mod attendance_repository;
mod attendance_summary_query;
mod credential_hasher;
mod identity_query;
mod identity_repository;
mod login_service;
mod news_command;
mod news_query;
mod news_repository;
mod roster_command;
mod roster_query;
mod roster_repository;
mod staff_administration;

#[cfg(test)]
pub use attendance_command::MockAttendanceCommand;
pub use attendance_command::{AttendanceCommand, SaveAttendanceRequest};
#[cfg(test)]
pub use attendance_query::MockAttendanceQuery;
pub use attendance_query::{AttendanceLookup, AttendanceQuery};
#[cfg(test)]
pub use attendance_repository::MockAttendanceRepository;
pub use attendance_repository::{AttendanceRepository, AttendanceRepositoryError};
#[cfg(test)]
pub use attendance_summary_query::MockAttendanceSummaryQuery;
pub use attendance_summary_query::AttendanceSummaryQuery;
#[cfg(test)]
pub use credential_hasher::MockCredentialHasher;
pub use credential_hasher::{CredentialHasher, CredentialHasherError};
#[cfg(test)]
pub use identity_query::MockIdentityQuery;
pub use identity_query::IdentityQuery;
#[cfg(test)]
pub use identity_repository::MockIdentityRepository;
pub use identity_repository::{IdentityRepository, IdentityRepositoryError};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use news_command::MockNewsCommand;
pub use news_command::NewsCommand;
#[cfg(test)]
pub use news_query::MockNewsQuery;
pub use news_query::NewsQuery;
#[cfg(test)]
pub use news_repository::MockNewsRepository;
pub use news_repository::{NewsRepository, NewsRepositoryError};
#[cfg(test)]
pub use roster_command::MockRosterCommand;
pub use roster_command::{ReplaceRosterRequest, RosterCommand};
#[cfg(test)]
pub use roster_query::MockRosterQuery;
pub use roster_query::RosterQuery;
#[cfg(test)]
pub use roster_repository::MockRosterRepository;
pub use roster_repository::{RosterRepository, RosterRepositoryError};
#[cfg(test)]
pub use staff_administration::{MockPrincipalBootstrap, MockStaffAdministration};
pub use staff_administration::{
    BootstrapOutcome, NewStaffRequest, PrincipalBootstrap, PrincipalBootstrapRequest,
    StaffAdministration,
};
