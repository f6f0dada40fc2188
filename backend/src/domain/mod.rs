//! Domain primitives, policy and services.
//!
//! Purpose: define the attendance model (identities, rosters, ledger records,
//! summaries) and the rules governing it, independent of HTTP and storage.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Identity, Role, Department, StaffId: identity directory model.
//! - ClassRoster, Student, ClassCode: roster model.
//! - AttendanceRecord, AttendanceEntry, AttendanceDate: ledger model.
//! - AttendanceSummary and friends: derived counts and percentages.
//! - `access_policy`: allow/deny decisions for the two-role model.
//! - `*_service`: driving-port implementations over the driven ports.

pub mod access_policy;
pub mod attendance;
pub mod attendance_service;
pub mod auth;
pub mod error;
pub mod identity;
pub mod identity_service;
pub mod news;
pub mod news_service;
pub mod ports;
pub mod roster;
pub mod roster_service;
pub mod summary;
pub mod summary_service;
pub mod trace_id;

pub use self::access_policy::{Caller, Decision, DenyReason, Scope};
pub use self::attendance::{
    AttendanceDate, AttendanceEntry, AttendanceKey, AttendanceRecord, AttendanceStatus,
    AttendanceValidationError, AttendanceWrite, RecordAudit,
};
pub use self::attendance_service::AttendanceService;
pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::identity::{
    Department, Email, Identity, IdentityValidationError, Role, RoleKind, StaffId,
};
pub use self::identity_service::IdentityService;
pub use self::news::{COMMON_NEWS_CHANNEL, NewsDraft, NewsPost, NewsValidationError};
pub use self::news_service::NewsService;
pub use self::roster::{ClassCode, ClassRoster, RosterValidationError, Student};
pub use self::roster_service::RosterService;
pub use self::summary::{
    AttendanceSummary, ClassAttendanceSummary, ClassSummaryLine, DepartmentAttendanceSummary,
};
pub use self::summary_service::SummaryService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
