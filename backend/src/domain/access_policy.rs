//! Access control decisions for the two-role model.
//!
//! Rules apply in order:
//! 1. principal-only operations require the principal;
//! 2. staff-scoped operations require a staff caller;
//! 3. staff-scoped operations require the caller's department to be set and
//!    to equal the target department.
//!
//! There is no anonymous write path; public reads bypass the policy entirely.

use serde_json::json;
use tracing::debug;

use super::error::Error;
use super::identity::{Department, Identity, RoleKind, StaffId};

/// Resolved caller identity consulted by every decision.
///
/// `department` is optional so a staff record lacking one is denied with
/// [`DenyReason::NoDepartment`] instead of being unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    /// Identity record the session belongs to.
    pub id: StaffId,
    /// Role resolved from the identity store, not from the session cookie.
    pub kind: RoleKind,
    /// Department for staff callers; always `None` for the principal.
    pub department: Option<Department>,
}

impl Caller {
    pub fn new(id: StaffId, kind: RoleKind, department: Option<Department>) -> Self {
        Self {
            id,
            kind,
            department,
        }
    }

    /// True for the principal role.
    pub fn is_principal(&self) -> bool {
        self.kind == RoleKind::Principal
    }
}

impl From<&Identity> for Caller {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id(),
            kind: identity.role().kind(),
            department: identity.department().cloned(),
        }
    }
}

/// What an operation acts upon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope<'a> {
    /// Staff management, cross-department views, department directory.
    PrincipalOnly,
    /// Staff acting within the named department.
    StaffDepartment(&'a Department),
    /// Staff acting within their own department, whatever it is.
    StaffOwnDepartment,
}

/// Why a request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// Staff attempted a principal-only operation.
    PrincipalOnly,
    /// The principal attempted a staff-scoped operation.
    StaffOnly,
    /// Staff record carries no department.
    NoDepartment,
    /// Staff targeted a department other than their own.
    CrossDepartment,
}

impl DenyReason {
    /// Stable reason string surfaced to callers.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PrincipalOnly => "principal-only",
            Self::StaffOnly => "staff-only",
            Self::NoDepartment => "no-department",
            Self::CrossDepartment => "cross-department",
        }
    }

    fn message(self) -> &'static str {
        match self {
            Self::PrincipalOnly => "only the principal may perform this action",
            Self::StaffOnly => "only staff may perform this action",
            Self::NoDepartment => "staff member has no department assigned",
            Self::CrossDepartment => "access to another department is not allowed",
        }
    }
}

impl From<DenyReason> for Error {
    fn from(reason: DenyReason) -> Self {
        Error::forbidden(reason.message()).with_details(json!({ "reason": reason.as_str() }))
    }
}

/// Outcome of [`decide`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    /// Refused; convert the reason into an [`Error`] with `Error::from`.
    Deny(DenyReason),
}

/// Pure policy decision.
///
/// # Examples
/// ```
/// use campus_backend::domain::access_policy::{decide, Caller, Decision, DenyReason, Scope};
/// use campus_backend::domain::{Department, RoleKind, StaffId};
///
/// let cse = Department::new("CSE").unwrap();
/// let ece = Department::new("ECE").unwrap();
/// let caller = Caller::new(StaffId::random(), RoleKind::Staff, Some(cse));
/// assert_eq!(
///     decide(&caller, Scope::StaffDepartment(&ece)),
///     Decision::Deny(DenyReason::CrossDepartment)
/// );
/// ```
pub fn decide(caller: &Caller, scope: Scope<'_>) -> Decision {
    match scope {
        Scope::PrincipalOnly => match caller.kind {
            RoleKind::Principal => Decision::Allow,
            RoleKind::Staff => Decision::Deny(DenyReason::PrincipalOnly),
        },
        Scope::StaffDepartment(target) => match staff_department(caller) {
            Ok(own) if own == target => Decision::Allow,
            Ok(_) => Decision::Deny(DenyReason::CrossDepartment),
            Err(reason) => Decision::Deny(reason),
        },
        Scope::StaffOwnDepartment => match staff_department(caller) {
            Ok(_) => Decision::Allow,
            Err(reason) => Decision::Deny(reason),
        },
    }
}

fn staff_department(caller: &Caller) -> Result<&Department, DenyReason> {
    if caller.kind != RoleKind::Staff {
        return Err(DenyReason::StaffOnly);
    }
    caller.department.as_ref().ok_or(DenyReason::NoDepartment)
}

/// Apply [`decide`] and turn a denial into a `forbidden` error.
pub fn authorize(caller: &Caller, scope: Scope<'_>) -> Result<(), Error> {
    match decide(caller, scope) {
        Decision::Allow => Ok(()),
        Decision::Deny(reason) => {
            debug!(caller = %caller.id, reason = reason.as_str(), "access denied");
            Err(reason.into())
        }
    }
}

/// Authorize a staff caller for their own department and return it.
pub fn own_department(caller: &Caller) -> Result<&Department, Error> {
    authorize(caller, Scope::StaffOwnDepartment)?;
    caller
        .department
        .as_ref()
        .ok_or_else(|| DenyReason::NoDepartment.into())
}

/// Authorize a staff caller for `requested`, defaulting to their own
/// department, and return the department the operation acts upon.
pub fn target_department(
    caller: &Caller,
    requested: Option<&Department>,
) -> Result<Department, Error> {
    match requested {
        Some(department) => {
            authorize(caller, Scope::StaffDepartment(department))?;
            Ok(department.clone())
        }
        None => own_department(caller).cloned(),
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::{fixture, rstest};

    fn department(name: &str) -> Department {
        Department::new(name).expect("department")
    }

    #[fixture]
    fn principal() -> Caller {
        Caller::new(StaffId::random(), RoleKind::Principal, None)
    }

    #[fixture]
    fn cse_staff() -> Caller {
        Caller::new(StaffId::random(), RoleKind::Staff, Some(department("CSE")))
    }

    #[rstest]
    fn principal_passes_principal_only(principal: Caller) {
        assert_eq!(decide(&principal, Scope::PrincipalOnly), Decision::Allow);
    }

    #[rstest]
    fn staff_fail_principal_only(cse_staff: Caller) {
        assert_eq!(
            decide(&cse_staff, Scope::PrincipalOnly),
            Decision::Deny(DenyReason::PrincipalOnly)
        );
    }

    #[rstest]
    fn principal_fails_staff_scoped(principal: Caller) {
        let cse = department("CSE");
        assert_eq!(
            decide(&principal, Scope::StaffDepartment(&cse)),
            Decision::Deny(DenyReason::StaffOnly)
        );
        assert_eq!(
            decide(&principal, Scope::StaffOwnDepartment),
            Decision::Deny(DenyReason::StaffOnly)
        );
    }

    #[rstest]
    #[case("CSE", Decision::Allow)]
    #[case("ECE", Decision::Deny(DenyReason::CrossDepartment))]
    #[case("cse", Decision::Deny(DenyReason::CrossDepartment))]
    fn staff_are_scoped_to_their_department(
        cse_staff: Caller,
        #[case] target: &str,
        #[case] expected: Decision,
    ) {
        let target = department(target);
        assert_eq!(decide(&cse_staff, Scope::StaffDepartment(&target)), expected);
    }

    #[rstest]
    fn staff_without_department_are_denied() {
        let caller = Caller::new(StaffId::random(), RoleKind::Staff, None);
        let cse = department("CSE");
        assert_eq!(
            decide(&caller, Scope::StaffDepartment(&cse)),
            Decision::Deny(DenyReason::NoDepartment)
        );
        assert_eq!(
            decide(&caller, Scope::StaffOwnDepartment),
            Decision::Deny(DenyReason::NoDepartment)
        );
    }

    #[rstest]
    fn denial_maps_to_forbidden_with_reason(cse_staff: Caller) {
        let ece = department("ECE");
        let error = authorize(&cse_staff, Scope::StaffDepartment(&ece)).expect_err("denied");
        assert_eq!(error.code(), ErrorCode::Forbidden);
        assert_eq!(
            error.details().and_then(|details| details.get("reason")),
            Some(&json!("cross-department"))
        );
    }

    #[rstest]
    fn own_department_returns_the_callers_department(cse_staff: Caller) {
        let own = own_department(&cse_staff).expect("allowed");
        assert_eq!(own.as_str(), "CSE");
    }

    #[rstest]
    fn target_department_defaults_to_own(cse_staff: Caller) {
        let target = target_department(&cse_staff, None).expect("allowed");
        assert_eq!(target.as_str(), "CSE");
    }

    #[rstest]
    fn target_department_checks_requested(cse_staff: Caller) {
        let ece = department("ECE");
        let error = target_department(&cse_staff, Some(&ece)).expect_err("denied");
        assert_eq!(error.code(), ErrorCode::Forbidden);
    }
}
