//! Identity directory model: staff identifiers, departments and roles.
//!
//! A [`Role`] is a closed sum type. Staff always carry a [`Department`];
//! the principal never does, so the "department iff staff" rule lives in the
//! type rather than in runtime checks.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors raised by identity constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityValidationError {
    #[error("staff id must be a valid UUID")]
    InvalidId,
    #[error("name must not be empty")]
    EmptyName,
    #[error("email must not be empty")]
    EmptyEmail,
    #[error("email must contain a single '@' with text either side")]
    MalformedEmail,
    #[error("department must not be empty")]
    EmptyDepartment,
}

/// Stable identifier of an identity record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StaffId(Uuid);

impl StaffId {
    /// Parse a [`StaffId`] from its hyphenated UUID form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, IdentityValidationError> {
        let raw = id.as_ref();
        if raw.trim() != raw {
            return Err(IdentityValidationError::InvalidId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| IdentityValidationError::InvalidId)
    }

    /// Generate a new random [`StaffId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an already-parsed UUID, e.g. one read back from storage.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for StaffId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<StaffId> for String {
    fn from(value: StaffId) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for StaffId {
    type Error = IdentityValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Department identifier such as `CSE`.
///
/// Compared verbatim after trimming; `CSE` and `cse` are distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Department(String);

impl Department {
    /// Validate and construct a [`Department`], trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// [`IdentityValidationError::EmptyDepartment`] when nothing remains after
    /// trimming.
    pub fn new(value: impl AsRef<str>) -> Result<Self, IdentityValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(IdentityValidationError::EmptyDepartment);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for Department {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Department> for String {
    fn from(value: Department) -> Self {
        value.0
    }
}

impl TryFrom<String> for Department {
    type Error = IdentityValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Login email, trimmed and lower-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Normalise and validate a login email.
    ///
    /// Only the shape `local@domain` is checked; deliverability is not.
    pub fn new(value: impl AsRef<str>) -> Result<Self, IdentityValidationError> {
        let normalised = value.as_ref().trim().to_lowercase();
        if normalised.is_empty() {
            return Err(IdentityValidationError::EmptyEmail);
        }
        match normalised.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
            {
                Ok(Self(normalised))
            }
            _ => Err(IdentityValidationError::MalformedEmail),
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = IdentityValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Role held by an identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    /// Campus-wide administrator; exactly one is bootstrapped.
    Principal,
    /// Staff member bound to a single department.
    Staff(Department),
}

impl Role {
    pub fn kind(&self) -> RoleKind {
        match self {
            Self::Principal => RoleKind::Principal,
            Self::Staff(_) => RoleKind::Staff,
        }
    }

    /// Department of a staff role; `None` for the principal.
    pub fn department(&self) -> Option<&Department> {
        match self {
            Self::Principal => None,
            Self::Staff(department) => Some(department),
        }
    }
}

/// Role discriminant without the department payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleKind {
    Principal,
    Staff,
}

impl RoleKind {
    /// Lower-case form stored in the `role` column and sent on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Principal => "principal",
            Self::Staff => "staff",
        }
    }
}

impl fmt::Display for RoleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RoleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "principal" => Ok(Self::Principal),
            "staff" => Ok(Self::Staff),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Non-empty, trimmed person name.
fn normalise_name(name: &str) -> Result<String, IdentityValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(IdentityValidationError::EmptyName);
    }
    Ok(trimmed.to_owned())
}

/// Identity directory record.
///
/// `credential_secret` is the stored digest produced by a
/// [`crate::domain::ports::CredentialHasher`]; it is never the raw password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    id: StaffId,
    name: String,
    email: Email,
    credential_secret: String,
    role: Role,
    created_at: DateTime<Utc>,
}

impl Identity {
    /// Build an identity from validated parts, trimming `name`.
    ///
    /// # Errors
    ///
    /// [`IdentityValidationError::EmptyName`] for a blank name.
    pub fn new(
        id: StaffId,
        name: &str,
        email: Email,
        credential_secret: impl Into<String>,
        role: Role,
        created_at: DateTime<Utc>,
    ) -> Result<Self, IdentityValidationError> {
        Ok(Self {
            id,
            name: normalise_name(name)?,
            email,
            credential_secret: credential_secret.into(),
            role,
            created_at,
        })
    }

    /// Stable identifier.
    pub fn id(&self) -> StaffId {
        self.id
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Stored secret in the hasher's format.
    pub fn credential_secret(&self) -> &str {
        self.credential_secret.as_str()
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    /// Shorthand for `self.role().department()`.
    pub fn department(&self) -> Option<&Department> {
        self.role.department()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
