//! Shared request validation for inbound HTTP adapters.
//!
//! Every failure is `invalid_request` with `details.field` naming the wire
//! field and `details.code` naming the rule.

use serde_json::json;
use uuid::Uuid;

use crate::domain::{AttendanceDate, ClassCode, Department, Email, Error, StaffId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationCode {
    MissingField,
    InvalidUuid,
    InvalidDate,
    InvalidEmail,
    InvalidValue,
}

impl ValidationCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidUuid => "invalid_uuid",
            Self::InvalidDate => "invalid_date",
            Self::InvalidEmail => "invalid_email",
            Self::InvalidValue => "invalid_value",
        }
    }
}

/// Wire name of a request field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("missing required field: {field}")).with_details(json!({
        "field": field,
        "code": ValidationCode::MissingField.as_str(),
    }))
}

pub(crate) fn invalid_field_error(
    field: FieldName,
    code: ValidationCode,
    message: impl Into<String>,
    value: &str,
) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

/// Treat absent and blank strings alike.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|raw| !raw.trim().is_empty())
}

pub(crate) fn require_text(value: Option<String>, field: FieldName) -> Result<String, Error> {
    present(value).ok_or_else(|| missing_field_error(field))
}

pub(crate) fn optional_department(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<Department>, Error> {
    present(value)
        .map(|raw| {
            Department::new(&raw).map_err(|_| {
                invalid_field_error(
                    field,
                    ValidationCode::InvalidValue,
                    format!("{} must not be blank", field.as_str()),
                    &raw,
                )
            })
        })
        .transpose()
}

pub(crate) fn require_department(
    value: Option<String>,
    field: FieldName,
) -> Result<Department, Error> {
    optional_department(value, field)?.ok_or_else(|| missing_field_error(field))
}

pub(crate) fn require_class_code(
    value: Option<String>,
    field: FieldName,
) -> Result<ClassCode, Error> {
    let raw = require_text(value, field)?;
    ClassCode::new(&raw).map_err(|_| missing_field_error(field))
}

pub(crate) fn require_date(
    value: Option<String>,
    field: FieldName,
) -> Result<AttendanceDate, Error> {
    let raw = require_text(value, field)?;
    raw.parse().map_err(|_| {
        invalid_field_error(
            field,
            ValidationCode::InvalidDate,
            format!("{} must be a calendar day in YYYY-MM-DD form", field.as_str()),
            &raw,
        )
    })
}

pub(crate) fn require_email(value: Option<String>, field: FieldName) -> Result<Email, Error> {
    let raw = require_text(value, field)?;
    Email::new(&raw).map_err(|err| {
        invalid_field_error(field, ValidationCode::InvalidEmail, err.to_string(), &raw)
    })
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value).map_err(|_| {
        invalid_field_error(
            field,
            ValidationCode::InvalidUuid,
            format!("{} must be a valid UUID", field.as_str()),
            value,
        )
    })
}

pub(crate) fn parse_staff_id(value: &str, field: FieldName) -> Result<StaffId, Error> {
    parse_uuid(value, field).map(StaffId::from_uuid)
}
