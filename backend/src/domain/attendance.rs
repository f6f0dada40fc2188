//! Attendance ledger model.
//!
//! One record exists per `(department, class_code, date)`. Records read before
//! any write are synthesized from the roster with every student present and
//! carry no [`RecordAudit`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::identity::{Department, StaffId};
use super::roster::{ClassCode, ClassRoster};

/// Validation errors raised by attendance constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttendanceValidationError {
    #[error("date must be a calendar day in YYYY-MM-DD form")]
    MalformedDate,
    #[error("status must be present or absent")]
    UnknownStatus,
    #[error("entry roll must not be empty")]
    EmptyRoll,
}

/// Attendance state of one student. There is no third state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
}

impl AttendanceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Absent => "absent",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttendanceStatus {
    type Err = AttendanceValidationError;

    /// Accepts the wire values and the single-letter `P`/`A` codes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "present" | "P" => Ok(Self::Present),
            "absent" | "A" => Ok(Self::Absent),
            _ => Err(AttendanceValidationError::UnknownStatus),
        }
    }
}

/// Calendar day of an attendance record.
///
/// ## Invariants
/// - Parsed only from fixed-width, zero-padded `YYYY-MM-DD`.
/// - Ordering compares calendar days, never strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttendanceDate(NaiveDate);

impl AttendanceDate {
    pub fn from_naive(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }

    /// Calendar day of `instant` in UTC.
    pub fn of_instant(instant: DateTime<Utc>) -> Self {
        Self(instant.date_naive())
    }
}

impl FromStr for AttendanceDate {
    type Err = AttendanceValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        let shaped = bytes.len() == 10
            && bytes.iter().enumerate().all(|(index, byte)| match index {
                4 | 7 => *byte == b'-',
                _ => byte.is_ascii_digit(),
            });
        if !shaped {
            return Err(AttendanceValidationError::MalformedDate);
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Self)
            .map_err(|_| AttendanceValidationError::MalformedDate)
    }
}

impl fmt::Display for AttendanceDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Natural key of an attendance record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttendanceKey {
    pub department: Department,
    pub class_code: ClassCode,
    pub date: AttendanceDate,
}

impl fmt::Display for AttendanceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.department, self.class_code, self.date)
    }
}

/// One student's status within a record.
///
/// Rolls are trusted as given: they are not checked against the roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceEntry {
    pub roll: String,
    pub name: Option<String>,
    pub status: AttendanceStatus,
}

impl AttendanceEntry {
    pub fn new(
        roll: &str,
        name: Option<&str>,
        status: AttendanceStatus,
    ) -> Result<Self, AttendanceValidationError> {
        let roll = roll.trim();
        if roll.is_empty() {
            return Err(AttendanceValidationError::EmptyRoll);
        }
        Ok(Self {
            roll: roll.to_owned(),
            name: name
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_owned),
            status,
        })
    }
}

/// Audit block present on every persisted record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordAudit {
    pub recorded_by: StaffId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Attendance for one class on one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceRecord {
    pub key: AttendanceKey,
    pub entries: Vec<AttendanceEntry>,
    /// `None` for a synthesized default that has never been saved.
    pub audit: Option<RecordAudit>,
}

impl AttendanceRecord {
    /// Default record mirroring `roster` with every student present.
    pub fn synthesize(roster: &ClassRoster, date: AttendanceDate) -> Self {
        let entries = roster
            .students
            .iter()
            .map(|student| AttendanceEntry {
                roll: student.roll().to_owned(),
                name: Some(student.name().to_owned()),
                status: AttendanceStatus::Present,
            })
            .collect();
        Self {
            key: AttendanceKey {
                department: roster.department.clone(),
                class_code: roster.class_code.clone(),
                date,
            },
            entries,
            audit: None,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.audit.is_some()
    }
}

/// Full-replacement write handed to the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceWrite {
    pub key: AttendanceKey,
    pub entries: Vec<AttendanceEntry>,
    pub recorded_by: StaffId,
    pub written_at: DateTime<Utc>,
}
