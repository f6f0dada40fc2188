//! Internal Diesel row structs and JSON documents.
//!
//! Nothing here is exposed to the domain. Converting back into domain types
//! re-runs the domain constructors, so rows that fail validation surface as
//! query errors instead of leaking malformed values.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{AttendanceEntry, AttendanceStatus, Student};

use super::schema::{attendance_records, class_rosters, identities, news_posts};

// ---------------------------------------------------------------------------
// Identities
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = identities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct IdentityRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub credential_secret: String,
    pub role: String,
    pub department: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = identities)]
pub(crate) struct NewIdentityRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub email: &'a str,
    pub credential_secret: &'a str,
    pub role: &'a str,
    pub department: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Class rosters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = class_rosters)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ClassRosterRow {
    pub department: String,
    pub class_code: String,
    pub display_name: String,
    pub students: serde_json::Value,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = class_rosters)]
pub(crate) struct NewClassRosterRow<'a> {
    pub department: &'a str,
    pub class_code: &'a str,
    pub display_name: &'a str,
    pub students: &'a serde_json::Value,
}

/// Element of the `class_rosters.students` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct StudentDocument {
    pub roll: String,
    pub name: String,
}

impl From<&Student> for StudentDocument {
    fn from(student: &Student) -> Self {
        Self {
            roll: student.roll().to_owned(),
            name: student.name().to_owned(),
        }
    }
}

impl TryFrom<StudentDocument> for Student {
    type Error = String;

    fn try_from(document: StudentDocument) -> Result<Self, Self::Error> {
        Student::new(&document.roll, &document.name).map_err(|err| err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Attendance records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = attendance_records)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AttendanceRecordRow {
    pub department: String,
    pub class_code: String,
    pub attendance_date: NaiveDate,
    pub entries: serde_json::Value,
    pub recorded_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert half of the attendance upsert. `created_at` equals `updated_at` on
/// insert and is left untouched on conflict.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = attendance_records)]
pub(crate) struct NewAttendanceRecordRow<'a> {
    pub department: &'a str,
    pub class_code: &'a str,
    pub attendance_date: NaiveDate,
    pub entries: &'a serde_json::Value,
    pub recorded_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Element of the `attendance_records.entries` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct EntryDocument {
    pub roll: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub status: AttendanceStatus,
}

impl From<&AttendanceEntry> for EntryDocument {
    fn from(entry: &AttendanceEntry) -> Self {
        Self {
            roll: entry.roll.clone(),
            name: entry.name.clone(),
            status: entry.status,
        }
    }
}

impl TryFrom<EntryDocument> for AttendanceEntry {
    type Error = String;

    fn try_from(document: EntryDocument) -> Result<Self, Self::Error> {
        AttendanceEntry::new(&document.roll, document.name.as_deref(), document.status)
            .map_err(|err| err.to_string())
    }
}

// ---------------------------------------------------------------------------
// News posts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = news_posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct NewsPostRow {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub department: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = news_posts)]
pub(crate) struct NewNewsPostRow<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub content: &'a str,
    pub department: &'a str,
    pub image_url: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}

/// Encode domain values as a JSON array column.
pub(crate) fn encode_documents<'a, T, D>(items: &'a [T]) -> Result<serde_json::Value, String>
where
    D: Serialize + From<&'a T>,
{
    let documents: Vec<D> = items.iter().map(D::from).collect();
    serde_json::to_value(documents).map_err(|err| format!("encode documents: {err}"))
}

/// Decode a JSON array column back into validated domain values.
pub(crate) fn decode_documents<T, D>(value: serde_json::Value) -> Result<Vec<T>, String>
where
    D: for<'de> Deserialize<'de>,
    T: TryFrom<D, Error = String>,
{
    let documents: Vec<D> =
        serde_json::from_value(value).map_err(|err| format!("decode documents: {err}"))?;
    documents.into_iter().map(T::try_from).collect()
}
