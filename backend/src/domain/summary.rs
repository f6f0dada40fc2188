//! Attendance summary arithmetic.

use super::attendance::{AttendanceDate, AttendanceEntry, AttendanceKey, AttendanceStatus};
use super::identity::Department;
use super::roster::ClassCode;

/// Counts and whole-number percentages derived from one record.
///
/// ## Invariants
/// - `present_count + absent_count == total`.
/// - `present_percent + absent_percent == 100` when `total > 0`.
/// - Both percentages are `0` when `total == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttendanceSummary {
    pub total: u32,
    pub present_count: u32,
    pub absent_count: u32,
    pub present_percent: u32,
    pub absent_percent: u32,
}

impl AttendanceSummary {
    /// Summarise `entries`.
    ///
    /// # Examples
    /// ```
    /// use campus_backend::domain::{AttendanceEntry, AttendanceStatus, AttendanceSummary};
    ///
    /// let entries = vec![
    ///     AttendanceEntry::new("1", None, AttendanceStatus::Absent).unwrap(),
    ///     AttendanceEntry::new("2", None, AttendanceStatus::Present).unwrap(),
    /// ];
    /// let summary = AttendanceSummary::from_entries(&entries);
    /// assert_eq!(summary.present_percent, 50);
    /// assert_eq!(summary.absent_percent, 50);
    /// ```
    pub fn from_entries(entries: &[AttendanceEntry]) -> Self {
        let total = saturating_u32(entries.len());
        let present_count = saturating_u32(
            entries
                .iter()
                .filter(|entry| entry.status == AttendanceStatus::Present)
                .count(),
        );
        let absent_count = total - present_count;
        if total == 0 {
            return Self::default();
        }
        let present_percent = rounded_percent(present_count, total);
        Self {
            total,
            present_count,
            absent_count,
            present_percent,
            absent_percent: 100 - present_percent,
        }
    }
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// `round(count / total * 100)` with halves rounded up, in integer arithmetic.
fn rounded_percent(count: u32, total: u32) -> u32 {
    let count = u64::from(count);
    let total = u64::from(total);
    let percent = (count * 200 + total) / (2 * total);
    u32::try_from(percent).unwrap_or(100)
}

/// Summary of a single committed record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassAttendanceSummary {
    pub key: AttendanceKey,
    pub summary: AttendanceSummary,
}

/// One class line within a department summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSummaryLine {
    pub class_code: ClassCode,
    pub summary: AttendanceSummary,
}

/// Per-class summaries for a department on one day, in record creation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentAttendanceSummary {
    pub department: Department,
    pub date: AttendanceDate,
    pub classes: Vec<ClassSummaryLine>,
}
