//! Tests for the attendance service.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use mockall::predicate::always;
use rstest::{fixture, rstest};
use serde_json::json;

use super::*;
use crate::domain::ports::{MockAttendanceRepository, MockRosterRepository};
use crate::domain::{
    AttendanceEntry, AttendanceStatus, ClassCode, Department, ErrorCode, RecordAudit, RoleKind,
    StaffId, Student,
};
use crate::test_support::MutableClock;

const TODAY: &str = "2025-01-01";

type Service = AttendanceService<MockAttendanceRepository, MockRosterRepository>;

fn department(name: &str) -> Department {
    Department::new(name).expect("department")
}

fn class_code() -> ClassCode {
    ClassCode::new("CSE-I").expect("class code")
}

fn date(raw: &str) -> AttendanceDate {
    raw.parse().expect("date")
}

fn cse_roster() -> ClassRoster {
    ClassRoster::new(
        department("CSE"),
        class_code(),
        None,
        vec![
            Student::new("1", "A").expect("student"),
            Student::new("2", "B").expect("student"),
        ],
    )
}

fn entries() -> Vec<AttendanceEntry> {
    vec![
        AttendanceEntry::new("1", None, AttendanceStatus::Absent).expect("entry"),
        AttendanceEntry::new("2", None, AttendanceStatus::Present).expect("entry"),
    ]
}

#[fixture]
fn cse_staff() -> Caller {
    Caller::new(StaffId::random(), RoleKind::Staff, Some(department("CSE")))
}

#[fixture]
fn principal() -> Caller {
    Caller::new(StaffId::random(), RoleKind::Principal, None)
}

fn service(records: MockAttendanceRepository, rosters: MockRosterRepository) -> Service {
    AttendanceService::new(
        Arc::new(records),
        Arc::new(rosters),
        Arc::new(MutableClock::on_day(TODAY)),
    )
}

fn rosters_with_cse() -> MockRosterRepository {
    let mut rosters = MockRosterRepository::new();
    rosters
        .expect_find()
        .returning(|department, class_code| {
            let roster = cse_roster();
            Ok((roster.department == *department && roster.class_code == *class_code)
                .then_some(roster))
        });
    rosters
}

fn save_request(raw_date: &str) -> SaveAttendanceRequest {
    SaveAttendanceRequest {
        department: None,
        class_code: class_code(),
        date: date(raw_date),
        entries: entries(),
    }
}

fn persisted(write: &AttendanceWrite) -> AttendanceRecord {
    AttendanceRecord {
        key: write.key.clone(),
        entries: write.entries.clone(),
        audit: Some(RecordAudit {
            recorded_by: write.recorded_by,
            created_at: write.written_at,
            updated_at: write.written_at,
        }),
    }
}

#[rstest]
#[tokio::test]
async fn get_or_default_synthesizes_without_persisting(cse_staff: Caller) {
    let mut records = MockAttendanceRepository::new();
    records.expect_find().times(1).return_once(|_| Ok(None));
    records.expect_upsert().times(0);

    let record = service(records, rosters_with_cse())
        .get_or_default(
            &cse_staff,
            AttendanceLookup {
                department: None,
                class_code: class_code(),
                date: date("2025-01-02"),
            },
        )
        .await
        .expect("default record");

    assert!(!record.is_persisted());
    assert_eq!(record.entries.len(), 2);
    assert!(
        record
            .entries
            .iter()
            .all(|entry| entry.status == AttendanceStatus::Present)
    );
}

#[rstest]
#[tokio::test]
async fn get_or_default_returns_persisted_record_verbatim(cse_staff: Caller) {
    let stored = persisted(&AttendanceWrite {
        key: AttendanceKey {
            department: department("CSE"),
            class_code: class_code(),
            date: date(TODAY),
        },
        entries: vec![AttendanceEntry::new("9", None, AttendanceStatus::Absent).expect("entry")],
        recorded_by: cse_staff.id,
        written_at: Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).single().expect("instant"),
    });
    let expected = stored.clone();
    let mut records = MockAttendanceRepository::new();
    records.expect_find().return_once(move |_| Ok(Some(stored)));

    let record = service(records, rosters_with_cse())
        .get_or_default(
            &cse_staff,
            AttendanceLookup {
                department: None,
                class_code: class_code(),
                date: date(TODAY),
            },
        )
        .await
        .expect("record");

    assert_eq!(record, expected);
}

#[rstest]
#[tokio::test]
async fn get_or_default_requires_a_roster(cse_staff: Caller) {
    let mut rosters = MockRosterRepository::new();
    rosters.expect_find().return_once(|_, _| Ok(None));
    let mut records = MockAttendanceRepository::new();
    records.expect_find().times(0);

    let error = service(records, rosters)
        .get_or_default(
            &cse_staff,
            AttendanceLookup {
                department: None,
                class_code: class_code(),
                date: date(TODAY),
            },
        )
        .await
        .expect_err("missing roster");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[case("2025-01-01")]
#[case("2025-01-05")]
#[tokio::test]
async fn save_upserts_today_and_future_days(cse_staff: Caller, #[case] raw_date: &str) {
    let recorded_by = cse_staff.id;
    let mut records = MockAttendanceRepository::new();
    records
        .expect_upsert()
        .withf(move |write| {
            write.recorded_by == recorded_by
                && write.key.department.as_str() == "CSE"
                && write.entries.len() == 2
        })
        .times(1)
        .returning(|write| Ok(persisted(write)));

    let record = service(records, rosters_with_cse())
        .save(&cse_staff, save_request(raw_date))
        .await
        .expect("saved");

    assert!(record.is_persisted());
    assert_eq!(record.entries, entries());
}

#[rstest]
#[tokio::test]
async fn save_refuses_past_days_before_anything_else(principal: Caller) {
    let mut records = MockAttendanceRepository::new();
    records.expect_upsert().times(0);
    let mut rosters = MockRosterRepository::new();
    rosters.expect_find().times(0);

    let error = service(records, rosters)
        .save(&principal, save_request("2024-12-31"))
        .await
        .expect_err("locked");

    assert_eq!(error.code(), ErrorCode::PastDateLocked);
}

#[rstest]
#[case("2024-12-31", false)]
#[case("2025-01-01", true)]
#[case("2025-01-02", true)]
fn ensure_open_compares_calendar_days(#[case] raw_date: &str, #[case] open: bool) {
    let service = service(MockAttendanceRepository::new(), MockRosterRepository::new());

    let outcome = service.ensure_open(&date(raw_date));

    match outcome {
        Ok(()) => assert!(open),
        Err(error) => {
            assert!(!open);
            assert_eq!(error.code(), ErrorCode::PastDateLocked);
        }
    }
}

#[rstest]
#[tokio::test]
async fn save_lock_follows_the_clock(cse_staff: Caller) {
    let clock = MutableClock::on_day(TODAY);
    let mut records = MockAttendanceRepository::new();
    records
        .expect_upsert()
        .times(1)
        .returning(|write| Ok(persisted(write)));
    let service = AttendanceService::new(
        Arc::new(records),
        Arc::new(rosters_with_cse()),
        Arc::new(clock.clone()),
    );

    service
        .save(&cse_staff, save_request(TODAY))
        .await
        .expect("open today");
    clock.advance_days(1);
    let error = service
        .save(&cse_staff, save_request(TODAY))
        .await
        .expect_err("closed tomorrow");

    assert_eq!(error.code(), ErrorCode::PastDateLocked);
}

#[rstest]
#[tokio::test]
async fn save_rejects_cross_department_writes(cse_staff: Caller) {
    let mut records = MockAttendanceRepository::new();
    records.expect_upsert().times(0);
    let mut request = save_request(TODAY);
    request.department = Some(department("ECE"));

    let error = service(records, MockRosterRepository::new())
        .save(&cse_staff, request)
        .await
        .expect_err("denied");

    assert_eq!(error.code(), ErrorCode::Forbidden);
    assert_eq!(
        error.details().and_then(|d| d.get("reason")),
        Some(&json!("cross-department"))
    );
}

#[rstest]
#[tokio::test]
async fn save_for_unknown_class_is_not_found(cse_staff: Caller) {
    let mut rosters = MockRosterRepository::new();
    rosters.expect_find().return_once(|_, _| Ok(None));
    let mut records = MockAttendanceRepository::new();
    records.expect_upsert().times(0);

    let error = service(records, rosters)
        .save(&cse_staff, save_request(TODAY))
        .await
        .expect_err("missing roster");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn save_does_not_validate_rolls_against_roster(cse_staff: Caller) {
    let mut request = save_request(TODAY);
    request.entries =
        vec![AttendanceEntry::new("not-enrolled", None, AttendanceStatus::Absent).expect("entry")];
    let mut records = MockAttendanceRepository::new();
    records
        .expect_upsert()
        .with(always())
        .returning(|write| Ok(persisted(write)));

    let record = service(records, rosters_with_cse())
        .save(&cse_staff, request)
        .await
        .expect("saved as given");

    assert_eq!(record.entries[0].roll, "not-enrolled");
}

#[rstest]
#[tokio::test]
async fn get_committed_is_principal_only_and_never_synthesizes(
    cse_staff: Caller,
    principal: Caller,
) {
    let mut records = MockAttendanceRepository::new();
    records.expect_find().times(1).return_once(|_| Ok(None));
    let service = service(records, MockRosterRepository::new());
    let key = AttendanceKey {
        department: department("ECE"),
        class_code: class_code(),
        date: date(TODAY),
    };

    let denied = service
        .get_committed(&cse_staff, key.clone())
        .await
        .expect_err("denied");
    let missing = service
        .get_committed(&principal, key)
        .await
        .expect_err("unsaved");

    assert_eq!(denied.code(), ErrorCode::Forbidden);
    assert_eq!(missing.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn storage_failure_is_not_downgraded_to_a_default(cse_staff: Caller) {
    let mut records = MockAttendanceRepository::new();
    records
        .expect_find()
        .return_once(|_| Err(AttendanceRepositoryError::connection("pool timed out")));

    let error = service(records, rosters_with_cse())
        .get_or_default(
            &cse_staff,
            AttendanceLookup {
                department: None,
                class_code: class_code(),
                date: date(TODAY),
            },
        )
        .await
        .expect_err("failure surfaces");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}
