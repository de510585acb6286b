//! Integration tests for the registry: catalogs, enrollments, grades and cascade delete

use chrono::{Duration, TimeZone, Utc};
use nu_registrar::core::clock::SteppingClock;
use nu_registrar::core::grading::LetterGrade;
use nu_registrar::core::models::{Course, CoursePatch, Student};
use nu_registrar::core::storage::{MemoryStore, RecordStore};
use nu_registrar::core::{RecordKind, Registry, RegistryError};

fn clock() -> SteppingClock {
    SteppingClock::new(
        Utc.with_ymd_and_hms(2024, 9, 1, 8, 0, 0).unwrap(),
        Duration::hours(1),
    )
}

fn jane() -> Student {
    Student::new(
        "S001".to_string(),
        "Jane".to_string(),
        "jane@x.com".to_string(),
        "CS".to_string(),
    )
}

fn student(id: &str) -> Student {
    Student::new(
        id.to_string(),
        format!("Student {id}"),
        format!("{}@school.edu", id.to_lowercase()),
        "SE".to_string(),
    )
}

fn course(code: &str, credits: i32) -> Course {
    Course::new(
        code.to_string(),
        format!("Course {code}"),
        credits,
        "Prof. Johnson".to_string(),
    )
}

fn open(store: &MemoryStore) -> Registry<&MemoryStore> {
    let (registry, report) = Registry::open(store, clock()).expect("open registry");
    assert!(report.is_clean());
    registry
}

#[test]
fn test_enroll_grade_gpa_transcript_scenario() {
    let store = MemoryStore::new();
    let mut registry = open(&store);

    registry.add_student(jane()).unwrap();
    registry.add_course(course("CSC1234", 3)).unwrap();
    registry.enroll("S001", "CSC1234").unwrap();

    let graded = registry.update_grade("S001", "CSC1234", 85.0).unwrap();
    assert_eq!(graded.letter_grade(), Some(LetterGrade::B));
    assert!((registry.gpa("S001").unwrap() - 3.0).abs() < 1e-9);

    let transcript = registry.transcript("S001").unwrap();
    assert_eq!(transcript.student, jane());
    assert_eq!(transcript.entries.len(), 1);
    assert_eq!(transcript.entries[0].course_code, "CSC1234");
    assert_eq!(transcript.entries[0].grade, Some(85.0));
    assert_eq!(transcript.entries[0].letter_label(), "B");
    assert!((transcript.gpa - 3.0).abs() < 1e-9);
}

#[test]
fn test_add_then_get_and_duplicate_key() {
    let store = MemoryStore::new();
    let mut registry = open(&store);

    let added = registry.add_student(jane()).unwrap();
    assert_eq!(added, jane());
    assert_eq!(registry.student("S001"), Some(&jane()));

    let err = registry.add_student(student("S001")).unwrap_err();
    assert!(matches!(
        err,
        RegistryError::DuplicateKey {
            kind: RecordKind::Student,
            ..
        }
    ));
    assert_eq!(registry.student("S001").unwrap().name, "Jane");
}

#[test]
fn test_double_enroll_leaves_ledger_unchanged() {
    let store = MemoryStore::new();
    let mut registry = open(&store);
    registry.add_student(jane()).unwrap();
    registry.add_course(course("CSC1234", 3)).unwrap();

    registry.enroll("S001", "CSC1234").unwrap();
    let err = registry.enroll("S001", "CSC1234").unwrap_err();
    assert!(matches!(err, RegistryError::AlreadyEnrolled { .. }));
    assert_eq!(registry.enrollments().len(), 1);
}

#[test]
fn test_enroll_unknown_student_or_course() {
    let store = MemoryStore::new();
    let mut registry = open(&store);
    registry.add_student(jane()).unwrap();
    registry.add_course(course("CSC1234", 3)).unwrap();

    assert!(matches!(
        registry.enroll("S999", "CSC1234"),
        Err(RegistryError::NotFound {
            kind: RecordKind::Student,
            ..
        })
    ));
    assert!(matches!(
        registry.enroll("S001", "XYZ9999"),
        Err(RegistryError::NotFound {
            kind: RecordKind::Course,
            ..
        })
    ));
    assert!(registry.enrollments().is_empty());
    assert!(store.load_enrollments().unwrap().is_empty());
}

#[test]
fn test_drop_updates_both_views() {
    let store = MemoryStore::new();
    let mut registry = open(&store);
    registry.add_student(jane()).unwrap();
    registry.add_course(course("CSC1234", 3)).unwrap();

    assert!(!registry.drop_enrollment("S001", "CSC1234").unwrap());

    registry.enroll("S001", "CSC1234").unwrap();
    assert!(registry.drop_enrollment("S001", "CSC1234").unwrap());
    assert!(registry.enrollments_for_student("S001").is_empty());
    assert!(registry.enrollments_for_course("CSC1234").is_empty());
    assert!(registry.enrollment("S001", "CSC1234").is_none());
}

#[test]
fn test_delete_student_removes_exactly_their_enrollments() {
    let store = MemoryStore::new();
    let mut registry = open(&store);
    for id in ["S001", "S002"] {
        registry.add_student(student(id)).unwrap();
    }
    for code in ["CSC1234", "MAT5678", "PHY1000"] {
        registry.add_course(course(code, 3)).unwrap();
    }
    for code in ["CSC1234", "MAT5678", "PHY1000"] {
        registry.enroll("S001", code).unwrap();
    }
    registry.enroll("S002", "MAT5678").unwrap();

    assert_eq!(registry.delete_student("S001").unwrap(), 3);
    let remaining = registry.enrollments();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].student_id, "S002");
    assert_eq!(registry.enrollments_for_course("MAT5678").len(), 1);
    assert!(registry.enrollments_for_course("CSC1234").is_empty());
}

#[test]
fn test_grade_bounds() {
    let store = MemoryStore::new();
    let mut registry = open(&store);
    registry.add_student(jane()).unwrap();
    registry.add_course(course("CSC1234", 3)).unwrap();
    registry.enroll("S001", "CSC1234").unwrap();

    assert!(registry.update_grade("S001", "CSC1234", 0.0).is_ok());
    assert!(registry.update_grade("S001", "CSC1234", 100.0).is_ok());
    for bad in [100.01, -0.01, f64::NAN] {
        assert!(matches!(
            registry.update_grade("S001", "CSC1234", bad),
            Err(RegistryError::OutOfRange { field: "grade", .. })
        ));
    }
    assert_eq!(registry.enrollment("S001", "CSC1234").unwrap().grade, Some(100.0));

    assert!(matches!(
        registry.update_grade("S001", "MAT5678", 50.0),
        Err(RegistryError::NotFound {
            kind: RecordKind::Enrollment,
            ..
        })
    ));
}

#[test]
fn test_gpa_ignores_ungraded() {
    let store = MemoryStore::new();
    let mut registry = open(&store);
    registry.add_student(jane()).unwrap();
    registry.add_course(course("CSC1234", 3)).unwrap();
    registry.add_course(course("MAT5678", 4)).unwrap();

    registry.enroll("S001", "CSC1234").unwrap();
    registry.enroll("S001", "MAT5678").unwrap();
    assert!(registry.gpa("S001").unwrap().abs() < f64::EPSILON);

    registry.update_grade("S001", "CSC1234", 95.0).unwrap();
    assert!((registry.gpa("S001").unwrap() - 4.0).abs() < f64::EPSILON);

    let transcript = registry.transcript("S001").unwrap();
    assert_eq!(transcript.entries.len(), 2);
    assert_eq!(transcript.entries[1].letter_label(), "N/A");
    assert_eq!(transcript.credits_attempted, 7);
    assert_eq!(transcript.credits_earned, 3);
}

#[test]
fn test_update_course_revalidates() {
    let store = MemoryStore::new();
    let mut registry = open(&store);
    registry.add_course(course("CSC1234", 3)).unwrap();

    let err = registry
        .update_course(
            "CSC1234",
            CoursePatch {
                credits: Some(7),
                ..CoursePatch::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, RegistryError::OutOfRange { field: "credits", .. }));
    assert_eq!(registry.course("CSC1234").unwrap().credits, 3);

    let err = registry
        .update_course(
            "CSC1234",
            CoursePatch {
                name: Some("  ".to_string()),
                credits: Some(7),
                ..CoursePatch::default()
            },
        )
        .unwrap_err();
    match err {
        RegistryError::ValidationFailed(messages) => assert_eq!(messages.len(), 2),
        other => panic!("unexpected error: {other:?}"),
    }

    let updated = registry
        .update_course(
            "CSC1234",
            CoursePatch {
                credits: Some(4),
                ..CoursePatch::default()
            },
        )
        .unwrap();
    assert_eq!(updated.credits, 4);
}
