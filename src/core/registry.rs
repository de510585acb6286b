//! Registry: catalogs, ledger, store and clock in one place
//!
//! Every mutating operation validates, applies in memory, then flushes the
//! touched lists through the [`RecordStore`]. A failed flush is reported as
//! [`RegistryError::Storage`] but the in-memory change stands.

use crate::core::catalog::{CourseCatalog, StudentCatalog};
use crate::core::clock::Clock;
use crate::core::error::{RecordKind, RegistryError, RegistryResult, StorageError};
use crate::core::grading;
use crate::core::ledger::EnrollmentLedger;
use crate::core::models::{
    Course, CoursePatch, CourseQuery, Enrollment, Student, StudentPatch, StudentQuery,
};
use crate::core::storage::{DataFile, RecordStore};
use crate::core::transcript::Transcript;
use crate::{debug, error, info, warn};

/// Records rejected while loading
///
/// Each entry is the error that would have been raised had the record been
/// added through the normal API.
#[derive(Debug, Default)]
pub struct LoadReport {
    rejected: Vec<RegistryError>,
}

impl LoadReport {
    /// Whether every stored record was accepted
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }

    /// Rejected records with the reason for each
    #[must_use]
    pub fn rejected(&self) -> &[RegistryError] {
        &self.rejected
    }

    fn reject(&mut self, err: RegistryError) {
        warn!("Dropping stored record: {err}");
        self.rejected.push(err);
    }
}

/// Owns the student and course catalogs, the enrollment ledger, the store
/// they persist to and the clock that dates new enrollments
pub struct Registry<S: RecordStore> {
    students: StudentCatalog,
    courses: CourseCatalog,
    ledger: EnrollmentLedger,
    store: S,
    clock: Box<dyn Clock>,
}

impl<S: RecordStore> Registry<S> {
    /// Load everything from `store`
    ///
    /// Students and courses are loaded first, then enrollments. Records that
    /// are invalid, duplicated, or reference a missing student or course are
    /// dropped and listed in the returned [`LoadReport`].
    ///
    /// # Errors
    /// Returns an error if any list cannot be read or parsed; nothing is
    /// constructed in that case.
    pub fn open<C: Clock + 'static>(
        store: S,
        clock: C,
    ) -> Result<(Self, LoadReport), StorageError> {
        let stored_students = store.load_students()?;
        let stored_courses = store.load_courses()?;
        let stored_enrollments = store.load_enrollments()?;

        let mut report = LoadReport::default();

        let mut students = StudentCatalog::new();
        for student in stored_students {
            if let Err(err) = students.add(student) {
                report.reject(err);
            }
        }

        let mut courses = CourseCatalog::new();
        for course in stored_courses {
            if let Err(err) = courses.add(course) {
                report.reject(err);
            }
        }

        let mut ledger = EnrollmentLedger::new();
        for enrollment in stored_enrollments {
            if let Err(err) = admit(&mut ledger, &students, &courses, enrollment) {
                report.reject(err);
            }
        }

        info!(
            "Loaded {} students, {} courses, {} enrollments ({} rejected)",
            students.len(),
            courses.len(),
            ledger.len(),
            report.rejected().len()
        );

        let registry = Self {
            students,
            courses,
            ledger,
            store,
            clock: Box::new(clock),
        };
        Ok((registry, report))
    }

    /// The backing store
    pub const fn store(&self) -> &S {
        &self.store
    }

    // ----- students -----

    /// Add a student
    ///
    /// # Errors
    /// [`RegistryError::DuplicateKey`], [`RegistryError::ValidationFailed`],
    /// or [`RegistryError::Storage`] if the flush fails after insertion
    pub fn add_student(&mut self, student: Student) -> RegistryResult<Student> {
        let added = self.students.add(student)?.clone();
        info!("Added student {}", added.student_id);
        self.flush(&[DataFile::Students])?;
        Ok(added)
    }

    /// Student by id
    #[must_use]
    pub fn student(&self, student_id: &str) -> Option<&Student> {
        self.students.get(student_id)
    }

    /// All students in insertion order
    #[must_use]
    pub fn students(&self) -> Vec<&Student> {
        self.students.list()
    }

    /// Students matching `query`
    #[must_use]
    pub fn search_students(&self, query: &StudentQuery) -> Vec<&Student> {
        self.students.search(query)
    }

    /// Patch a student's fields
    ///
    /// # Errors
    /// [`RegistryError::NotFound`], [`RegistryError::ValidationFailed`], or
    /// [`RegistryError::Storage`]
    pub fn update_student(
        &mut self,
        student_id: &str,
        patch: StudentPatch,
    ) -> RegistryResult<Student> {
        let updated = self.students.update(student_id, patch)?.clone();
        info!("Updated student {student_id}");
        self.flush(&[DataFile::Students])?;
        Ok(updated)
    }

    /// Delete a student and every enrollment referencing them
    ///
    /// Returns how many enrollments were removed with the student.
    ///
    /// # Errors
    /// [`RegistryError::NotFound`] if the student does not exist, or
    /// [`RegistryError::Storage`]
    pub fn delete_student(&mut self, student_id: &str) -> RegistryResult<usize> {
        if !self.students.contains(student_id) {
            return Err(RegistryError::not_found(RecordKind::Student, student_id));
        }
        let removed = self.ledger.cascade_remove_by_student(student_id);
        self.students.remove(student_id);
        info!("Deleted student {student_id} and {removed} enrollment(s)");
        self.flush(&[DataFile::Students, DataFile::Enrollments])?;
        Ok(removed)
    }

    // ----- courses -----

    /// Add a course
    ///
    /// # Errors
    /// [`RegistryError::DuplicateKey`], [`RegistryError::OutOfRange`] for bad
    /// credits alone, [`RegistryError::ValidationFailed`], or
    /// [`RegistryError::Storage`]
    pub fn add_course(&mut self, course: Course) -> RegistryResult<Course> {
        let added = self.courses.add(course)?.clone();
        info!("Added course {}", added.course_code);
        self.flush(&[DataFile::Courses])?;
        Ok(added)
    }

    /// Course by code
    #[must_use]
    pub fn course(&self, course_code: &str) -> Option<&Course> {
        self.courses.get(course_code)
    }

    /// All courses in insertion order
    #[must_use]
    pub fn courses(&self) -> Vec<&Course> {
        self.courses.list()
    }

    /// Courses matching `query`
    #[must_use]
    pub fn search_courses(&self, query: &CourseQuery) -> Vec<&Course> {
        self.courses.search(query)
    }

    /// Patch a course's fields
    ///
    /// # Errors
    /// [`RegistryError::NotFound`], [`RegistryError::OutOfRange`],
    /// [`RegistryError::ValidationFailed`], or [`RegistryError::Storage`]
    pub fn update_course(
        &mut self,
        course_code: &str,
        patch: CoursePatch,
    ) -> RegistryResult<Course> {
        let updated = self.courses.update(course_code, patch)?.clone();
        info!("Updated course {course_code}");
        self.flush(&[DataFile::Courses])?;
        Ok(updated)
    }

    /// Delete a course and every enrollment in it
    ///
    /// Returns how many enrollments were removed with the course.
    ///
    /// # Errors
    /// [`RegistryError::NotFound`] if the course does not exist, or
    /// [`RegistryError::Storage`]
    pub fn delete_course(&mut self, course_code: &str) -> RegistryResult<usize> {
        if !self.courses.contains(course_code) {
            return Err(RegistryError::not_found(RecordKind::Course, course_code));
        }
        let removed = self.ledger.cascade_remove_by_course(course_code);
        self.courses.remove(course_code);
        info!("Deleted course {course_code} and {removed} enrollment(s)");
        self.flush(&[DataFile::Courses, DataFile::Enrollments])?;
        Ok(removed)
    }

    /// Mean numeric grade of a course's graded enrollments, 0.0 when none
    ///
    /// # Errors
    /// [`RegistryError::NotFound`] if the course does not exist
    pub fn course_average(&self, course_code: &str) -> RegistryResult<f64> {
        if !self.courses.contains(course_code) {
            return Err(RegistryError::not_found(RecordKind::Course, course_code));
        }
        let grades = self.ledger.by_course_code(course_code).into_iter().map(|e| e.grade);
        Ok(grading::average_score(grades))
    }

    // ----- enrollments -----

    /// Enroll a student in a course, dated by the registry clock
    ///
    /// # Errors
    /// [`RegistryError::NotFound`], [`RegistryError::AlreadyEnrolled`], or
    /// [`RegistryError::Storage`]
    pub fn enroll(&mut self, student_id: &str, course_code: &str) -> RegistryResult<Enrollment> {
        let enrolled_at = self.clock.now();
        let enrollment = self
            .ledger
            .enroll(&self.students, &self.courses, student_id, course_code, enrolled_at)?
            .clone();
        info!("Enrolled {student_id} in {course_code}");
        self.flush(&[DataFile::Enrollments])?;
        Ok(enrollment)
    }

    /// Drop an enrollment. Returns whether one existed.
    ///
    /// # Errors
    /// [`RegistryError::Storage`] if the flush fails after removal
    pub fn drop_enrollment(&mut self, student_id: &str, course_code: &str) -> RegistryResult<bool> {
        if !self.ledger.drop(student_id, course_code) {
            debug!("No enrollment of {student_id} in {course_code} to drop");
            return Ok(false);
        }
        info!("Dropped {student_id} from {course_code}");
        self.flush(&[DataFile::Enrollments])?;
        Ok(true)
    }

    /// Record a grade
    ///
    /// # Errors
    /// [`RegistryError::NotFound`], [`RegistryError::OutOfRange`], or
    /// [`RegistryError::Storage`]
    pub fn update_grade(
        &mut self,
        student_id: &str,
        course_code: &str,
        grade: f64,
    ) -> RegistryResult<Enrollment> {
        let enrollment = self
            .ledger
            .update_grade(student_id, course_code, grade)?
            .clone();
        info!("Graded {student_id} in {course_code}: {grade}");
        self.flush(&[DataFile::Enrollments])?;
        Ok(enrollment)
    }

    /// Enrollment for a pair
    #[must_use]
    pub fn enrollment(&self, student_id: &str, course_code: &str) -> Option<&Enrollment> {
        self.ledger.get(student_id, course_code)
    }

    /// All enrollments in the order they were made
    #[must_use]
    pub fn enrollments(&self) -> Vec<&Enrollment> {
        self.ledger.list()
    }

    /// A student's enrollments
    #[must_use]
    pub fn enrollments_for_student(&self, student_id: &str) -> Vec<&Enrollment> {
        self.ledger.by_student_id(student_id)
    }

    /// A course's enrollments
    #[must_use]
    pub fn enrollments_for_course(&self, course_code: &str) -> Vec<&Enrollment> {
        self.ledger.by_course_code(course_code)
    }

    // ----- grades -----

    /// Unweighted GPA over a student's graded enrollments, 0.0 when none
    ///
    /// # Errors
    /// [`RegistryError::NotFound`] if the student does not exist
    pub fn gpa(&self, student_id: &str) -> RegistryResult<f64> {
        if !self.students.contains(student_id) {
            return Err(RegistryError::not_found(RecordKind::Student, student_id));
        }
        let grades = self.ledger.by_student_id(student_id).into_iter().map(|e| e.grade);
        Ok(grading::grade_point_average(grades))
    }

    /// Assemble a student's transcript
    ///
    /// # Errors
    /// [`RegistryError::NotFound`] if the student does not exist
    pub fn transcript(&self, student_id: &str) -> RegistryResult<Transcript> {
        let student = self
            .students
            .get(student_id)
            .ok_or_else(|| RegistryError::not_found(RecordKind::Student, student_id))?;
        let enrollments = self.ledger.by_student_id(student_id);
        Ok(Transcript::assemble(
            student,
            &enrollments,
            &self.courses,
            self.clock.now(),
        ))
    }

    // ----- persistence -----

    /// Write every list to the store
    ///
    /// # Errors
    /// [`RegistryError::Storage`] if any list fails to save
    pub fn save_all(&self) -> RegistryResult<()> {
        self.flush(&DataFile::ALL)
    }

    fn flush(&self, files: &[DataFile]) -> RegistryResult<()> {
        for file in files {
            let result = match file {
                DataFile::Students => self.store.save_students(&self.students.snapshot()),
                DataFile::Courses => self.store.save_courses(&self.courses.snapshot()),
                DataFile::Enrollments => self.store.save_enrollments(&self.ledger.snapshot()),
            };
            if let Err(err) = result {
                error!("Failed to save {file}: {err}");
                return Err(err.into());
            }
        }
        Ok(())
    }
}

/// Check a stored enrollment against the loaded catalogs and append it
fn admit(
    ledger: &mut EnrollmentLedger,
    students: &StudentCatalog,
    courses: &CourseCatalog,
    mut enrollment: Enrollment,
) -> RegistryResult<()> {
    enrollment.normalize();
    let errors = enrollment.validate();
    if !errors.is_empty() {
        return Err(RegistryError::ValidationFailed(errors));
    }

    let missing = if !students.contains(&enrollment.student_id) {
        Some(RecordKind::Student)
    } else if !courses.contains(&enrollment.course_code) {
        Some(RecordKind::Course)
    } else {
        None
    };
    if let Some(missing) = missing {
        return Err(RegistryError::ReferentialIntegrityViolation {
            student_id: enrollment.student_id,
            course_code: enrollment.course_code,
            missing,
        });
    }

    let key = enrollment.key();
    ledger
        .insert(enrollment)
        .map(|_| ())
        .map_err(|_| RegistryError::duplicate(RecordKind::Enrollment, key.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::SteppingClock;
    use crate::core::storage::MemoryStore;
    use chrono::{Duration, TimeZone, Utc};

    fn clock() -> SteppingClock {
        SteppingClock::new(
            Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap(),
            Duration::minutes(1),
        )
    }

    fn student(id: &str) -> Student {
        Student::new(
            id.to_string(),
            format!("Student {id}"),
            format!("{}@x.com", id.to_lowercase()),
            "CS".to_string(),
        )
    }

    fn course(code: &str) -> Course {
        Course::new(code.to_string(), format!("Course {code}"), 3, "Dr. Smith".to_string())
    }

    fn seeded(store: &MemoryStore) -> Registry<&MemoryStore> {
        let (mut registry, report) = Registry::open(store, clock()).unwrap();
        assert!(report.is_clean());
        for id in ["S001", "S002"] {
            registry.add_student(student(id)).unwrap();
        }
        for code in ["CSC1234", "MAT5678"] {
            registry.add_course(course(code)).unwrap();
        }
        registry
    }

    #[test]
    fn mutations_are_flushed() {
        let store = MemoryStore::new();
        let mut registry = seeded(&store);
        registry.enroll("S001", "CSC1234").unwrap();
        registry.update_grade("S001", "CSC1234", 91.0).unwrap();

        assert_eq!(store.load_students().unwrap().len(), 2);
        assert_eq!(store.load_courses().unwrap().len(), 2);
        let saved = store.load_enrollments().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].grade, Some(91.0));
    }

    #[test]
    fn enroll_uses_clock() {
        let store = MemoryStore::new();
        let mut registry = seeded(&store);
        let first = registry.enroll("S001", "CSC1234").unwrap();
        let second = registry.enroll("S001", "MAT5678").unwrap();
        assert!(first.enrollment_date < second.enrollment_date);
        assert!(first.grade.is_none());
    }

    #[test]
    fn delete_student_cascades() {
        let store = MemoryStore::new();
        let mut registry = seeded(&store);
        registry.enroll("S001", "CSC1234").unwrap();
        registry.enroll("S001", "MAT5678").unwrap();
        registry.enroll("S002", "CSC1234").unwrap();

        assert_eq!(registry.delete_student("S001").unwrap(), 2);
        assert!(registry.student("S001").is_none());
        assert_eq!(registry.enrollments().len(), 1);
        assert_eq!(registry.enrollments_for_course("CSC1234").len(), 1);
        assert_eq!(store.load_enrollments().unwrap().len(), 1);

        assert!(matches!(
            registry.delete_student("S001"),
            Err(RegistryError::NotFound { kind: RecordKind::Student, .. })
        ));
    }

    #[test]
    fn delete_course_cascades() {
        let store = MemoryStore::new();
        let mut registry = seeded(&store);
        registry.enroll("S001", "CSC1234").unwrap();
        registry.enroll("S002", "CSC1234").unwrap();
        registry.enroll("S002", "MAT5678").unwrap();

        assert_eq!(registry.delete_course("CSC1234").unwrap(), 2);
        assert_eq!(registry.enrollments_for_student("S002").len(), 1);
        assert!(registry.enrollments_for_student("S001").is_empty());
    }

    #[test]
    fn course_average_over_graded_only() {
        let store = MemoryStore::new();
        let mut registry = seeded(&store);
        registry.enroll("S001", "CSC1234").unwrap();
        registry.enroll("S002", "CSC1234").unwrap();
        assert!(registry.course_average("CSC1234").unwrap().abs() < f64::EPSILON);

        registry.update_grade("S001", "CSC1234", 80.0).unwrap();
        assert!((registry.course_average("CSC1234").unwrap() - 80.0).abs() < 1e-9);
        assert!(registry.course_average("XYZ0000").is_err());
    }

    #[test]
    fn flush_failure_keeps_memory_state() {
        let store = MemoryStore::new().failing_writes();
        let (mut registry, _) = Registry::open(&store, clock()).unwrap();

        let err = registry.add_student(student("S001")).unwrap_err();
        assert!(matches!(err, RegistryError::Storage(_)));
        assert!(registry.student("S001").is_some());
        assert!(store.load_students().unwrap().is_empty());
    }

    #[test]
    fn load_drops_orphans_and_duplicates() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let enrollment =
            |sid: &str, code: &str| Enrollment::new(sid.to_string(), code.to_string(), at);
        let mut out_of_range = enrollment("S001", "MAT5678");
        out_of_range.grade = Some(120.0);

        let store = MemoryStore::with_records(
            vec![student("S001"), student("S001")],
            vec![course("CSC1234"), course("MAT5678")],
            vec![
                enrollment("S001", "CSC1234"),
                enrollment("S001", "CSC1234"),
                enrollment("S404", "CSC1234"),
                enrollment("S001", "XYZ9999"),
                out_of_range,
            ],
        );
        let (registry, report) = Registry::open(&store, clock()).unwrap();

        assert_eq!(registry.students().len(), 1);
        assert_eq!(registry.enrollments().len(), 1);
        let rejected = report.rejected();
        assert_eq!(rejected.len(), 5);
        assert!(matches!(
            rejected[0],
            RegistryError::DuplicateKey { kind: RecordKind::Student, .. }
        ));
        assert!(matches!(
            rejected[1],
            RegistryError::DuplicateKey { kind: RecordKind::Enrollment, .. }
        ));
        assert!(matches!(
            rejected[2],
            RegistryError::ReferentialIntegrityViolation { missing: RecordKind::Student, .. }
        ));
        assert!(matches!(
            rejected[3],
            RegistryError::ReferentialIntegrityViolation { missing: RecordKind::Course, .. }
        ));
        assert!(matches!(rejected[4], RegistryError::ValidationFailed(_)));
    }

    #[test]
    fn load_trims_padded_identities() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let padded = Student {
            student_id: "S001 ".to_string(),
            ..student("S001")
        };
        let padded_course = Course {
            course_code: " CSC1234".to_string(),
            ..course("CSC1234")
        };
        let store = MemoryStore::with_records(
            vec![padded],
            vec![padded_course],
            vec![Enrollment::new(" S001".to_string(), "CSC1234 ".to_string(), at)],
        );
        let (mut registry, report) = Registry::open(&store, clock()).unwrap();

        assert!(report.is_clean());
        assert!(registry.student("S001").is_some());
        assert!(registry.course("CSC1234").is_some());
        assert!(registry.enrollment("S001", "CSC1234").is_some());
        assert!(matches!(
            registry.add_student(student("S001")),
            Err(RegistryError::DuplicateKey { kind: RecordKind::Student, .. })
        ));
        assert!(matches!(
            registry.enroll("S001", "CSC1234"),
            Err(RegistryError::AlreadyEnrolled { .. })
        ));
        assert_eq!(registry.students().len(), 1);
    }

    #[test]
    fn gpa_and_transcript_need_a_student() {
        let store = MemoryStore::new();
        let registry = seeded(&store);
        assert!(matches!(
            registry.gpa("S404"),
            Err(RegistryError::NotFound { .. })
        ));
        assert!(registry.transcript("S404").is_err());
        assert!(registry.gpa("S002").unwrap().abs() < f64::EPSILON);
    }
}
