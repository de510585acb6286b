//! Enrollment ledger
//!
//! Enrollments live in one map keyed by (student, course). Insertion order and
//! the by-student / by-course groupings hold keys only, so a grade update
//! touches a single record and every view sees it.

use crate::core::catalog::{CourseCatalog, StudentCatalog};
use crate::core::error::{RecordKind, RegistryError, RegistryResult};
use crate::core::grading;
use crate::core::models::{Enrollment, EnrollmentKey};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// All enrollments plus their by-student and by-course groupings
#[derive(Debug, Clone, Default)]
pub struct EnrollmentLedger {
    records: HashMap<EnrollmentKey, Enrollment>,
    order: Vec<EnrollmentKey>,
    by_student: HashMap<String, Vec<EnrollmentKey>>,
    by_course: HashMap<String, Vec<EnrollmentKey>>,
}

impl EnrollmentLedger {
    /// Create an empty ledger
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enroll a student in a course
    ///
    /// The new enrollment is ungraded and stamped with `enrolled_at`.
    ///
    /// # Errors
    /// - [`RegistryError::NotFound`] if the student or course is not in its catalog
    ///   (the student is checked first)
    /// - [`RegistryError::AlreadyEnrolled`] if the pair is already on the ledger
    pub fn enroll(
        &mut self,
        students: &StudentCatalog,
        courses: &CourseCatalog,
        student_id: &str,
        course_code: &str,
        enrolled_at: DateTime<Utc>,
    ) -> RegistryResult<&Enrollment> {
        if !students.contains(student_id) {
            return Err(RegistryError::not_found(RecordKind::Student, student_id));
        }
        if !courses.contains(course_code) {
            return Err(RegistryError::not_found(RecordKind::Course, course_code));
        }

        let enrollment =
            Enrollment::new(student_id.to_string(), course_code.to_string(), enrolled_at);
        self.insert(enrollment)
    }

    /// Append an existing record, enforcing pair uniqueness only
    ///
    /// Used by the load path after references have been checked.
    pub(crate) fn insert(&mut self, enrollment: Enrollment) -> RegistryResult<&Enrollment> {
        let key = enrollment.key();
        if self.records.contains_key(&key) {
            return Err(RegistryError::AlreadyEnrolled {
                student_id: key.student_id,
                course_code: key.course_code,
            });
        }

        self.order.push(key.clone());
        self.by_student
            .entry(key.student_id.clone())
            .or_default()
            .push(key.clone());
        self.by_course
            .entry(key.course_code.clone())
            .or_default()
            .push(key.clone());
        Ok(&*self.records.entry(key).or_insert(enrollment))
    }

    /// Remove the enrollment for a pair. Returns whether one was removed.
    pub fn drop(&mut self, student_id: &str, course_code: &str) -> bool {
        let key = EnrollmentKey::new(student_id, course_code);
        if self.records.remove(&key).is_none() {
            return false;
        }
        self.order.retain(|k| *k != key);
        detach(&mut self.by_student, student_id, |k| *k != key);
        detach(&mut self.by_course, course_code, |k| *k != key);
        true
    }

    /// Record a grade for an existing enrollment
    ///
    /// # Errors
    /// - [`RegistryError::NotFound`] if the pair is not enrolled
    /// - [`RegistryError::OutOfRange`] if `grade` is outside [0, 100] or not finite
    pub fn update_grade(
        &mut self,
        student_id: &str,
        course_code: &str,
        grade: f64,
    ) -> RegistryResult<&Enrollment> {
        let key = EnrollmentKey::new(student_id, course_code);
        let enrollment = self
            .records
            .get_mut(&key)
            .ok_or_else(|| RegistryError::not_found(RecordKind::Enrollment, key.to_string()))?;

        if !grading::is_valid_grade(grade) {
            return Err(RegistryError::OutOfRange {
                field: "grade",
                value: grade,
            });
        }

        enrollment.grade = Some(grade);
        Ok(&*enrollment)
    }

    /// Remove every enrollment of a student. Returns how many were removed.
    pub fn cascade_remove_by_student(&mut self, student_id: &str) -> usize {
        let Some(keys) = self.by_student.remove(student_id) else {
            return 0;
        };
        for key in &keys {
            self.records.remove(key);
            detach(&mut self.by_course, &key.course_code, |k| k.student_id != student_id);
        }
        self.order.retain(|k| k.student_id != student_id);
        keys.len()
    }

    /// Remove every enrollment in a course. Returns how many were removed.
    pub fn cascade_remove_by_course(&mut self, course_code: &str) -> usize {
        let Some(keys) = self.by_course.remove(course_code) else {
            return 0;
        };
        for key in &keys {
            self.records.remove(key);
            detach(&mut self.by_student, &key.student_id, |k| k.course_code != course_code);
        }
        self.order.retain(|k| k.course_code != course_code);
        keys.len()
    }

    /// Enrollment for a pair, if any
    #[must_use]
    pub fn get(&self, student_id: &str, course_code: &str) -> Option<&Enrollment> {
        self.records.get(&EnrollmentKey::new(student_id, course_code))
    }

    /// A student's enrollments in the order they were made
    #[must_use]
    pub fn by_student_id(&self, student_id: &str) -> Vec<&Enrollment> {
        self.resolve(self.by_student.get(student_id))
    }

    /// A course's enrollments in the order they were made
    #[must_use]
    pub fn by_course_code(&self, course_code: &str) -> Vec<&Enrollment> {
        self.resolve(self.by_course.get(course_code))
    }

    /// All enrollments in insertion order
    #[must_use]
    pub fn list(&self) -> Vec<&Enrollment> {
        self.resolve(Some(&self.order))
    }

    /// Owned copies of all enrollments in insertion order, as handed to storage
    #[must_use]
    pub fn snapshot(&self) -> Vec<Enrollment> {
        self.list().into_iter().cloned().collect()
    }

    /// Number of enrollments
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the ledger is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn resolve(&self, keys: Option<&Vec<EnrollmentKey>>) -> Vec<&Enrollment> {
        keys.map_or_else(Vec::new, |keys| {
            keys.iter().filter_map(|key| self.records.get(key)).collect()
        })
    }
}

/// Keep only the keys in `group` that satisfy `keep`, dropping the group when it empties
fn detach<F>(groups: &mut HashMap<String, Vec<EnrollmentKey>>, group: &str, keep: F)
where
    F: FnMut(&EnrollmentKey) -> bool,
{
    if let Some(keys) = groups.get_mut(group) {
        keys.retain(keep);
        if keys.is_empty() {
            groups.remove(group);
        }
    }
}
