//! Enrollment model

use crate::core::grading::{self, LetterGrade};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Identity of an enrollment: one per (student, course) pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnrollmentKey {
    /// Enrolled student
    pub student_id: String,
    /// Course enrolled in
    pub course_code: String,
}

impl EnrollmentKey {
    /// Build a key from its two halves
    #[must_use]
    pub fn new(student_id: &str, course_code: &str) -> Self {
        Self {
            student_id: student_id.to_string(),
            course_code: course_code.to_string(),
        }
    }
}

impl fmt::Display for EnrollmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.student_id, self.course_code)
    }
}

/// A student's enrollment in a course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
    /// Enrolled student
    pub student_id: String,

    /// Course enrolled in
    pub course_code: String,

    /// Numeric grade in [0, 100]; `None` while in progress
    pub grade: Option<f64>,

    /// When the enrollment was created
    #[serde(deserialize_with = "deserialize_enrollment_date")]
    pub enrollment_date: DateTime<Utc>,
}

impl Enrollment {
    /// Create an ungraded enrollment stamped with `enrollment_date`
    #[must_use]
    pub const fn new(
        student_id: String,
        course_code: String,
        enrollment_date: DateTime<Utc>,
    ) -> Self {
        Self {
            student_id,
            course_code,
            grade: None,
            enrollment_date,
        }
    }

    /// Identity of this enrollment
    #[must_use]
    pub fn key(&self) -> EnrollmentKey {
        EnrollmentKey::new(&self.student_id, &self.course_code)
    }

    /// Trim surrounding whitespace from the student and course ids
    pub fn normalize(&mut self) {
        for field in [&mut self.student_id, &mut self.course_code] {
            let trimmed = field.trim();
            if trimmed.len() != field.len() {
                *field = trimmed.to_string();
            }
        }
    }

    /// Check every field and collect a message per violation
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.student_id.trim().is_empty() {
            errors.push("Student ID is required and cannot be empty".to_string());
        }
        if self.course_code.trim().is_empty() {
            errors.push("Course code is required and cannot be empty".to_string());
        }
        if let Some(grade) = self.grade {
            if !grading::is_valid_grade(grade) {
                errors.push("Grade must be between 0 and 100".to_string());
            }
        }

        errors
    }

    /// Letter for the current grade, `None` while ungraded
    #[must_use]
    pub fn letter_grade(&self) -> Option<LetterGrade> {
        grading::letter_for(self.grade)
    }

    /// Whether a grade has been recorded
    #[must_use]
    pub const fn is_graded(&self) -> bool {
        self.grade.is_some()
    }
}

impl fmt::Display for Enrollment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.grade {
            Some(grade) => write!(
                f,
                "{} in {}: {grade} ({})",
                self.student_id,
                self.course_code,
                grading::letter_label(Some(grade))
            ),
            None => write!(f, "{} in {}: Not graded", self.student_id, self.course_code),
        }
    }
}

/// Accept RFC 3339 timestamps, and offset-less ISO timestamps read as UTC
fn deserialize_enrollment_date<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(stamp) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(stamp.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(serde::de::Error::custom)
}
