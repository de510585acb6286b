//! Transcript assembly

use crate::core::catalog::CourseCatalog;
use crate::core::grading::{self, LetterGrade};
use crate::core::models::{Enrollment, Student};
use chrono::{DateTime, Utc};

/// One course line on a transcript
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptEntry {
    /// Course code
    pub course_code: String,
    /// Course title
    pub course_name: String,
    /// Credit hours of the course
    pub credits: i32,
    /// Numeric grade, `None` while in progress
    pub grade: Option<f64>,
    /// Letter for `grade`, `None` while in progress
    pub letter: Option<LetterGrade>,
    /// When the student enrolled
    pub enrolled_at: DateTime<Utc>,
}

impl TranscriptEntry {
    /// Letter as printed, `N/A` while ungraded
    #[must_use]
    pub fn letter_label(&self) -> &'static str {
        self.letter.map_or(grading::UNGRADED_LABEL, LetterGrade::as_str)
    }

    /// Numeric grade as printed, `N/A` while ungraded
    #[must_use]
    pub fn grade_label(&self) -> String {
        self.grade
            .map_or_else(|| grading::UNGRADED_LABEL.to_string(), |g| format!("{g:.1}"))
    }
}

/// A student's academic record at a point in time
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    /// The student the transcript belongs to
    pub student: Student,
    /// Courses ordered by enrollment date, oldest first
    pub entries: Vec<TranscriptEntry>,
    /// Unweighted GPA over graded entries
    pub gpa: f64,
    /// Credits of every entry
    pub credits_attempted: i32,
    /// Credits of graded entries that did not fail
    pub credits_earned: i32,
    /// When the transcript was assembled
    pub generated_at: DateTime<Utc>,
}

impl Transcript {
    /// Build a transcript from a student's enrollments
    ///
    /// `enrollments` are expected in ledger order; entries with equal dates
    /// keep that order.
    #[must_use]
    pub fn assemble(
        student: &Student,
        enrollments: &[&Enrollment],
        courses: &CourseCatalog,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let mut entries: Vec<TranscriptEntry> = enrollments
            .iter()
            .map(|enrollment| {
                let course = courses.get(&enrollment.course_code);
                TranscriptEntry {
                    course_code: enrollment.course_code.clone(),
                    course_name: course.map(|c| c.name.clone()).unwrap_or_default(),
                    credits: course.map_or(0, |c| c.credits),
                    grade: enrollment.grade,
                    letter: enrollment.letter_grade(),
                    enrolled_at: enrollment.enrollment_date,
                }
            })
            .collect();
        entries.sort_by_key(|entry| entry.enrolled_at);

        let gpa = grading::grade_point_average(entries.iter().map(|entry| entry.grade));
        let credits_attempted = entries.iter().map(|entry| entry.credits).sum();
        let credits_earned = entries
            .iter()
            .filter(|entry| entry.letter.is_some_and(LetterGrade::is_passing))
            .map(|entry| entry.credits)
            .sum();

        Self {
            student: student.clone(),
            entries,
            gpa,
            credits_attempted,
            credits_earned,
            generated_at,
        }
    }

    /// Number of graded entries
    #[must_use]
    pub fn graded_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.grade.is_some()).count()
    }
}
