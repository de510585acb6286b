//! Course model

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static COURSE_CODE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{3}\d{4}$").expect("valid course code pattern"));

/// Smallest credit load a course may carry
pub const MIN_CREDITS: i32 = 1;
/// Largest credit load a course may carry
pub const MAX_CREDITS: i32 = 6;

/// Represents a course offering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Course code: three uppercase letters then four digits (e.g., "CSC1234")
    pub course_code: String,

    /// Course name (e.g., "Intro to Programming")
    pub name: String,

    /// Credit hours, 1 through 6
    pub credits: i32,

    /// Instructor name
    pub instructor: String,
}

/// Fields of a [`Course`] that may change after creation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoursePatch {
    /// New course name
    pub name: Option<String>,
    /// New credit hours
    pub credits: Option<i32>,
    /// New instructor
    pub instructor: Option<String>,
}

impl CoursePatch {
    /// Returns true when the patch changes nothing
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.credits.is_none() && self.instructor.is_none()
    }
}

/// Search criteria for courses
///
/// `course_code` and `name` match as case-insensitive substrings; `instructor`
/// must match exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseQuery {
    /// Partial course code
    pub course_code: Option<String>,
    /// Partial name
    pub name: Option<String>,
    /// Exact instructor
    pub instructor: Option<String>,
}

fn contains_ignore_case(haystack: &str, needle: Option<&str>) -> bool {
    needle
        .filter(|n| !n.is_empty())
        .is_none_or(|n| haystack.to_lowercase().contains(&n.to_lowercase()))
}

impl Course {
    /// Create a new course
    ///
    /// # Arguments
    /// * `course_code` - Code in `XXX1234` form
    /// * `name` - Course name
    /// * `credits` - Credit hours (1-6)
    /// * `instructor` - Instructor name
    #[must_use]
    pub fn new(course_code: String, name: String, credits: i32, instructor: String) -> Self {
        Self {
            course_code: course_code.trim().to_string(),
            name: name.trim().to_string(),
            credits,
            instructor: instructor.trim().to_string(),
        }
    }

    /// Whether `code` has the `XXX1234` shape
    #[must_use]
    pub fn is_valid_code(code: &str) -> bool {
        COURSE_CODE_PATTERN.is_match(code)
    }

    /// Trim surrounding whitespace from every text field
    pub fn normalize(&mut self) {
        for field in [&mut self.course_code, &mut self.name, &mut self.instructor] {
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

        if self.course_code.trim().is_empty() {
            errors.push("Course code is required and cannot be empty".to_string());
        } else if !Self::is_valid_code(&self.course_code) {
            errors.push(
                "Course code must be in format XXX1234 (three uppercase letters followed by four digits)"
                    .to_string(),
            );
        }
        if self.name.trim().is_empty() {
            errors.push("Course name is required and cannot be empty".to_string());
        }
        if !(MIN_CREDITS..=MAX_CREDITS).contains(&self.credits) {
            errors.push(format!(
                "Credits must be between {MIN_CREDITS} and {MAX_CREDITS}"
            ));
        }
        if self.instructor.trim().is_empty() {
            errors.push("Instructor name is required and cannot be empty".to_string());
        }

        errors
    }

    /// Apply a patch in place. Does not validate.
    pub fn apply(&mut self, patch: CoursePatch) {
        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(credits) = patch.credits {
            self.credits = credits;
        }
        if let Some(instructor) = patch.instructor {
            self.instructor = instructor.trim().to_string();
        }
    }

    /// Whether this course satisfies every criterion in `query`
    #[must_use]
    pub fn matches(&self, query: &CourseQuery) -> bool {
        let instructor_ok = query
            .instructor
            .as_deref()
            .filter(|i| !i.is_empty())
            .is_none_or(|i| self.instructor == i);
        contains_ignore_case(&self.course_code, query.course_code.as_deref())
            && contains_ignore_case(&self.name, query.name.as_deref())
            && instructor_ok
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} - {} credits ({})",
            self.course_code, self.name, self.credits, self.instructor
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intro() -> Course {
        Course::new(
            "CSC1234".to_string(),
            "Intro to Programming".to_string(),
            3,
            "Dr. Smith".to_string(),
        )
    }

    #[test]
    fn test_valid_course() {
        assert!(intro().validate().is_empty());
    }

    #[test]
    fn test_course_code_shape() {
        assert!(Course::is_valid_code("MAT5678"));
        assert!(!Course::is_valid_code("csc1234"));
        assert!(!Course::is_valid_code("CS1234"));
        assert!(!Course::is_valid_code("CSC123"));
        assert!(!Course::is_valid_code("CSC12345"));
    }

    #[test]
    fn test_credit_bounds() {
        for credits in [MIN_CREDITS, MAX_CREDITS] {
            let mut course = intro();
            course.credits = credits;
            assert!(course.validate().is_empty());
        }
        for credits in [0, 7, -1] {
            let mut course = intro();
            course.credits = credits;
            assert_eq!(course.validate(), vec!["Credits must be between 1 and 6"]);
        }
    }

    #[test]
    fn test_reports_every_violation() {
        let course = Course::new("INVALID".to_string(), String::new(), 0, String::new());
        assert_eq!(course.validate().len(), 4);
    }

    #[test]
    fn test_matches_query() {
        let course = intro();
        assert!(course.matches(&CourseQuery {
            course_code: Some("csc".to_string()),
            ..CourseQuery::default()
        }));
        assert!(course.matches(&CourseQuery {
            name: Some("PROGRAM".to_string()),
            instructor: Some("Dr. Smith".to_string()),
            ..CourseQuery::default()
        }));
        assert!(!course.matches(&CourseQuery {
            instructor: Some("smith".to_string()),
            ..CourseQuery::default()
        }));
    }
}
