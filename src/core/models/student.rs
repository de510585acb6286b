//! Student model

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email pattern")
});

/// Represents a student on record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Unique student identifier (e.g., "S001")
    pub student_id: String,

    /// Full name
    pub name: String,

    /// Contact email in `local@domain.tld` form
    pub email: String,

    /// Academic program (e.g., "CS")
    pub program: String,
}

/// Fields of a [`Student`] that may change after creation
///
/// `None` leaves the field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentPatch {
    /// New full name
    pub name: Option<String>,
    /// New email
    pub email: Option<String>,
    /// New program
    pub program: Option<String>,
}

impl StudentPatch {
    /// Returns true when the patch changes nothing
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.program.is_none()
    }
}

/// Search criteria for students
///
/// `name` matches as a case-insensitive substring; `program` must match exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentQuery {
    /// Partial name
    pub name: Option<String>,
    /// Exact program
    pub program: Option<String>,
}

impl Student {
    /// Create a new student
    ///
    /// Surrounding whitespace is trimmed from every field.
    ///
    /// # Arguments
    /// * `student_id` - Unique identifier
    /// * `name` - Full name
    /// * `email` - Email address
    /// * `program` - Academic program
    #[must_use]
    pub fn new(student_id: String, name: String, email: String, program: String) -> Self {
        Self {
            student_id: student_id.trim().to_string(),
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            program: program.trim().to_string(),
        }
    }

    /// Trim surrounding whitespace from every field
    pub fn normalize(&mut self) {
        for field in [&mut self.student_id, &mut self.name, &mut self.email, &mut self.program] {
            let trimmed = field.trim();
            if trimmed.len() != field.len() {
                *field = trimmed.to_string();
            }
        }
    }

    /// Check every field and collect a message per violation
    ///
    /// # Returns
    /// An empty list when the student is valid
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.student_id.trim().is_empty() {
            errors.push("Student ID is required and cannot be empty".to_string());
        }
        if self.name.trim().is_empty() {
            errors.push("Name is required and cannot be empty".to_string());
        }
        if self.email.trim().is_empty() {
            errors.push("Email is required and cannot be empty".to_string());
        } else if !EMAIL_PATTERN.is_match(&self.email) {
            errors.push("Email format is invalid".to_string());
        }
        if self.program.trim().is_empty() {
            errors.push("Program is required and cannot be empty".to_string());
        }

        errors
    }

    /// Apply a patch in place. Does not validate.
    pub fn apply(&mut self, patch: StudentPatch) {
        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(email) = patch.email {
            self.email = email.trim().to_string();
        }
        if let Some(program) = patch.program {
            self.program = program.trim().to_string();
        }
    }

    /// Whether this student satisfies every criterion in `query`
    #[must_use]
    pub fn matches(&self, query: &StudentQuery) -> bool {
        let name_ok = query
            .name
            .as_deref()
            .filter(|n| !n.is_empty())
            .is_none_or(|n| self.name.to_lowercase().contains(&n.to_lowercase()));
        let program_ok = query
            .program
            .as_deref()
            .filter(|p| !p.is_empty())
            .is_none_or(|p| self.program == p);
        name_ok && program_ok
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} - {}", self.student_id, self.name, self.program)
    }
}
