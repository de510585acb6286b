//! Error types for the registrar core and its storage layer

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which catalog a key belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// A student, keyed by `student_id`
    Student,
    /// A course, keyed by `course_code`
    Course,
    /// An enrollment, keyed by `student_id/course_code`
    Enrollment,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Student => write!(f, "student"),
            Self::Course => write!(f, "course"),
            Self::Enrollment => write!(f, "enrollment"),
        }
    }
}

/// Errors raised by catalog, ledger and registry operations
#[derive(Debug, Error)]
pub enum RegistryError {
    /// One or more field-level rule violations; nothing was applied
    #[error("validation failed: {}", .0.join("; "))]
    ValidationFailed(Vec<String>),

    /// Identity collision on add
    #[error("{kind} '{key}' already exists")]
    DuplicateKey {
        /// Catalog the collision happened in
        kind: RecordKind,
        /// Colliding identity
        key: String,
    },

    /// Referenced id or pair is absent
    #[error("{kind} '{key}' not found")]
    NotFound {
        /// Kind of record that was looked up
        kind: RecordKind,
        /// Identity that was looked up
        key: String,
    },

    /// The (student, course) pair is already in the ledger
    #[error("student '{student_id}' is already enrolled in '{course_code}'")]
    AlreadyEnrolled {
        /// Student half of the pair
        student_id: String,
        /// Course half of the pair
        course_code: String,
    },

    /// Numeric value outside its allowed range
    ///
    /// Raised for grades, and for credits when they are a course's only
    /// violation; credits alongside other errors go into `ValidationFailed`.
    #[error("{field} {value} is out of range")]
    OutOfRange {
        /// Field name, `grade` or `credits`
        field: &'static str,
        /// Rejected value
        value: f64,
    },

    /// A stored enrollment references a student or course that does not exist
    #[error("enrollment '{student_id}/{course_code}' references missing {missing}")]
    ReferentialIntegrityViolation {
        /// Student half of the orphaned pair
        student_id: String,
        /// Course half of the orphaned pair
        course_code: String,
        /// Which side is missing
        missing: RecordKind,
    },

    /// Persistence failed; in-memory state is unaffected
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl RegistryError {
    pub(crate) fn not_found(kind: RecordKind, key: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            key: key.into(),
        }
    }

    pub(crate) fn duplicate(kind: RecordKind, key: impl Into<String>) -> Self {
        Self::DuplicateKey {
            kind,
            key: key.into(),
        }
    }
}

/// Errors raised by a [`RecordStore`](crate::core::storage::RecordStore)
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading, writing, or copying a file failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// A data file exists but does not contain the expected JSON
    #[error("malformed data in {}: {source}", path.display())]
    Malformed {
        /// File involved
        path: PathBuf,
        /// Parser error
        #[source]
        source: serde_json::Error,
    },

    /// Records could not be serialized
    #[error("failed to serialize records: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;
