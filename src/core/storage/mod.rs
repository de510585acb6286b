//! Persistence boundary
//!
//! The registry only needs to load and save three flat record lists. A missing
//! store reads as empty.

pub mod json;

pub use json::JsonFileStore;

use crate::core::error::StorageError;
use crate::core::models::{Course, Enrollment, Student};
use std::cell::RefCell;
use std::fmt;
use std::str::FromStr;

/// Durable home of the three record lists
pub trait RecordStore {
    /// Load all students; empty when nothing has been stored yet
    ///
    /// # Errors
    /// Returns an error if stored data cannot be read or parsed
    fn load_students(&self) -> Result<Vec<Student>, StorageError>;

    /// Replace the stored students
    ///
    /// # Errors
    /// Returns an error if the data cannot be written
    fn save_students(&self, students: &[Student]) -> Result<(), StorageError>;

    /// Load all courses; empty when nothing has been stored yet
    ///
    /// # Errors
    /// Returns an error if stored data cannot be read or parsed
    fn load_courses(&self) -> Result<Vec<Course>, StorageError>;

    /// Replace the stored courses
    ///
    /// # Errors
    /// Returns an error if the data cannot be written
    fn save_courses(&self, courses: &[Course]) -> Result<(), StorageError>;

    /// Load all enrollments in stored order; empty when nothing has been stored yet
    ///
    /// # Errors
    /// Returns an error if stored data cannot be read or parsed
    fn load_enrollments(&self) -> Result<Vec<Enrollment>, StorageError>;

    /// Replace the stored enrollments
    ///
    /// # Errors
    /// Returns an error if the data cannot be written
    fn save_enrollments(&self, enrollments: &[Enrollment]) -> Result<(), StorageError>;
}

/// One of the three stored lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFile {
    /// `students.json`
    Students,
    /// `courses.json`
    Courses,
    /// `enrollments.json`
    Enrollments,
}

impl DataFile {
    /// Every stored list
    pub const ALL: [Self; 3] = [Self::Students, Self::Courses, Self::Enrollments];

    /// Name of the list, also the top-level JSON key
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Students => "students",
            Self::Courses => "courses",
            Self::Enrollments => "enrollments",
        }
    }

    /// File name inside the data directory
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Students => "students.json",
            Self::Courses => "courses.json",
            Self::Enrollments => "enrollments.json",
        }
    }
}

impl FromStr for DataFile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "students" | "student" => Ok(Self::Students),
            "courses" | "course" => Ok(Self::Courses),
            "enrollments" | "enrollment" => Ok(Self::Enrollments),
            _ => Err(format!("Unknown data file: {s}")),
        }
    }
}

impl fmt::Display for DataFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Store that keeps everything in memory
///
/// Useful for tests and for running the registry without touching disk.
/// `fail_writes` makes every save fail, to exercise flush-failure handling.
#[derive(Debug, Default)]
pub struct MemoryStore {
    students: RefCell<Vec<Student>>,
    courses: RefCell<Vec<Course>>,
    enrollments: RefCell<Vec<Enrollment>>,
    fail_writes: bool,
}

impl MemoryStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with records, as if loaded from disk
    #[must_use]
    pub fn with_records(
        students: Vec<Student>,
        courses: Vec<Course>,
        enrollments: Vec<Enrollment>,
    ) -> Self {
        Self {
            students: RefCell::new(students),
            courses: RefCell::new(courses),
            enrollments: RefCell::new(enrollments),
            fail_writes: false,
        }
    }

    /// Make every save fail with an I/O error
    #[must_use]
    pub const fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    fn check_writable(&self, file: DataFile) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::io(
                file.file_name(),
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "store is read-only"),
            ));
        }
        Ok(())
    }
}

impl RecordStore for MemoryStore {
    fn load_students(&self) -> Result<Vec<Student>, StorageError> {
        Ok(self.students.borrow().clone())
    }

    fn save_students(&self, students: &[Student]) -> Result<(), StorageError> {
        self.check_writable(DataFile::Students)?;
        *self.students.borrow_mut() = students.to_vec();
        Ok(())
    }

    fn load_courses(&self) -> Result<Vec<Course>, StorageError> {
        Ok(self.courses.borrow().clone())
    }

    fn save_courses(&self, courses: &[Course]) -> Result<(), StorageError> {
        self.check_writable(DataFile::Courses)?;
        *self.courses.borrow_mut() = courses.to_vec();
        Ok(())
    }

    fn load_enrollments(&self) -> Result<Vec<Enrollment>, StorageError> {
        Ok(self.enrollments.borrow().clone())
    }

    fn save_enrollments(&self, enrollments: &[Enrollment]) -> Result<(), StorageError> {
        self.check_writable(DataFile::Enrollments)?;
        *self.enrollments.borrow_mut() = enrollments.to_vec();
        Ok(())
    }
}

impl<S: RecordStore + ?Sized> RecordStore for &S {
    fn load_students(&self) -> Result<Vec<Student>, StorageError> {
        (**self).load_students()
    }
    fn save_students(&self, students: &[Student]) -> Result<(), StorageError> {
        (**self).save_students(students)
    }
    fn load_courses(&self) -> Result<Vec<Course>, StorageError> {
        (**self).load_courses()
    }
    fn save_courses(&self, courses: &[Course]) -> Result<(), StorageError> {
        (**self).save_courses(courses)
    }
    fn load_enrollments(&self) -> Result<Vec<Enrollment>, StorageError> {
        (**self).load_enrollments()
    }
    fn save_enrollments(&self, enrollments: &[Enrollment]) -> Result<(), StorageError> {
        (**self).save_enrollments(enrollments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_file_parses_names() {
        assert_eq!("Students".parse::<DataFile>(), Ok(DataFile::Students));
        assert_eq!("course".parse::<DataFile>(), Ok(DataFile::Courses));
        assert!("grades".parse::<DataFile>().is_err());
        assert_eq!(DataFile::Enrollments.to_string(), "enrollments");
    }

    #[test]
    fn memory_store_round_trips() {
        let store = MemoryStore::new();
        assert!(store.load_students().unwrap().is_empty());
        let jane = Student::new(
            "S001".to_string(),
            "Jane".to_string(),
            "jane@x.com".to_string(),
            "CS".to_string(),
        );
        store.save_students(std::slice::from_ref(&jane)).unwrap();
        assert_eq!(store.load_students().unwrap(), vec![jane]);
    }

    #[test]
    fn failing_store_rejects_saves() {
        let store = MemoryStore::new().failing_writes();
        assert!(store.save_courses(&[]).is_err());
        assert!(store.load_courses().unwrap().is_empty());
    }
}
