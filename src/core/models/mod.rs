//! Data models for `NuRegistrar`

pub mod course;
pub mod enrollment;
pub mod student;

pub use course::{Course, CoursePatch, CourseQuery};
pub use enrollment::{Enrollment, EnrollmentKey};
pub use student::{Student, StudentPatch, StudentQuery};
