//! Enrollment and grade command handlers

use super::{failure, CliRegistry};
use nu_registrar::core::models::Enrollment;

/// Enroll a student in a course
pub fn enroll(
    registry: &mut CliRegistry,
    student_id: &str,
    course_code: &str,
) -> Result<(), String> {
    let enrollment = registry
        .enroll(student_id, course_code)
        .map_err(|e| failure(&e))?;
    println!(
        "✓ Enrolled {student_id} in {course_code} on {}",
        enrollment.enrollment_date.format("%Y-%m-%d %H:%M")
    );
    Ok(())
}

/// Drop a student from a course; a missing enrollment is reported, not an error
pub fn drop(registry: &mut CliRegistry, student_id: &str, course_code: &str) -> Result<(), String> {
    if registry
        .drop_enrollment(student_id, course_code)
        .map_err(|e| failure(&e))?
    {
        println!("✓ Dropped {student_id} from {course_code}");
    } else {
        println!("{student_id} is not enrolled in {course_code}; nothing to drop");
    }
    Ok(())
}

/// Record a grade
pub fn grade(
    registry: &mut CliRegistry,
    student_id: &str,
    course_code: &str,
    grade: f64,
) -> Result<(), String> {
    let enrollment = registry
        .update_grade(student_id, course_code, grade)
        .map_err(|e| failure(&e))?;
    println!("✓ Recorded {enrollment}");
    Ok(())
}

/// List enrollments, filtered by student or course when given
pub fn list(registry: &CliRegistry, student: Option<&str>, course: Option<&str>) {
    let enrollments = match (student, course) {
        (Some(student_id), _) => registry.enrollments_for_student(student_id),
        (None, Some(course_code)) => registry.enrollments_for_course(course_code),
        (None, None) => registry.enrollments(),
    };
    print_enrollments(&enrollments);
}

/// Print a student's GPA
pub fn gpa(registry: &CliRegistry, student_id: &str) -> Result<(), String> {
    let gpa = registry.gpa(student_id).map_err(|e| failure(&e))?;
    println!("GPA for {student_id}: {gpa:.2}");
    Ok(())
}

fn print_enrollments(enrollments: &[&Enrollment]) {
    if enrollments.is_empty() {
        println!("No enrollments found.");
        return;
    }
    for enrollment in enrollments {
        println!("{enrollment}");
    }
}
