//! Student command handlers

use super::{confirm, failure, CliRegistry};
use crate::args::StudentCommand;
use nu_registrar::core::grading;
use nu_registrar::core::models::{Student, StudentPatch, StudentQuery};

/// Dispatch student subcommands
pub fn run(action: StudentCommand, registry: &mut CliRegistry) -> Result<(), String> {
    match action {
        StudentCommand::Add {
            student_id,
            name,
            email,
            program,
        } => {
            let student = registry
                .add_student(Student::new(student_id, name, email, program))
                .map_err(|e| failure(&e))?;
            println!("✓ Added student {student}");
        }
        StudentCommand::List => print_students(&registry.students()),
        StudentCommand::Show { student_id } => show(registry, &student_id)?,
        StudentCommand::Search { name, program } => {
            let query = StudentQuery { name, program };
            print_students(&registry.search_students(&query));
        }
        StudentCommand::Update {
            student_id,
            name,
            email,
            program,
        } => {
            let patch = StudentPatch {
                name,
                email,
                program,
            };
            if patch.is_empty() {
                return Err("✗ Nothing to update; pass --name, --email or --program".to_string());
            }
            let student = registry
                .update_student(&student_id, patch)
                .map_err(|e| failure(&e))?;
            println!("✓ Updated student {student}");
        }
        StudentCommand::Delete { student_id, yes } => {
            let enrolled = registry.enrollments_for_student(&student_id).len();
            if !yes
                && enrolled > 0
                && !confirm(&format!(
                    "Student {student_id} has {enrolled} enrollment(s) that will also be removed. Continue?"
                ))
            {
                println!("✗ Delete cancelled");
                return Ok(());
            }
            let removed = registry
                .delete_student(&student_id)
                .map_err(|e| failure(&e))?;
            println!("✓ Deleted student {student_id} ({removed} enrollment(s) removed)");
        }
    }
    Ok(())
}

/// Print a student followed by their enrollments and GPA
fn show(registry: &CliRegistry, student_id: &str) -> Result<(), String> {
    let student = registry
        .student(student_id)
        .ok_or_else(|| format!("✗ No student found for '{student_id}'"))?;
    println!("{student}");

    let enrollments = registry.enrollments_for_student(student_id);
    if enrollments.is_empty() {
        println!("  No enrollments.");
        return Ok(());
    }
    for enrollment in &enrollments {
        println!("  {enrollment}");
    }
    let gpa = grading::grade_point_average(enrollments.iter().map(|e| e.grade));
    println!("  GPA: {gpa:.2}");
    Ok(())
}

pub(super) fn print_students(students: &[&Student]) {
    if students.is_empty() {
        println!("No students found.");
        return;
    }
    for student in students {
        println!("{student}");
    }
}
