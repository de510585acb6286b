//! Course command handlers

use super::{confirm, failure, CliRegistry};
use crate::args::CourseCommand;
use nu_registrar::core::models::{Course, CoursePatch, CourseQuery};

/// Dispatch course subcommands
pub fn run(action: CourseCommand, registry: &mut CliRegistry) -> Result<(), String> {
    match action {
        CourseCommand::Add {
            course_code,
            name,
            credits,
            instructor,
        } => {
            let course = registry
                .add_course(Course::new(course_code, name, credits, instructor))
                .map_err(|e| failure(&e))?;
            println!("✓ Added course {course}");
        }
        CourseCommand::List => print_courses(&registry.courses()),
        CourseCommand::Show { course_code } => {
            let course = registry
                .course(&course_code)
                .ok_or_else(|| format!("✗ No course found for '{course_code}'"))?;
            println!("{course}");
            let enrollments = registry.enrollments_for_course(&course_code);
            if enrollments.is_empty() {
                println!("  No enrollments.");
            }
            for enrollment in enrollments {
                println!("  {enrollment}");
            }
        }
        CourseCommand::Search {
            code,
            name,
            instructor,
        } => {
            let query = CourseQuery {
                course_code: code,
                name,
                instructor,
            };
            print_courses(&registry.search_courses(&query));
        }
        CourseCommand::Update {
            course_code,
            name,
            credits,
            instructor,
        } => {
            let patch = CoursePatch {
                name,
                credits,
                instructor,
            };
            if patch.is_empty() {
                return Err(
                    "✗ Nothing to update; pass --name, --credits or --instructor".to_string(),
                );
            }
            let course = registry
                .update_course(&course_code, patch)
                .map_err(|e| failure(&e))?;
            println!("✓ Updated course {course}");
        }
        CourseCommand::Delete { course_code, yes } => {
            let enrolled = registry.enrollments_for_course(&course_code).len();
            if !yes
                && enrolled > 0
                && !confirm(&format!(
                    "Course {course_code} has {enrolled} enrollment(s) that will also be removed. Continue?"
                ))
            {
                println!("✗ Delete cancelled");
                return Ok(());
            }
            let removed = registry
                .delete_course(&course_code)
                .map_err(|e| failure(&e))?;
            println!("✓ Deleted course {course_code} ({removed} enrollment(s) removed)");
        }
        CourseCommand::Average { course_code } => {
            let average = registry
                .course_average(&course_code)
                .map_err(|e| failure(&e))?;
            let graded = registry
                .enrollments_for_course(&course_code)
                .iter()
                .filter(|e| e.is_graded())
                .count();
            println!("{course_code}: average {average:.2} over {graded} graded enrollment(s)");
        }
    }
    Ok(())
}

pub(super) fn print_courses(courses: &[&Course]) {
    if courses.is_empty() {
        println!("No courses found.");
        return;
    }
    for course in courses {
        println!("{course}");
    }
}
