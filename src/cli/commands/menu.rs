//! Interactive text menu
//!
//! Reads choices line by line, so it can be driven from a pipe or a test as
//! easily as from a terminal. End of input behaves like choosing Exit.

use super::describe;
use nu_registrar::core::models::{
    Course, CoursePatch, CourseQuery, Student, StudentPatch, StudentQuery,
};
use nu_registrar::core::report::ReportFormat;
use nu_registrar::core::storage::RecordStore;
use nu_registrar::core::{Registry, RegistryError};
use std::io::{self, BufRead, Write};

/// Menu session over a registry
pub struct Menu<'a, S: RecordStore, R: BufRead, W: Write> {
    registry: &'a mut Registry<S>,
    input: R,
    output: W,
}

impl<'a, S: RecordStore, R: BufRead, W: Write> Menu<'a, S, R, W> {
    /// Create a session reading from `input` and writing to `output`
    pub fn new(registry: &'a mut Registry<S>, input: R, output: W) -> Self {
        Self {
            registry,
            input,
            output,
        }
    }

    /// Run the main menu until Exit or end of input
    ///
    /// # Errors
    /// Returns an error if reading input or writing output fails
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            writeln!(self.output, "\n=== Student Course Management System ===")?;
            writeln!(self.output, "1. Manage Students")?;
            writeln!(self.output, "2. Manage Courses")?;
            writeln!(self.output, "3. Manage Enrollments")?;
            writeln!(self.output, "0. Exit")?;

            let Some(choice) = self.prompt("Enter your choice: ")? else {
                break;
            };
            let keep_going = match choice.as_str() {
                "1" => self.student_menu()?,
                "2" => self.course_menu()?,
                "3" => self.enrollment_menu()?,
                "0" => false,
                _ => {
                    writeln!(self.output, "Invalid choice. Please try again.")?;
                    true
                }
            };
            if !keep_going {
                break;
            }
        }
        writeln!(self.output, "Goodbye!")?;
        Ok(())
    }

    /// Print `label` and read one trimmed line; `None` at end of input
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Read a field; empty input becomes `None`
    fn optional(&mut self, label: &str) -> io::Result<Option<Option<String>>> {
        Ok(self
            .prompt(label)?
            .map(|value| (!value.is_empty()).then_some(value)))
    }

    fn report(&mut self, result: Result<String, RegistryError>) -> io::Result<()> {
        match result {
            Ok(message) => writeln!(self.output, "{message}"),
            Err(e) => writeln!(self.output, "Error: {}", describe(&e)),
        }
    }

    fn print_lines<T: std::fmt::Display>(&mut self, items: &[T], empty: &str) -> io::Result<()> {
        if items.is_empty() {
            return writeln!(self.output, "{empty}");
        }
        for item in items {
            writeln!(self.output, "{item}")?;
        }
        Ok(())
    }

    // Each submenu returns `false` when input ran out, ending the session.

    fn student_menu(&mut self) -> io::Result<bool> {
        loop {
            writeln!(self.output, "\n--- Student Management ---")?;
            writeln!(self.output, "1. Add Student")?;
            writeln!(self.output, "2. List Students")?;
            writeln!(self.output, "3. Search Students")?;
            writeln!(self.output, "4. Update Student")?;
            writeln!(self.output, "5. Delete Student")?;
            writeln!(self.output, "0. Back to Main Menu")?;

            let Some(choice) = self.prompt("Enter your choice: ")? else {
                return Ok(false);
            };
            let done = match choice.as_str() {
                "1" => self.add_student()?,
                "2" => {
                    let students: Vec<String> =
                        self.registry.students().iter().map(ToString::to_string).collect();
                    writeln!(self.output, "\nList of Students:")?;
                    self.print_lines(&students, "No students found.")?;
                    Some(())
                }
                "3" => self.search_students()?,
                "4" => self.update_student()?,
                "5" => self.delete_student()?,
                "0" => return Ok(true),
                _ => {
                    writeln!(self.output, "Invalid choice. Please try again.")?;
                    Some(())
                }
            };
            if done.is_none() {
                return Ok(false);
            }
        }
    }

    fn add_student(&mut self) -> io::Result<Option<()>> {
        writeln!(self.output, "\nAdding New Student")?;
        let Some(student_id) = self.prompt("Enter Student ID: ")? else {
            return Ok(None);
        };
        let Some(name) = self.prompt("Enter Name: ")? else {
            return Ok(None);
        };
        let Some(email) = self.prompt("Enter Email: ")? else {
            return Ok(None);
        };
        let Some(program) = self.prompt("Enter Program: ")? else {
            return Ok(None);
        };

        let result = self
            .registry
            .add_student(Student::new(student_id, name, email, program))
            .map(|_| "Student added successfully!".to_string());
        self.report(result)?;
        Ok(Some(()))
    }

    fn search_students(&mut self) -> io::Result<Option<()>> {
        writeln!(self.output, "\nSearch Students")?;
        let Some(name) = self.optional("Enter Name (leave empty to skip): ")? else {
            return Ok(None);
        };
        let Some(program) = self.optional("Enter Program (leave empty to skip): ")? else {
            return Ok(None);
        };

        let found: Vec<String> = self
            .registry
            .search_students(&StudentQuery { name, program })
            .iter()
            .map(ToString::to_string)
            .collect();
        self.print_lines(&found, "No matching students found.")?;
        Ok(Some(()))
    }

    fn update_student(&mut self) -> io::Result<Option<()>> {
        writeln!(self.output, "\nUpdate Student")?;
        let Some(student_id) = self.prompt("Enter Student ID: ")? else {
            return Ok(None);
        };
        let Some(name) = self.optional("New Name (leave empty to keep): ")? else {
            return Ok(None);
        };
        let Some(email) = self.optional("New Email (leave empty to keep): ")? else {
            return Ok(None);
        };
        let Some(program) = self.optional("New Program (leave empty to keep): ")? else {
            return Ok(None);
        };

        let patch = StudentPatch {
            name,
            email,
            program,
        };
        let result = self
            .registry
            .update_student(&student_id, patch)
            .map(|_| "Student updated successfully!".to_string());
        self.report(result)?;
        Ok(Some(()))
    }

    fn delete_student(&mut self) -> io::Result<Option<()>> {
        writeln!(self.output, "\nDelete Student")?;
        let Some(student_id) = self.prompt("Enter Student ID: ")? else {
            return Ok(None);
        };
        let result = self
            .registry
            .delete_student(&student_id)
            .map(|removed| format!("Student deleted ({removed} enrollment(s) removed)."));
        self.report(result)?;
        Ok(Some(()))
    }

    fn course_menu(&mut self) -> io::Result<bool> {
        loop {
            writeln!(self.output, "\n--- Course Management ---")?;
            writeln!(self.output, "1. Add Course")?;
            writeln!(self.output, "2. List Courses")?;
            writeln!(self.output, "3. Search Courses")?;
            writeln!(self.output, "4. Update Course")?;
            writeln!(self.output, "5. Delete Course")?;
            writeln!(self.output, "6. Course Average")?;
            writeln!(self.output, "0. Back to Main Menu")?;

            let Some(choice) = self.prompt("Enter your choice: ")? else {
                return Ok(false);
            };
            let done = match choice.as_str() {
                "1" => self.add_course()?,
                "2" => {
                    let courses: Vec<String> =
                        self.registry.courses().iter().map(ToString::to_string).collect();
                    writeln!(self.output, "\nList of Courses:")?;
                    self.print_lines(&courses, "No courses found.")?;
                    Some(())
                }
                "3" => self.search_courses()?,
                "4" => self.update_course()?,
                "5" => self.delete_course()?,
                "6" => self.course_average()?,
                "0" => return Ok(true),
                _ => {
                    writeln!(self.output, "Invalid choice. Please try again.")?;
                    Some(())
                }
            };
            if done.is_none() {
                return Ok(false);
            }
        }
    }

    /// Keep asking until the answer parses, as a number prompt should
    fn number<T: std::str::FromStr>(&mut self, label: &str, what: &str) -> io::Result<Option<T>> {
        loop {
            let Some(raw) = self.prompt(label)? else {
                return Ok(None);
            };
            match raw.parse::<T>() {
                Ok(value) => return Ok(Some(value)),
                Err(_) => writeln!(self.output, "Error: {what} must be a number.")?,
            }
        }
    }

    fn add_course(&mut self) -> io::Result<Option<()>> {
        writeln!(self.output, "\nAdding New Course")?;
        let Some(course_code) = self.prompt("Enter Course Code: ")? else {
            return Ok(None);
        };
        let Some(name) = self.prompt("Enter Course Name: ")? else {
            return Ok(None);
        };
        let Some(credits) = self.number::<i32>("Enter Credits: ", "Credits")? else {
            return Ok(None);
        };
        let Some(instructor) = self.prompt("Enter Instructor Name: ")? else {
            return Ok(None);
        };

        let result = self
            .registry
            .add_course(Course::new(course_code, name, credits, instructor))
            .map(|_| "Course added successfully!".to_string());
        self.report(result)?;
        Ok(Some(()))
    }

    fn search_courses(&mut self) -> io::Result<Option<()>> {
        writeln!(self.output, "\nSearch Courses")?;
        let Some(course_code) = self.optional("Enter Code (leave empty to skip): ")? else {
            return Ok(None);
        };
        let Some(name) = self.optional("Enter Name (leave empty to skip): ")? else {
            return Ok(None);
        };
        let Some(instructor) = self.optional("Enter Instructor (leave empty to skip): ")? else {
            return Ok(None);
        };

        let query = CourseQuery {
            course_code,
            name,
            instructor,
        };
        let found: Vec<String> = self
            .registry
            .search_courses(&query)
            .iter()
            .map(ToString::to_string)
            .collect();
        self.print_lines(&found, "No matching courses found.")?;
        Ok(Some(()))
    }

    fn update_course(&mut self) -> io::Result<Option<()>> {
        writeln!(self.output, "\nUpdate Course")?;
        let Some(course_code) = self.prompt("Enter Course Code: ")? else {
            return Ok(None);
        };
        let Some(name) = self.optional("New Name (leave empty to keep): ")? else {
            return Ok(None);
        };
        let Some(credits) = self.optional("New Credits (leave empty to keep): ")? else {
            return Ok(None);
        };
        let Some(instructor) = self.optional("New Instructor (leave empty to keep): ")? else {
            return Ok(None);
        };

        let credits = match credits.map(|raw| raw.parse::<i32>()).transpose() {
            Ok(credits) => credits,
            Err(_) => {
                writeln!(self.output, "Error: Credits must be a number.")?;
                return Ok(Some(()));
            }
        };
        let patch = CoursePatch {
            name,
            credits,
            instructor,
        };
        let result = self
            .registry
            .update_course(&course_code, patch)
            .map(|_| "Course updated successfully!".to_string());
        self.report(result)?;
        Ok(Some(()))
    }

    fn delete_course(&mut self) -> io::Result<Option<()>> {
        writeln!(self.output, "\nDelete Course")?;
        let Some(course_code) = self.prompt("Enter Course Code: ")? else {
            return Ok(None);
        };
        let result = self
            .registry
            .delete_course(&course_code)
            .map(|removed| format!("Course deleted ({removed} enrollment(s) removed)."));
        self.report(result)?;
        Ok(Some(()))
    }

    fn course_average(&mut self) -> io::Result<Option<()>> {
        let Some(course_code) = self.prompt("Enter Course Code: ")? else {
            return Ok(None);
        };
        let result = self
            .registry
            .course_average(&course_code)
            .map(|average| format!("Average grade for {course_code}: {average:.2}"));
        self.report(result)?;
        Ok(Some(()))
    }

    fn enrollment_menu(&mut self) -> io::Result<bool> {
        loop {
            writeln!(self.output, "\n--- Enrollment Management ---")?;
            writeln!(self.output, "1. Enroll Student")?;
            writeln!(self.output, "2. Assign Grade")?;
            writeln!(self.output, "3. View Student Enrollments")?;
            writeln!(self.output, "4. Drop Enrollment")?;
            writeln!(self.output, "5. View Transcript")?;
            writeln!(self.output, "0. Back to Main Menu")?;

            let Some(choice) = self.prompt("Enter your choice: ")? else {
                return Ok(false);
            };
            let done = match choice.as_str() {
                "1" => self.enroll()?,
                "2" => self.assign_grade()?,
                "3" => self.view_enrollments()?,
                "4" => self.drop_enrollment()?,
                "5" => self.view_transcript()?,
                "0" => return Ok(true),
                _ => {
                    writeln!(self.output, "Invalid choice. Please try again.")?;
                    Some(())
                }
            };
            if done.is_none() {
                return Ok(false);
            }
        }
    }

    fn pair(&mut self) -> io::Result<Option<(String, String)>> {
        let Some(student_id) = self.prompt("Enter Student ID: ")? else {
            return Ok(None);
        };
        let Some(course_code) = self.prompt("Enter Course Code: ")? else {
            return Ok(None);
        };
        Ok(Some((student_id, course_code)))
    }

    fn enroll(&mut self) -> io::Result<Option<()>> {
        writeln!(self.output, "\nEnroll Student")?;
        let Some((student_id, course_code)) = self.pair()? else {
            return Ok(None);
        };
        let result = self
            .registry
            .enroll(&student_id, &course_code)
            .map(|_| "Student enrolled successfully!".to_string());
        self.report(result)?;
        Ok(Some(()))
    }

    fn assign_grade(&mut self) -> io::Result<Option<()>> {
        writeln!(self.output, "\nAssign Grade")?;
        let Some((student_id, course_code)) = self.pair()? else {
            return Ok(None);
        };
        let Some(grade) = self.number::<f64>("Enter Grade (0-100): ", "Grade")? else {
            return Ok(None);
        };
        let result = self
            .registry
            .update_grade(&student_id, &course_code, grade)
            .map(|_| "Grade assigned successfully!".to_string());
        self.report(result)?;
        Ok(Some(()))
    }

    fn view_enrollments(&mut self) -> io::Result<Option<()>> {
        writeln!(self.output, "\nView Enrollments")?;
        let Some(student_id) = self.prompt("Enter Student ID: ")? else {
            return Ok(None);
        };

        let enrollments: Vec<String> = self
            .registry
            .enrollments_for_student(&student_id)
            .iter()
            .map(ToString::to_string)
            .collect();
        if enrollments.is_empty() {
            writeln!(self.output, "No enrollments found for this student.")?;
            return Ok(Some(()));
        }

        writeln!(self.output, "Enrollments for {student_id}:")?;
        self.print_lines(&enrollments, "")?;
        let result = self
            .registry
            .gpa(&student_id)
            .map(|gpa| format!("GPA: {gpa:.2}"));
        self.report(result)?;
        Ok(Some(()))
    }

    fn drop_enrollment(&mut self) -> io::Result<Option<()>> {
        writeln!(self.output, "\nDrop Enrollment")?;
        let Some((student_id, course_code)) = self.pair()? else {
            return Ok(None);
        };
        let result = self
            .registry
            .drop_enrollment(&student_id, &course_code)
            .map(|dropped| {
                if dropped {
                    "Enrollment dropped.".to_string()
                } else {
                    "No such enrollment.".to_string()
                }
            });
        self.report(result)?;
        Ok(Some(()))
    }

    fn view_transcript(&mut self) -> io::Result<Option<()>> {
        let Some(student_id) = self.prompt("Enter Student ID: ")? else {
            return Ok(None);
        };
        match self.registry.transcript(&student_id) {
            Ok(transcript) => match ReportFormat::Text.reporter().render(&transcript) {
                Ok(text) => write!(self.output, "{text}")?,
                Err(e) => writeln!(self.output, "Error: {e}")?,
            },
            Err(e) => writeln!(self.output, "Error: {}", describe(&e))?,
        }
        Ok(Some(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nu_registrar::core::clock::SystemClock;
    use nu_registrar::core::storage::MemoryStore;

    fn session(store: &MemoryStore, script: &str) -> String {
        let (mut registry, _) = Registry::open(store, SystemClock).unwrap();
        let mut output = Vec::new();
        Menu::new(&mut registry, script.as_bytes(), &mut output)
            .run()
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn exit_immediately() {
        let out = session(&MemoryStore::new(), "0\n");
        assert!(out.contains("=== Student Course Management System ==="));
        assert!(out.trim_end().ends_with("Goodbye!"));
    }

    #[test]
    fn end_of_input_exits() {
        let out = session(&MemoryStore::new(), "1\n");
        assert!(out.contains("--- Student Management ---"));
        assert!(out.trim_end().ends_with("Goodbye!"));
    }

    #[test]
    fn enroll_and_grade_flow() {
        let store = MemoryStore::new();
        let script = "\
1\n1\nS001\nJane\njane@x.com\nCS\n0\n\
2\n1\nCSC1234\nIntro\nthree\n3\nDr. Smith\n0\n\
3\n1\nS001\nCSC1234\n2\nS001\nCSC1234\n85\n3\nS001\n5\nS001\n0\n0\n";
        let out = session(&store, script);

        assert!(out.contains("Student added successfully!"));
        assert!(out.contains("Error: Credits must be a number."));
        assert!(out.contains("Course added successfully!"));
        assert!(out.contains("Student enrolled successfully!"));
        assert!(out.contains("Grade assigned successfully!"));
        assert!(out.contains("S001 in CSC1234: 85 (B)"));
        assert!(out.contains("GPA: 3.00"));
        assert!(out.contains("TRANSCRIPT: Jane (S001)"));
        assert_eq!(store.load_enrollments().unwrap().len(), 1);
    }

    #[test]
    fn errors_are_reported_not_fatal() {
        let out = session(&MemoryStore::new(), "3\n1\nS404\nCSC1234\n0\n9\n0\n");
        assert!(out.contains("Error: No student found for 'S404'"));
        assert!(out.contains("Invalid choice. Please try again."));
        assert!(out.trim_end().ends_with("Goodbye!"));
    }
}
