//! Markdown transcript generator
//!
//! Produces GitHub-flavored tables that render in GitHub, GitLab and VS Code.

use crate::core::report::{fill_template, ReportGenerator, REPORT_DATE_FORMAT};
use crate::core::transcript::Transcript;
use std::error::Error;
use std::fmt::Write;

/// Embedded Markdown transcript template
const MARKDOWN_TEMPLATE: &str = include_str!("../templates/transcript.md");

/// Markdown transcript generator
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// Create a new Markdown reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Render the transcript using template substitution
    #[allow(clippy::unused_self)]
    fn render_template(&self, transcript: &Transcript) -> String {
        let student = &transcript.student;
        fill_template(
            MARKDOWN_TEMPLATE,
            &[
                ("student_name", escape_cell(&student.name)),
                ("student_id", escape_cell(&student.student_id)),
                ("email", escape_cell(&student.email)),
                ("program", escape_cell(&student.program)),
                (
                    "generated_at",
                    transcript.generated_at.format(REPORT_DATE_FORMAT).to_string(),
                ),
                ("course_table", Self::generate_course_table(transcript)),
                ("gpa", format!("{:.2}", transcript.gpa)),
                ("graded_count", transcript.graded_count().to_string()),
                ("course_count", transcript.entries.len().to_string()),
                ("credits_attempted", transcript.credits_attempted.to_string()),
                ("credits_earned", transcript.credits_earned.to_string()),
            ],
        )
    }

    /// Generate the course table, or a note when there are no enrollments
    fn generate_course_table(transcript: &Transcript) -> String {
        if transcript.entries.is_empty() {
            return "_No enrollments._".to_string();
        }

        let mut table = String::new();
        table.push_str("| Code | Course | Credits | Grade | Letter | Enrolled |\n");
        table.push_str("|---|---|---|---|---|---|\n");
        for entry in &transcript.entries {
            let _ = writeln!(
                table,
                "| {} | {} | {} | {} | {} | {} |",
                entry.course_code,
                escape_cell(&entry.course_name),
                entry.credits,
                entry.grade_label(),
                entry.letter_label(),
                entry.enrolled_at.format("%Y-%m-%d")
            );
        }
        table
    }
}

/// Keep user text from breaking table cells
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

impl Default for MarkdownReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for MarkdownReporter {
    fn render(&self, transcript: &Transcript) -> Result<String, Box<dyn Error>> {
        Ok(self.render_template(transcript))
    }
}
