//! HTML transcript generator
//!
//! The generated page is self-contained with embedded CSS.

use crate::core::report::{fill_template, ReportGenerator, REPORT_DATE_FORMAT};
use crate::core::transcript::Transcript;
use std::error::Error;
use std::fmt::Write;

/// Embedded HTML transcript template
const HTML_TEMPLATE: &str = include_str!("../templates/transcript.html");

/// HTML transcript generator
pub struct HtmlReporter;

impl HtmlReporter {
    /// Create a new HTML reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    #[allow(clippy::unused_self)]
    fn render_template(&self, transcript: &Transcript) -> String {
        let student = &transcript.student;
        fill_template(
            HTML_TEMPLATE,
            &[
                ("student_name", escape_html(&student.name)),
                ("student_id", escape_html(&student.student_id)),
                ("email", escape_html(&student.email)),
                ("program", escape_html(&student.program)),
                (
                    "generated_at",
                    transcript.generated_at.format(REPORT_DATE_FORMAT).to_string(),
                ),
                ("course_rows", Self::generate_course_rows(transcript)),
                ("gpa", format!("{:.2}", transcript.gpa)),
                ("graded_count", transcript.graded_count().to_string()),
                ("course_count", transcript.entries.len().to_string()),
                ("credits_attempted", transcript.credits_attempted.to_string()),
                ("credits_earned", transcript.credits_earned.to_string()),
            ],
        )
    }

    /// One table row per entry; ungraded and failed rows get a class for styling
    fn generate_course_rows(transcript: &Transcript) -> String {
        let mut html = String::new();

        if transcript.entries.is_empty() {
            html.push_str("      <tr class=\"ungraded\"><td colspan=\"6\">No enrollments</td></tr>\n");
            return html;
        }

        for entry in &transcript.entries {
            let row_class = match entry.letter {
                None => " class=\"ungraded\"",
                Some(letter) if !letter.is_passing() => " class=\"failed\"",
                Some(_) => "",
            };
            let _ = writeln!(html, "      <tr{row_class}>");
            let _ = writeln!(html, "        <td>{}</td>", escape_html(&entry.course_code));
            let _ = writeln!(html, "        <td>{}</td>", escape_html(&entry.course_name));
            let _ = writeln!(html, "        <td class=\"num\">{}</td>", entry.credits);
            let _ = writeln!(html, "        <td class=\"num\">{}</td>", entry.grade_label());
            let _ = writeln!(html, "        <td>{}</td>", entry.letter_label());
            let _ = writeln!(html, "        <td>{}</td>", entry.enrolled_at.format("%Y-%m-%d"));
            let _ = writeln!(html, "      </tr>");
        }

        html
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

impl Default for HtmlReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for HtmlReporter {
    fn render(&self, transcript: &Transcript) -> Result<String, Box<dyn Error>> {
        Ok(self.render_template(transcript))
    }
}
