//! Transcript reports
//!
//! Renders a [`Transcript`] as plain text, Markdown or HTML. Markdown and HTML
//! come from embedded templates with `{{placeholder}}` substitution.

pub mod formats;

use crate::core::transcript::Transcript;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

pub use formats::{HtmlReporter, MarkdownReporter, ReportFormat, TextReporter};

/// Date format used in report headers
pub const REPORT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

/// Trait for report generators
pub trait ReportGenerator {
    /// Render the report as a string
    ///
    /// # Errors
    /// Returns an error if rendering fails
    fn render(&self, transcript: &Transcript) -> Result<String, Box<dyn Error>>;

    /// Render the report and write it to `output_path`, creating parent directories
    ///
    /// # Errors
    /// Returns an error if rendering or writing fails
    fn generate(&self, transcript: &Transcript, output_path: &Path) -> Result<(), Box<dyn Error>> {
        let content = self.render(transcript)?;
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(output_path, content)?;
        Ok(())
    }
}

/// Default file path for a student's transcript in `reports_dir`
#[must_use]
pub fn default_output_path(reports_dir: &Path, student_id: &str, format: ReportFormat) -> PathBuf {
    reports_dir.join(format!("transcript_{student_id}.{}", format.extension()))
}

/// Substitute `{{name}}` placeholders in a single pass
///
/// Values are copied in verbatim and never rescanned, so a value that itself
/// contains `{{...}}` is left alone. Unknown placeholders stay as written.
#[must_use]
pub fn fill_template(template: &str, values: &[(&str, String)]) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        output.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let found = after.find("}}").and_then(|end| {
            let name = &after[..end];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (value, end))
        });
        match found {
            Some((value, end)) => {
                output.push_str(value);
                rest = &after[end + 2..];
            }
            None => {
                output.push_str("{{");
                rest = after;
            }
        }
    }
    output.push_str(rest);
    output
}

#[cfg(test)]
pub(crate) fn sample_transcript() -> Transcript {
    use crate::core::grading::LetterGrade;
    use crate::core::models::Student;
    use crate::core::transcript::TranscriptEntry;
    use chrono::{TimeZone, Utc};

    let day = |d| Utc.with_ymd_and_hms(2024, 1, d, 9, 0, 0).unwrap();
    Transcript {
        student: Student::new(
            "S001".to_string(),
            "Jane Doe".to_string(),
            "jane@x.com".to_string(),
            "CS".to_string(),
        ),
        entries: vec![
            TranscriptEntry {
                course_code: "CSC1234".to_string(),
                course_name: "Intro to Programming".to_string(),
                credits: 3,
                grade: Some(85.0),
                letter: Some(LetterGrade::B),
                enrolled_at: day(10),
            },
            TranscriptEntry {
                course_code: "MAT5678".to_string(),
                course_name: "Calculus | Honors".to_string(),
                credits: 4,
                grade: None,
                letter: None,
                enrolled_at: day(11),
            },
        ],
        gpa: 3.0,
        credits_attempted: 7,
        credits_earned: 3,
        generated_at: day(20),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_template_does_not_rescan_values() {
        let output = fill_template(
            "{{name}} has {{gpa}} ({{missing}})",
            &[
                ("name", "{{gpa}}".to_string()),
                ("gpa", "3.00".to_string()),
            ],
        );
        assert_eq!(output, "{{gpa}} has 3.00 ({{missing}})");
    }

    #[test]
    fn default_path_uses_extension() {
        let path = default_output_path(Path::new("/tmp/reports"), "S001", ReportFormat::Html);
        assert_eq!(path, PathBuf::from("/tmp/reports/transcript_S001.html"));
    }
}
