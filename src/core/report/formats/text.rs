//! Plain-text transcript, laid out for an 80-column terminal

use crate::core::report::ReportGenerator;
use crate::core::transcript::Transcript;
use std::error::Error;
use std::fmt::Write;

const RULE_WIDTH: usize = 60;

/// Plain-text transcript generator
pub struct TextReporter;

impl TextReporter {
    /// Create a new text reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for TextReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for TextReporter {
    fn render(&self, transcript: &Transcript) -> Result<String, Box<dyn Error>> {
        let student = &transcript.student;
        let rule = "=".repeat(RULE_WIDTH);
        let mut out = String::new();

        writeln!(out, "{rule}")?;
        writeln!(out, "TRANSCRIPT: {} ({})", student.name, student.student_id)?;
        writeln!(out, "Program: {}", student.program)?;
        writeln!(out, "{rule}")?;

        if transcript.entries.is_empty() {
            writeln!(out, "No enrollments")?;
        } else {
            writeln!(
                out,
                "{:<8} {:<28} {:>3} {:>6} {:>4}",
                "Code", "Course", "Cr", "Grade", "Ltr"
            )?;
            writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
            for entry in &transcript.entries {
                writeln!(
                    out,
                    "{:<8} {:<28.28} {:>3} {:>6} {:>4}",
                    entry.course_code,
                    entry.course_name,
                    entry.credits,
                    entry.grade_label(),
                    entry.letter_label()
                )?;
            }
        }

        writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
        writeln!(out, "GPA: {:.2}", transcript.gpa)?;
        writeln!(
            out,
            "Credits: {} earned / {} attempted",
            transcript.credits_earned, transcript.credits_attempted
        )?;
        Ok(out)
    }
}
