//! CLI argument definitions for `NuRegistrar`

use clap::{builder::BoolishValueParser, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use nu_registrar::config::ConfigOverrides;
use nu_registrar::core::report::ReportFormat;
use nu_registrar::logger::Level;

/// CLI log level argument
///
/// Represents log levels that can be passed via CLI arguments. Converts to lowercase
/// strings for config storage and to `logger::Level` for runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let as_str = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        };
        write!(f, "{as_str}")
    }
}

/// Transcript output format argument
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum FormatArg {
    /// Plain text
    Text,
    /// Markdown
    #[value(alias = "md")]
    Markdown,
    /// Self-contained HTML
    #[value(alias = "htm")]
    Html,
}

impl From<FormatArg> for ReportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => Self::Text,
            FormatArg::Markdown => Self::Markdown,
            FormatArg::Html => Self::Html,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    /// If no KEY is provided, displays all configuration values.
    Get {
        /// Optional configuration key to display (e.g., `level`, `data_dir`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum StudentCommand {
    /// Add a student.
    Add {
        /// Unique student ID (e.g., `S001`)
        #[arg(value_name = "ID")]
        student_id: String,
        /// Full name
        name: String,
        /// Email address
        email: String,
        /// Program of study
        program: String,
    },
    /// List all students.
    List,
    /// Show one student with their enrollments.
    Show {
        /// Student ID
        #[arg(value_name = "ID")]
        student_id: String,
    },
    /// Search students by name and/or program.
    Search {
        /// Case-insensitive part of the name
        #[arg(long)]
        name: Option<String>,
        /// Exact program
        #[arg(long)]
        program: Option<String>,
    },
    /// Update a student's fields.
    Update {
        /// Student ID
        #[arg(value_name = "ID")]
        student_id: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New email
        #[arg(long)]
        email: Option<String>,
        /// New program
        #[arg(long)]
        program: Option<String>,
    },
    /// Delete a student and all of their enrollments.
    Delete {
        /// Student ID
        #[arg(value_name = "ID")]
        student_id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum CourseCommand {
    /// Add a course.
    Add {
        /// Course code: three uppercase letters and four digits (e.g., `CSC1234`)
        #[arg(value_name = "CODE")]
        course_code: String,
        /// Course title
        name: String,
        /// Credit hours (1-6)
        credits: i32,
        /// Instructor name
        instructor: String,
    },
    /// List all courses.
    List,
    /// Show one course with its enrollments.
    Show {
        /// Course code
        #[arg(value_name = "CODE")]
        course_code: String,
    },
    /// Search courses by code, name and/or instructor.
    Search {
        /// Case-insensitive part of the code
        #[arg(long)]
        code: Option<String>,
        /// Case-insensitive part of the name
        #[arg(long)]
        name: Option<String>,
        /// Exact instructor
        #[arg(long)]
        instructor: Option<String>,
    },
    /// Update a course's fields.
    Update {
        /// Course code
        #[arg(value_name = "CODE")]
        course_code: String,
        /// New title
        #[arg(long)]
        name: Option<String>,
        /// New credit hours
        #[arg(long)]
        credits: Option<i32>,
        /// New instructor
        #[arg(long)]
        instructor: Option<String>,
    },
    /// Delete a course and all of its enrollments.
    Delete {
        /// Course code
        #[arg(value_name = "CODE")]
        course_code: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show the average grade of a course.
    Average {
        /// Course code
        #[arg(value_name = "CODE")]
        course_code: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Manage students.
    Student {
        #[command(subcommand)]
        action: StudentCommand,
    },
    /// Manage courses.
    Course {
        #[command(subcommand)]
        action: CourseCommand,
    },
    /// Enroll a student in a course.
    Enroll {
        /// Student ID
        #[arg(value_name = "STUDENT")]
        student_id: String,
        /// Course code
        #[arg(value_name = "COURSE")]
        course_code: String,
    },
    /// Drop a student from a course.
    Drop {
        /// Student ID
        #[arg(value_name = "STUDENT")]
        student_id: String,
        /// Course code
        #[arg(value_name = "COURSE")]
        course_code: String,
    },
    /// Record a grade (0-100) for an enrollment.
    Grade {
        /// Student ID
        #[arg(value_name = "STUDENT")]
        student_id: String,
        /// Course code
        #[arg(value_name = "COURSE")]
        course_code: String,
        /// Numeric grade
        #[arg(value_name = "GRADE", allow_negative_numbers = true)]
        grade: f64,
    },
    /// List enrollments, optionally filtered by student or course.
    Enrollments {
        /// Only this student's enrollments
        #[arg(long, value_name = "ID", conflicts_with = "course")]
        student: Option<String>,
        /// Only this course's enrollments
        #[arg(long, value_name = "CODE")]
        course: Option<String>,
    },
    /// Show a student's GPA.
    Gpa {
        /// Student ID
        #[arg(value_name = "STUDENT")]
        student_id: String,
    },
    /// Print or write a student's transcript.
    Transcript {
        /// Student ID
        #[arg(value_name = "STUDENT")]
        student_id: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = FormatArg::Text)]
        format: FormatArg,

        /// Output file. Markdown and HTML default to the configured `reports_dir`;
        /// text is printed when omitted.
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Back up data files (students, courses, enrollments, or all).
    Backup {
        /// Which file to back up
        #[arg(value_name = "TARGET", default_value = "all")]
        target: String,
    },
    /// Run the interactive menu.
    Menu,
}

#[derive(Parser, Debug)]
#[command(
    name = "nuregistrar",
    about = "NuRegistrar student and course records",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug")]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    // --- Config overrides ---
    /// Override config logging level (stored in config file)
    #[arg(long = "config-level", value_enum)]
    pub config_level: Option<LogLevelArg>,

    /// Override config log file path
    #[arg(long = "config-log-file", value_name = "PATH")]
    pub config_log_file: Option<PathBuf>,

    /// Override config verbose flag (true/false)
    #[arg(long = "config-verbose", value_parser = BoolishValueParser::new())]
    pub config_verbose: Option<bool>,

    /// Override config data directory
    #[arg(long = "config-data-dir", value_name = "DIR")]
    pub config_data_dir: Option<PathBuf>,

    /// Override config data directory (short form)
    #[arg(long = "data-dir", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Override config reports directory
    #[arg(long = "config-reports-dir", value_name = "DIR")]
    pub config_reports_dir: Option<PathBuf>,

    /// Override config reports directory (short form)
    #[arg(long = "reports-dir", value_name = "DIR")]
    pub reports_dir: Option<PathBuf>,

    /// Override config backup-on-write flag (true/false)
    #[arg(long = "config-backup-on-write", value_parser = BoolishValueParser::new())]
    pub config_backup_on_write: Option<bool>,

    /// Subcommand to execute.
    /// A subcommand is required to run the CLI.
    #[command(subcommand)]
    pub command: Command,
}

fn path_string(path: Option<&PathBuf>) -> Option<String> {
    path.map(|p| p.to_string_lossy().to_string())
}

impl Cli {
    /// Convert CLI flags into config overrides
    ///
    /// Short-form flags (e.g., `--data-dir`) take precedence over long-form
    /// flags (e.g., `--config-data-dir`) when both are provided.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string()),
            file: path_string(self.config_log_file.as_ref()),
            verbose: self.config_verbose,
            data_dir: path_string(self.data_dir.as_ref().or(self.config_data_dir.as_ref())),
            reports_dir: path_string(
                self.reports_dir
                    .as_ref()
                    .or(self.config_reports_dir.as_ref()),
            ),
            backup_on_write: self.config_backup_on_write,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("nuregistrar").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_log_level_display() {
        assert_eq!(LogLevelArg::Error.to_string(), "error");
        assert_eq!(LogLevelArg::Warn.to_string(), "warn");
        assert_eq!(LogLevelArg::Info.to_string(), "info");
        assert_eq!(LogLevelArg::Debug.to_string(), "debug");
    }

    #[test]
    fn test_log_level_to_logger_level() {
        assert_eq!(Level::from(LogLevelArg::Error), Level::Error);
        assert_eq!(Level::from(LogLevelArg::Warn), Level::Warn);
        assert_eq!(Level::from(LogLevelArg::Info), Level::Info);
        assert_eq!(Level::from(LogLevelArg::Debug), Level::Debug);
    }

    #[test]
    fn test_to_config_overrides_empty() {
        let overrides = parse(&["config"]).to_config_overrides();
        assert!(overrides.level.is_none());
        assert!(overrides.file.is_none());
        assert!(overrides.verbose.is_none());
        assert!(overrides.data_dir.is_none());
        assert!(overrides.reports_dir.is_none());
        assert!(overrides.backup_on_write.is_none());
    }

    #[test]
    fn test_to_config_overrides_with_values() {
        let cli = parse(&[
            "--config-level",
            "debug",
            "--config-log-file",
            "/tmp/test.log",
            "--config-verbose",
            "true",
            "--data-dir",
            "/data",
            "--config-reports-dir",
            "/reports",
            "--config-backup-on-write",
            "yes",
            "student",
            "list",
        ]);

        let overrides = cli.to_config_overrides();
        assert_eq!(overrides.level, Some("debug".to_string()));
        assert_eq!(overrides.file, Some("/tmp/test.log".to_string()));
        assert_eq!(overrides.verbose, Some(true));
        assert_eq!(overrides.data_dir, Some("/data".to_string()));
        assert_eq!(overrides.reports_dir, Some("/reports".to_string()));
        assert_eq!(overrides.backup_on_write, Some(true));
    }

    #[test]
    fn test_short_form_precedence_over_long_form() {
        let cli = parse(&[
            "--config-data-dir",
            "/long/data",
            "--data-dir",
            "/short/data",
            "--config-reports-dir",
            "/long/reports",
            "--reports-dir",
            "/short/reports",
            "menu",
        ]);

        let overrides = cli.to_config_overrides();
        assert_eq!(overrides.data_dir, Some("/short/data".to_string()));
        assert_eq!(overrides.reports_dir, Some("/short/reports".to_string()));
    }

    #[test]
    fn test_grade_accepts_decimal() {
        let cli = parse(&["grade", "S001", "CSC1234", "85.5"]);
        match cli.command {
            Command::Grade { grade, .. } => assert!((grade - 85.5).abs() < f64::EPSILON),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_transcript_format_default_and_alias() {
        match parse(&["transcript", "S001"]).command {
            Command::Transcript { format, output, .. } => {
                assert_eq!(format, FormatArg::Text);
                assert!(output.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
        match parse(&["transcript", "S001", "--format", "md"]).command {
            Command::Transcript { format, .. } => {
                assert_eq!(ReportFormat::from(format), ReportFormat::Markdown);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_enrollments_filters_conflict() {
        let result = Cli::try_parse_from([
            "nuregistrar",
            "enrollments",
            "--student",
            "S001",
            "--course",
            "CSC1234",
        ]);
        assert!(result.is_err());
    }
}
