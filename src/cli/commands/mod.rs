//! CLI command handlers for `NuRegistrar`.
//!
//! Each command is implemented in its own submodule. Handlers return
//! `Err(message)` with a ready-to-print `✗ ...` line; `main` prints it and
//! exits non-zero.

pub mod backup;
pub mod config;
pub mod course;
pub mod enrollment;
pub mod menu;
pub mod student;
pub mod transcript;

use nu_registrar::config::Config;
use nu_registrar::core::clock::SystemClock;
use nu_registrar::core::models::course::{MAX_CREDITS, MIN_CREDITS};
use nu_registrar::core::storage::JsonFileStore;
use nu_registrar::core::{Registry, RegistryError};
use nu_registrar::{error, verbose};
use std::io::{self, BufRead, Write};

/// Registry as used by the CLI: JSON files in the configured data directory
pub type CliRegistry = Registry<JsonFileStore>;

/// JSON store for the configured data directory
pub fn store_from_config(config: &Config) -> JsonFileStore {
    JsonFileStore::new(&config.paths.data_dir).with_backup_on_write(config.storage.backup_on_write)
}

/// Load the registry from the configured data directory
///
/// Records dropped during load are reported as warnings; they do not stop
/// the command.
pub fn open_registry(config: &Config) -> Result<CliRegistry, String> {
    let store = store_from_config(config);
    verbose!("Loading records from {}", store.data_dir().display());

    let (registry, report) = Registry::open(store, SystemClock).map_err(|e| {
        error!("Failed to load records: {e}");
        format!("✗ Failed to load records: {e}")
    })?;

    if !report.is_clean() {
        eprintln!(
            "⚠ Skipped {} invalid stored record(s):",
            report.rejected().len()
        );
        for err in report.rejected() {
            eprintln!("  - {}", describe(err));
        }
    }

    Ok(registry)
}

/// User-facing wording for a registry error
pub fn describe(err: &RegistryError) -> String {
    match err {
        RegistryError::ValidationFailed(messages) => {
            let mut text = "Invalid input:".to_string();
            for message in messages {
                text.push_str("\n    ");
                text.push_str(message);
            }
            text
        }
        RegistryError::DuplicateKey { kind, key } => {
            format!("A {kind} with ID '{key}' already exists")
        }
        RegistryError::NotFound { kind, key } => format!("No {kind} found for '{key}'"),
        RegistryError::AlreadyEnrolled {
            student_id,
            course_code,
        } => format!("Student {student_id} is already enrolled in {course_code}"),
        RegistryError::OutOfRange { field, value } => {
            let (low, high) = if *field == "credits" {
                (MIN_CREDITS, MAX_CREDITS)
            } else {
                (0, 100)
            };
            format!("{value} is not a valid {field}; expected a number between {low} and {high}")
        }
        RegistryError::ReferentialIntegrityViolation {
            student_id,
            course_code,
            missing,
        } => format!(
            "Enrollment {student_id}/{course_code} refers to a {missing} that does not exist"
        ),
        RegistryError::Storage(e) => format!("Changes were applied but could not be saved: {e}"),
    }
}

/// Format a registry error as a failure line
pub fn failure(err: &RegistryError) -> String {
    format!("✗ {}", describe(err))
}

/// Ask a yes/no question on stdin
pub fn confirm(prompt: &str) -> bool {
    print!("{prompt} (y/n): ");
    io::stdout().flush().ok();

    let mut response = String::new();
    io::stdin().lock().read_line(&mut response).ok();
    let response = response.trim();
    response.eq_ignore_ascii_case("y") || response.eq_ignore_ascii_case("yes")
}
