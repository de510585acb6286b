//! Transcript command handler
//!
//! Text transcripts print to stdout unless an output file is given. Markdown
//! and HTML are always written to a file, by default in the configured
//! reports directory.

use super::{failure, CliRegistry};
use nu_registrar::config::Config;
use nu_registrar::core::report::{default_output_path, ReportFormat};
use nu_registrar::{error, info};
use std::path::{Path, PathBuf};

/// Run the transcript command
pub fn run(
    registry: &CliRegistry,
    student_id: &str,
    format: ReportFormat,
    output: Option<&Path>,
    config: &Config,
) -> Result<(), String> {
    let transcript = registry.transcript(student_id).map_err(|e| failure(&e))?;
    let reporter = format.reporter();

    let target: Option<PathBuf> = match (output, format) {
        (Some(path), _) => Some(path.to_path_buf()),
        (None, ReportFormat::Text) => None,
        (None, _) => Some(default_output_path(
            Path::new(&config.paths.reports_dir),
            student_id,
            format,
        )),
    };

    let Some(path) = target else {
        let content = reporter
            .render(&transcript)
            .map_err(|e| format!("✗ Failed to render transcript: {e}"))?;
        print!("{content}");
        return Ok(());
    };

    reporter.generate(&transcript, &path).map_err(|e| {
        error!("Transcript generation failed for {student_id}: {e}");
        format!("✗ Failed to write {}: {e}", path.display())
    })?;
    info!("Transcript for {student_id} written to {}", path.display());
    println!("✓ Transcript generated: {}", path.display());
    Ok(())
}
