//! Command-line interface entry point for `NuRegistrar`

mod args;
mod commands;

use args::{Cli, Command};
use clap::Parser;
use commands::menu::Menu;
use nu_registrar::config::Config;
use nu_registrar::logger::{enable_debug, enable_verbose, init_file_logging, set_level, Level};
use nu_registrar::{debug, info};
use std::io;
use std::path::PathBuf;

fn main() {
    let args = Cli::parse();

    // Load configuration once at startup and apply CLI overrides to it
    let mut config = Config::load();
    let defaults = Config::from_defaults();
    config.apply_overrides(&args.to_config_overrides());

    // CLI flag wins over config logging.level; fall back to warn
    let mut level = args
        .log_level
        .map(Level::from)
        .or_else(|| Level::parse(&config.logging.level))
        .unwrap_or(Level::Warn);

    if args.debug_flag || level == Level::Debug {
        level = Level::Debug;
        enable_debug();
    }

    let verbose = args.verbose || config.logging.verbose;
    if verbose {
        enable_verbose();
    }
    set_level(level);

    let config_log_path =
        (!config.logging.file.is_empty()).then(|| PathBuf::from(&config.logging.file));
    if let Some(log_path) = args.log_file.as_ref().or(config_log_path.as_ref()) {
        let display_path = log_path.to_string_lossy();
        if init_file_logging(log_path) {
            if verbose {
                eprintln!("✓ File logging initialized at: {display_path}");
            } else {
                info!("File logging initialized at: {display_path}");
            }
        } else {
            eprintln!("✗ Failed to initialize file logging at: {display_path}");
        }
    }

    debug!("Data directory: {}", config.paths.data_dir);

    if let Err(message) = dispatch(args.command, &mut config, &defaults) {
        eprintln!("{message}");
        std::process::exit(1);
    }
}

/// Run one subcommand
fn dispatch(command: Command, config: &mut Config, defaults: &Config) -> Result<(), String> {
    match command {
        Command::Config { subcommand } => commands::config::run(subcommand, config, defaults),
        Command::Backup { target } => {
            commands::backup::run(&commands::store_from_config(config), &target)
        }
        other => {
            let mut registry = commands::open_registry(config)?;
            run_records(other, &mut registry, config)
        }
    }
}

/// Run a subcommand that works on the loaded records
fn run_records(
    command: Command,
    registry: &mut commands::CliRegistry,
    config: &Config,
) -> Result<(), String> {
    match command {
        Command::Config { .. } | Command::Backup { .. } => Ok(()),
        Command::Student { action } => commands::student::run(action, registry),
        Command::Course { action } => commands::course::run(action, registry),
        Command::Enroll {
            student_id,
            course_code,
        } => commands::enrollment::enroll(registry, &student_id, &course_code),
        Command::Drop {
            student_id,
            course_code,
        } => commands::enrollment::drop(registry, &student_id, &course_code),
        Command::Grade {
            student_id,
            course_code,
            grade,
        } => commands::enrollment::grade(registry, &student_id, &course_code, grade),
        Command::Enrollments { student, course } => {
            commands::enrollment::list(registry, student.as_deref(), course.as_deref());
            Ok(())
        }
        Command::Gpa { student_id } => commands::enrollment::gpa(registry, &student_id),
        Command::Transcript {
            student_id,
            format,
            output,
        } => commands::transcript::run(
            registry,
            &student_id,
            format.into(),
            output.as_deref(),
            config,
        ),
        Command::Menu => {
            let stdin = io::stdin();
            Menu::new(registry, stdin.lock(), io::stdout())
                .run()
                .map_err(|e| format!("✗ Menu I/O error: {e}"))
        }
    }
}
