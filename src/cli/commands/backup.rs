//! Backup command handler

use nu_registrar::core::storage::{DataFile, JsonFileStore};

/// Back up one data file, or all of them for `all`
pub fn run(store: &JsonFileStore, target: &str) -> Result<(), String> {
    let files: Vec<DataFile> = if target.eq_ignore_ascii_case("all") {
        DataFile::ALL.to_vec()
    } else {
        vec![target.parse::<DataFile>().map_err(|e| format!("✗ {e}"))?]
    };

    for file in files {
        match store.create_backup(file) {
            Ok(Some(path)) => println!("✓ Backed up {file} to {}", path.display()),
            Ok(None) => println!("- No {file} file yet; nothing to back up"),
            Err(e) => return Err(format!("✗ Failed to back up {file}: {e}")),
        }
    }
    Ok(())
}
