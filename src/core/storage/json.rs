//! JSON file store
//!
//! One file per list in the data directory:
//!
//! ```json
//! {
//!   "students": [ { "student_id": "S001", ... } ],
//!   "metadata": { "version": "1.0", "last_updated": "2024-01-15T10:30:00Z", "count": 1 }
//! }
//! ```

use super::{DataFile, RecordStore};
use crate::core::error::StorageError;
use crate::core::models::{Course, Enrollment, Student};
use crate::{debug, info};
use chrono::{DateTime, Local, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Format version written into every file
pub const FORMAT_VERSION: &str = "1.0";

/// Bookkeeping written next to each list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileMetadata {
    /// File format version
    pub version: String,
    /// When the file was last written
    pub last_updated: DateTime<Utc>,
    /// Number of records in the list
    pub count: usize,
}

/// [`RecordStore`] backed by JSON files in a directory
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    data_dir: PathBuf,
    backup_on_write: bool,
}

impl JsonFileStore {
    /// Store rooted at `data_dir`. The directory is created on first write.
    #[must_use]
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            backup_on_write: false,
        }
    }

    /// Back up each file before it is overwritten
    #[must_use]
    pub const fn with_backup_on_write(mut self, enabled: bool) -> Self {
        self.backup_on_write = enabled;
        self
    }

    /// Directory holding the data files
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Full path of a data file
    #[must_use]
    pub fn path_of(&self, file: DataFile) -> PathBuf {
        self.data_dir.join(file.file_name())
    }

    /// Copy a data file to `<name>_<YYYYmmdd_HHMMSS>.bak` in the data directory
    ///
    /// A second backup within the same second gets a `_1`, `_2`, ... suffix
    /// instead of replacing the first.
    ///
    /// # Returns
    /// The backup path, or `None` when the data file does not exist yet
    ///
    /// # Errors
    /// Returns an error if the copy fails
    pub fn create_backup(&self, file: DataFile) -> Result<Option<PathBuf>, StorageError> {
        let source = self.path_of(file);
        if !source.exists() {
            return Ok(None);
        }

        let stamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        let mut backup = self.data_dir.join(format!("{}_{stamp}.bak", file.name()));
        let mut counter = 1;
        while backup.exists() {
            backup = self.data_dir.join(format!("{}_{stamp}_{counter}.bak", file.name()));
            counter += 1;
        }
        fs::copy(&source, &backup).map_err(|e| StorageError::io(&backup, e))?;
        info!("Backed up {} to {}", source.display(), backup.display());
        Ok(Some(backup))
    }

    fn read_list<T: DeserializeOwned>(&self, file: DataFile) -> Result<Vec<T>, StorageError> {
        let path = self.path_of(file);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("{} not found, starting empty", path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(StorageError::io(path, e)),
        };

        let mut document: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(&content).map_err(|source| StorageError::Malformed {
                path: path.clone(),
                source,
            })?;

        let Some(list) = document.remove(file.name()) else {
            return Ok(Vec::new());
        };
        serde_json::from_value(list).map_err(|source| StorageError::Malformed { path, source })
    }

    fn write_list<T: Serialize>(&self, file: DataFile, records: &[T]) -> Result<(), StorageError> {
        fs::create_dir_all(&self.data_dir).map_err(|e| StorageError::io(&self.data_dir, e))?;
        if self.backup_on_write {
            self.create_backup(file)?;
        }

        let metadata = FileMetadata {
            version: FORMAT_VERSION.to_string(),
            last_updated: Utc::now(),
            count: records.len(),
        };
        let mut document = serde_json::Map::new();
        document.insert(file.name().to_string(), serde_json::to_value(records)?);
        document.insert("metadata".to_string(), serde_json::to_value(metadata)?);
        let body = serde_json::to_string_pretty(&document)?;

        let path = self.path_of(file);
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, body).map_err(|e| StorageError::io(&staging, e))?;
        fs::rename(&staging, &path).map_err(|e| StorageError::io(&path, e))?;
        debug!("Wrote {} {} to {}", records.len(), file, path.display());
        Ok(())
    }
}

impl RecordStore for JsonFileStore {
    fn load_students(&self) -> Result<Vec<Student>, StorageError> {
        self.read_list(DataFile::Students)
    }

    fn save_students(&self, students: &[Student]) -> Result<(), StorageError> {
        self.write_list(DataFile::Students, students)
    }

    fn load_courses(&self) -> Result<Vec<Course>, StorageError> {
        self.read_list(DataFile::Courses)
    }

    fn save_courses(&self, courses: &[Course]) -> Result<(), StorageError> {
        self.write_list(DataFile::Courses, courses)
    }

    fn load_enrollments(&self) -> Result<Vec<Enrollment>, StorageError> {
        self.read_list(DataFile::Enrollments)
    }

    fn save_enrollments(&self, enrollments: &[Enrollment]) -> Result<(), StorageError> {
        self.write_list(DataFile::Enrollments, enrollments)
    }
}
