//! Registrar core: records, catalogs, the enrollment ledger and grading

pub mod catalog;
pub mod clock;
pub mod config;
pub mod error;
pub mod grading;
pub mod ledger;
pub mod models;
pub mod registry;
pub mod report;
pub mod storage;
pub mod transcript;

pub use error::{RecordKind, RegistryError, RegistryResult, StorageError};
pub use registry::{LoadReport, Registry};

/// Returns the current version of the `NuRegistrar` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
