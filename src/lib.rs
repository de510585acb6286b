//! Shared library for `NuRegistrar`
//! Contains the record-keeping core used by the `nuregistrar` CLI

pub mod core;
pub mod logger;

pub use crate::core::{config, get_version};
