//! Raw configuration schema (as parsed from TOML)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as parsed from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawConfig {
    /// Config schema version
    pub config_version: u32,

    /// The trainer filing reports on this machine
    pub trainer: RawTrainer,

    /// Where session lists are kept
    #[serde(default)]
    pub storage: RawStorage,

    /// Export settings
    #[serde(default)]
    pub export: RawExport,

    /// Schools the trainer visits
    #[serde(default)]
    pub schools: Vec<RawSchool>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawTrainer {
    pub name: String,

    /// Stable identity, usually an email address
    pub identity: String,
}

/// Storage settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawStorage {
    /// "sqlite" (default) or "memory"
    pub backend: Option<String>,

    /// Data directory for the database
    pub data_dir: Option<PathBuf>,
}

/// Export settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawExport {
    /// Directory CSV exports are written to (default: current directory)
    pub output_dir: Option<PathBuf>,
}

/// Raw school definition
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawSchool {
    /// Unique stable ID
    pub identity: String,

    /// Display name, also used in export file names
    pub name: String,

    pub location: Option<String>,

    pub total_students: Option<u32>,

    /// Grade range served, free text (e.g. "K-5")
    pub grades: Option<String>,
}
