//! Validated configuration structures

use crate::schema::{RawConfig, RawSchool, RawStorage};
use crate::validation::parse_backend;
use fieldlog_api::{School, Scope, Trainer};
use fieldlog_util::default_data_dir;
use std::path::PathBuf;

/// Validated configuration ready for use by the CLI
#[derive(Debug, Clone)]
pub struct Config {
    pub trainer: Trainer,
    pub storage: StorageConfig,
    pub export: ExportConfig,
    /// In configuration order; the first is the default
    pub schools: Vec<SchoolProfile>,
}

impl Config {
    /// Convert from raw config (after validation)
    pub fn from_raw(raw: RawConfig) -> Self {
        Self {
            trainer: Trainer {
                name: raw.trainer.name.trim().to_string(),
                identity: raw.trainer.identity.trim().to_string(),
            },
            storage: StorageConfig::from_raw(raw.storage),
            export: ExportConfig {
                output_dir: raw.export.output_dir.unwrap_or_else(|| PathBuf::from(".")),
            },
            schools: raw.schools.into_iter().map(SchoolProfile::from_raw).collect(),
        }
    }

    /// Get school by identity
    pub fn get_school(&self, identity: &str) -> Option<&SchoolProfile> {
        self.schools.iter().find(|s| s.school.identity == identity)
    }

    /// Scope for the named school, or for the first configured school
    pub fn scope_for(&self, school_identity: Option<&str>) -> Option<Scope> {
        let profile = match school_identity {
            Some(identity) => self.get_school(identity)?,
            None => self.schools.first()?,
        };
        Some(Scope::new(self.trainer.clone(), profile.school.clone()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Sqlite,
    Memory,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub data_dir: PathBuf,
}

impl StorageConfig {
    fn from_raw(raw: RawStorage) -> Self {
        Self {
            backend: raw
                .backend
                .as_deref()
                .and_then(|b| parse_backend(b).ok())
                .unwrap_or(StorageBackend::Sqlite),
            data_dir: raw.data_dir.unwrap_or_else(default_data_dir),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub output_dir: PathBuf,
}

/// A configured school with the details shown when choosing one
#[derive(Debug, Clone)]
pub struct SchoolProfile {
    pub school: School,
    pub location: Option<String>,
    pub total_students: Option<u32>,
    pub grades: Option<String>,
}

impl SchoolProfile {
    fn from_raw(raw: RawSchool) -> Self {
        Self {
            school: School {
                identity: raw.identity.trim().to_string(),
                name: raw.name.trim().to_string(),
            },
            location: raw.location,
            total_students: raw.total_students,
            grades: raw.grades,
        }
    }
}
