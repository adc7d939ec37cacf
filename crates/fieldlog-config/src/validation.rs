//! Configuration validation

use crate::schema::{RawConfig, RawSchool};
use crate::settings::StorageBackend;
use std::collections::HashSet;
use thiserror::Error;

/// Validation error
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("Trainer: {0}")]
    TrainerError(String),

    #[error("School '{school_id}': {message}")]
    SchoolError { school_id: String, message: String },

    #[error("Duplicate school identity: {0}")]
    DuplicateSchoolId(String),

    #[error("No schools configured")]
    NoSchools,

    #[error("Storage: {0}")]
    StorageError(String),
}

/// Validate a raw configuration
pub fn validate_config(config: &RawConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if config.trainer.name.trim().is_empty() {
        errors.push(ValidationError::TrainerError("name cannot be empty".into()));
    }
    if config.trainer.identity.trim().is_empty() {
        errors.push(ValidationError::TrainerError(
            "identity cannot be empty".into(),
        ));
    }

    if let Some(backend) = &config.storage.backend
        && let Err(e) = parse_backend(backend)
    {
        errors.push(ValidationError::StorageError(e));
    }

    if config.schools.is_empty() {
        errors.push(ValidationError::NoSchools);
    }

    let mut seen_ids = HashSet::new();
    for school in &config.schools {
        let identity = school.identity.trim();
        if !seen_ids.insert(identity) {
            errors.push(ValidationError::DuplicateSchoolId(identity.to_string()));
        }
    }

    for school in &config.schools {
        errors.extend(validate_school(school));
    }

    errors
}

fn validate_school(school: &RawSchool) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if school.identity.trim().is_empty() {
        errors.push(ValidationError::SchoolError {
            school_id: school.identity.clone(),
            message: "identity cannot be empty".into(),
        });
    }
    if school.name.trim().is_empty() {
        errors.push(ValidationError::SchoolError {
            school_id: school.identity.clone(),
            message: "name cannot be empty".into(),
        });
    }
    // The name ends up in export file names
    if school.name.contains(['/', '\\']) {
        errors.push(ValidationError::SchoolError {
            school_id: school.identity.clone(),
            message: "name cannot contain path separators".into(),
        });
    }

    errors
}

/// Parse a storage backend name
pub fn parse_backend(s: &str) -> Result<StorageBackend, String> {
    match s.trim().to_lowercase().as_str() {
        "sqlite" => Ok(StorageBackend::Sqlite),
        "memory" => Ok(StorageBackend::Memory),
        other => Err(format!(
            "Unknown backend '{}': expected sqlite or memory",
            other
        )),
    }
}
