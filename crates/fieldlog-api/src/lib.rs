//! Shared data types for fieldlog
//!
//! Defines the records every other crate passes around:
//! - Session records and their edit history
//! - Drafts (caller input for create/update)
//! - Grades, media file metadata, trainer/school scopes

mod types;

pub use types::*;
