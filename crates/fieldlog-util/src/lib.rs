//! Shared utilities for fieldlog
//!
//! This crate provides:
//! - ID types (SessionId, ScopeKey) and the session id generator
//! - Time utilities (mockable wall clock, timestamp formatting)
//! - Error types
//! - Default paths for config and data directories

mod error;
mod ids;
mod paths;
mod time;

pub use error::*;
pub use ids::*;
pub use paths::*;
pub use time::*;
