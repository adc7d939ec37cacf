//! Session book and analytics for fieldlog
//!
//! This crate contains:
//! - The session book (canonical record list per trainer/school scope)
//! - Draft validation and field-by-field merging
//! - Pure attendance statistics over a snapshot

pub mod analytics;
mod book;
mod draft;

pub use book::*;
pub use draft::*;
