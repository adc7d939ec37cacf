//! Export formats for fieldlog
//!
//! - CSV export (fixed 16-column schema, every field quoted)
//! - Spreadsheet script with the CSV embedded as its import payload
//! - Standalone dashboard markup

pub mod artifacts;
pub mod csv;

pub use artifacts::{
    generate_dashboard_markup, generate_remote_script, generate_remote_script_for,
};
pub use csv::{export_file_name, parse_csv, to_csv, CSV_MIME_TYPE};
