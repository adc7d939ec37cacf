//! CSV export of session records.
//!
//! Every field is quoted, embedded quotes are doubled and rows are joined
//! with `\n` (no trailing newline). The column set is fixed so the
//! spreadsheet script can look columns up by header name.

use chrono::NaiveDate;
use fieldlog_api::SessionRecord;
use fieldlog_util::{format_date_iso, format_timestamp};

/// MIME type for exported files
pub const CSV_MIME_TYPE: &str = "text/csv";

/// Column headers, in export order
pub const CSV_HEADERS: [&str; 16] = [
    "ID",
    "Date",
    "Time",
    "Duration",
    "Grade",
    "Boys Attendance",
    "Girls Attendance",
    "Topics Taught",
    "Teacher Attended",
    "Summary",
    "Trainer",
    "Trainer Email",
    "School",
    "School ID",
    "Created At",
    "Updated At",
];

/// Quote a single field
pub fn quote_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn optional_text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn attendance_text(value: &Option<String>) -> String {
    match value.as_deref() {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => "0".to_string(),
    }
}

/// The sixteen field values of one record, unquoted
pub fn record_fields(record: &SessionRecord) -> [String; 16] {
    [
        record.id.to_string(),
        format_date_iso(record.date),
        record.time.clone(),
        record
            .duration_minutes
            .map(|d| d.to_string())
            .unwrap_or_default(),
        record.grade.label(),
        attendance_text(&record.boys_attendance),
        attendance_text(&record.girls_attendance),
        optional_text(&record.topics_taught),
        optional_text(&record.teacher_attended),
        optional_text(&record.summary),
        record.trainer_name.clone(),
        record.trainer_identity.clone(),
        record.school_name.clone(),
        record.school_identity.clone(),
        format_timestamp(&record.created_at),
        format_timestamp(&record.last_modified()),
    ]
}

fn join_row<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(|f| quote_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Serialize records to CSV, header first, rows in input order
pub fn to_csv(records: &[SessionRecord]) -> String {
    std::iter::once(join_row(&CSV_HEADERS))
        .chain(records.iter().map(|r| join_row(&record_fields(r))))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Download name for an export: `sessions_<school>_<YYYY-MM-DD>.csv`
pub fn export_file_name(school_name: &str, date: NaiveDate) -> String {
    format!("sessions_{}_{}.csv", school_name, format_date_iso(date))
}

/// Read CSV text back into rows of fields.
///
/// Handles quoted fields containing commas, doubled quotes and line
/// breaks. A trailing newline does not produce an extra empty row.
pub fn parse_csv(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => row.push(std::mem::take(&mut field)),
            '\r' if !in_quotes && chars.peek() == Some(&'\n') => {}
            '\n' if !in_quotes => {
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
            }
            _ => field.push(ch),
        }
    }

    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    rows
}
