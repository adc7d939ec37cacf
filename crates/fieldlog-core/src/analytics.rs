//! Attendance statistics over a snapshot of session records.
//!
//! Every function here is pure and total. Attendance is stored as the raw
//! text the trainer typed, so it is parsed leniently: anything that is not
//! a non-negative leading integer counts as zero.

use chrono::{DateTime, Duration, Local, NaiveDate};
use fieldlog_api::{Grade, SessionRecord};
use fieldlog_util::format_date_short;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of days back (inclusive of today) counted as "this week"
pub const WEEK_WINDOW_DAYS: i64 = 7;

/// Parse attendance text the way a lenient form field would.
///
/// Leading whitespace is skipped and the leading run of digits is used
/// (`"12 kids"` is 12, `"1.5"` is 1). Empty, non-numeric and negative
/// input is 0. Values beyond `u32::MAX` saturate.
pub fn parse_attendance(text: Option<&str>) -> u32 {
    let Some(text) = text else {
        return 0;
    };

    let trimmed = text.trim_start();
    let digits = match trimmed.strip_prefix('+') {
        Some(rest) => rest,
        None if trimmed.starts_with('-') => return 0,
        None => trimmed,
    };

    digits
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .fold(0u32, |acc, c| {
            acc.saturating_mul(10)
                .saturating_add(c.to_digit(10).unwrap_or(0))
        })
}

fn boys(record: &SessionRecord) -> u64 {
    u64::from(parse_attendance(record.boys_attendance.as_deref()))
}

fn girls(record: &SessionRecord) -> u64 {
    u64::from(parse_attendance(record.girls_attendance.as_deref()))
}

/// Boys plus girls for one record
pub fn record_attendance(record: &SessionRecord) -> u64 {
    boys(record) + girls(record)
}

pub fn total_sessions(snapshot: &[SessionRecord]) -> usize {
    snapshot.len()
}

/// Sessions dated within the last week, counting both today and the day
/// exactly one week ago
pub fn this_week_sessions(snapshot: &[SessionRecord], now: DateTime<Local>) -> usize {
    let today = now.date_naive();
    let week_ago = today - Duration::days(WEEK_WINDOW_DAYS);

    snapshot
        .iter()
        .filter(|s| s.date >= week_ago && s.date <= today)
        .count()
}

pub fn total_attendance(snapshot: &[SessionRecord]) -> u64 {
    snapshot.iter().map(record_attendance).sum()
}

/// Mean attendance per session, rounded half up. Zero for no sessions.
pub fn average_attendance(snapshot: &[SessionRecord]) -> u64 {
    let count = snapshot.len() as u64;
    if count == 0 {
        return 0;
    }
    (2 * total_attendance(snapshot) + count) / (2 * count)
}

/// One point on the attendance trend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendancePoint {
    pub date: NaiveDate,
    /// Chart label, e.g. `Mar 5`
    pub label: String,
    pub boys: u64,
    pub girls: u64,
    pub total: u64,
}

/// One point per record, in reverse of snapshot order (oldest first for a
/// newest-first snapshot)
pub fn attendance_by_date(snapshot: &[SessionRecord]) -> Vec<AttendancePoint> {
    snapshot
        .iter()
        .rev()
        .map(|s| {
            let (b, g) = (boys(s), girls(s));
            AttendancePoint {
                date: s.date,
                label: format_date_short(s.date),
                boys: b,
                girls: g,
                total: b + g,
            }
        })
        .collect()
}

/// Total attendance per grade
pub fn grade_distribution(snapshot: &[SessionRecord]) -> BTreeMap<Grade, u64> {
    let mut by_grade = BTreeMap::new();
    for session in snapshot {
        *by_grade.entry(session.grade).or_insert(0) += record_attendance(session);
    }
    by_grade
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenderTotals {
    pub boys: u64,
    pub girls: u64,
}

pub fn gender_distribution(snapshot: &[SessionRecord]) -> GenderTotals {
    snapshot
        .iter()
        .fold(GenderTotals::default(), |acc, s| GenderTotals {
            boys: acc.boys + boys(s),
            girls: acc.girls + girls(s),
        })
}

/// Everything the dashboard shows, computed in one pass over a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub total_sessions: usize,
    pub this_week_sessions: usize,
    pub total_attendance: u64,
    pub average_attendance: u64,
    pub grades_covered: usize,
    pub gender: GenderTotals,
    pub grade_distribution: BTreeMap<Grade, u64>,
    pub attendance_by_date: Vec<AttendancePoint>,
}

pub fn summarize(snapshot: &[SessionRecord], now: DateTime<Local>) -> SessionSummary {
    let grade_distribution = grade_distribution(snapshot);

    SessionSummary {
        total_sessions: total_sessions(snapshot),
        this_week_sessions: this_week_sessions(snapshot, now),
        total_attendance: total_attendance(snapshot),
        average_attendance: average_attendance(snapshot),
        grades_covered: grade_distribution.len(),
        gender: gender_distribution(snapshot),
        grade_distribution,
        attendance_by_date: attendance_by_date(snapshot),
    }
}
