//! Shared types for fieldlog

use chrono::{DateTime, NaiveDate, Utc};
use fieldlog_util::{ScopeKey, SessionId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// School grade a session was held for: kindergarten or grades 1 through 12.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Grade(u8);

impl Grade {
    pub const KINDERGARTEN: Grade = Grade(0);
    pub const HIGHEST: u8 = 12;

    /// Numbered grade, 1 through 12
    pub fn numbered(n: u8) -> Option<Self> {
        (1..=Self::HIGHEST).contains(&n).then_some(Self(n))
    }

    pub fn is_kindergarten(&self) -> bool {
        self.0 == 0
    }

    /// Short label as entered and exported: `K`, `1` .. `12`
    pub fn label(&self) -> String {
        if self.is_kindergarten() {
            "K".to_string()
        } else {
            self.0.to_string()
        }
    }

    /// Long label for display: `Kindergarten`, `Grade 5`
    pub fn display_name(&self) -> String {
        if self.is_kindergarten() {
            "Kindergarten".to_string()
        } else {
            format!("Grade {}", self.0)
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown grade '{0}': expected K or 1-12")]
pub struct InvalidGrade(pub String);

impl FromStr for Grade {
    type Err = InvalidGrade;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("k") {
            return Ok(Self::KINDERGARTEN);
        }
        trimmed
            .parse::<u8>()
            .ok()
            .and_then(Self::numbered)
            .ok_or_else(|| InvalidGrade(s.to_string()))
    }
}

impl TryFrom<String> for Grade {
    type Error = InvalidGrade;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Grade> for String {
    fn from(grade: Grade) -> Self {
        grade.label()
    }
}

/// Metadata for a photo or video attached to a session.
/// File contents never pass through fieldlog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaFile {
    pub name: String,
    /// Size in bytes
    pub size: u64,
    pub mime_type: String,
}

/// The trainer filing reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trainer {
    pub name: String,
    /// Stable identity, usually an email address
    pub identity: String,
}

/// The school a trainer is visiting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct School {
    pub identity: String,
    pub name: String,
}

/// One (trainer, school) pair. Session lists are partitioned by scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scope {
    pub trainer: Trainer,
    pub school: School,
}

impl Scope {
    pub fn new(trainer: Trainer, school: School) -> Self {
        Self { trainer, school }
    }

    pub fn key(&self) -> ScopeKey {
        ScopeKey::for_pair(&self.trainer.identity, &self.school.identity)
    }
}

/// One reported training session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: SessionId,
    pub date: NaiveDate,
    /// Time of day as entered (e.g. `09:30`)
    pub time: String,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    pub grade: Grade,

    /// Raw attendance text. Parsed leniently when aggregated.
    #[serde(default)]
    pub boys_attendance: Option<String>,
    #[serde(default)]
    pub girls_attendance: Option<String>,

    #[serde(default)]
    pub topics_taught: Option<String>,
    #[serde(default)]
    pub teacher_attended: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub media_files: Vec<MediaFile>,

    pub trainer_name: String,
    pub trainer_identity: String,
    pub school_name: String,
    pub school_identity: String,

    pub created_at: DateTime<Utc>,
    /// Absent only in payloads written before updates were tracked
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub edit_history: Vec<EditHistoryEntry>,
}

impl SessionRecord {
    /// When the record last changed: `updated_at`, or `created_at` if never stamped
    pub fn last_modified(&self) -> DateTime<Utc> {
        self.updated_at.unwrap_or(self.created_at)
    }

    pub fn edit_count(&self) -> usize {
        self.edit_history.len()
    }
}

/// Audit entry appended on every update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditHistoryEntry {
    pub edited_at: DateTime<Utc>,
    /// Trainer name of the editor
    pub edited_by: String,
    /// The full record as it was before the edit
    pub previous_data: Box<SessionRecord>,
}

/// Caller input for creating or editing a session.
///
/// Every field is optional. On create, `date`, `time` and `grade` must be
/// present; on update, absent fields keep their previous values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDraft {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub grade: Option<Grade>,
    #[serde(default)]
    pub boys_attendance: Option<String>,
    #[serde(default)]
    pub girls_attendance: Option<String>,
    #[serde(default)]
    pub topics_taught: Option<String>,
    #[serde(default)]
    pub teacher_attended: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub media_files: Option<Vec<MediaFile>>,
}
