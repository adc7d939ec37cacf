//! Strongly-typed identifiers for fieldlog

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Identifier of a session record.
///
/// Derived from the creation instant in milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(i64);

impl SessionId {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl From<i64> for SessionId {
    fn from(millis: i64) -> Self {
        Self(millis)
    }
}

/// Hands out clock-derived session ids that never repeat.
///
/// If the clock has not advanced past the last issued id (same millisecond,
/// or a clock step backwards) the next id is the last one plus one.
#[derive(Debug, Clone, Default)]
pub struct SessionIdGenerator {
    last: Option<i64>,
}

impl SessionIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start after an id that is already in use
    pub fn after(last: SessionId) -> Self {
        Self {
            last: Some(last.0),
        }
    }

    pub fn next_id(&mut self, now: DateTime<Utc>) -> SessionId {
        let candidate = now.timestamp_millis();
        let id = match self.last {
            Some(last) if candidate <= last => last.saturating_add(1),
            _ => candidate,
        };
        self.last = Some(id);
        SessionId(id)
    }
}

/// Key under which one (trainer, school) session list is persisted.
///
/// The trainer identity is length-prefixed so no two identity pairs
/// produce the same key, whatever characters they contain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScopeKey(String);

impl ScopeKey {
    const PREFIX: &'static str = "sessions";

    pub fn for_pair(trainer_identity: &str, school_identity: &str) -> Self {
        Self(format!(
            "{}:{}:{}:{}",
            Self::PREFIX,
            trainer_identity.len(),
            trainer_identity,
            school_identity
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScopeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
