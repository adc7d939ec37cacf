//! Session book: the canonical session list for one (trainer, school) scope

use chrono::{DateTime, Utc};
use fieldlog_api::{EditHistoryEntry, Scope, SessionDraft, SessionRecord};
use fieldlog_store::Store;
use fieldlog_util::{FieldlogError, Result, ScopeKey, SessionId, SessionIdGenerator};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::draft::{merge_draft, new_record, validate_edit, validate_new};

/// Owns the session list for one scope and mirrors it into a store.
///
/// The list is ordered newest addition first. Store failures never fail
/// an operation: the in-memory list stays authoritative.
pub struct SessionBook {
    store: Arc<dyn Store>,
    scope: Scope,
    key: ScopeKey,
    sessions: Vec<SessionRecord>,
    ids: SessionIdGenerator,
}

impl SessionBook {
    /// Open the book for a scope, restoring whatever the store holds
    pub fn open(store: Arc<dyn Store>, scope: Scope) -> Self {
        let key = scope.key();
        let sessions = load_sessions(store.as_ref(), &key);

        let ids = sessions
            .iter()
            .map(|s| s.id)
            .max()
            .map(SessionIdGenerator::after)
            .unwrap_or_default();

        info!(
            scope = %key,
            session_count = sessions.len(),
            "Session book opened"
        );

        Self {
            store,
            scope,
            key,
            sessions,
            ids,
        }
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn scope_key(&self) -> &ScopeKey {
        &self.key
    }

    /// All sessions, newest addition first
    pub fn list_all(&self) -> &[SessionRecord] {
        &self.sessions
    }

    /// Owned copy of the current list, for handing to aggregation and export
    pub fn snapshot(&self) -> Vec<SessionRecord> {
        self.sessions.clone()
    }

    pub fn get(&self, id: SessionId) -> Option<&SessionRecord> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Record a new session at the front of the list
    pub fn add(&mut self, draft: SessionDraft, now: DateTime<Utc>) -> Result<SessionRecord> {
        let required = validate_new(&draft)?;
        let id = self.ids.next_id(now);
        let record = new_record(id, required, draft, &self.scope, now);

        self.sessions.insert(0, record.clone());
        info!(session_id = %id, grade = %record.grade, "Session added");

        self.persist();
        Ok(record)
    }

    /// Edit a session in place, keeping the prior version in its history
    pub fn update(
        &mut self,
        id: SessionId,
        draft: SessionDraft,
        now: DateTime<Utc>,
    ) -> Result<SessionRecord> {
        let index = self
            .sessions
            .iter()
            .position(|s| s.id == id)
            .ok_or(FieldlogError::SessionNotFound(id))?;
        validate_edit(&draft)?;

        let previous = &self.sessions[index];
        // Clock steps backwards must not put updated_at before created_at
        let stamp = now.max(previous.created_at);

        let mut updated = merge_draft(previous, draft);
        updated.updated_at = Some(stamp);
        updated.edit_history.push(EditHistoryEntry {
            edited_at: stamp,
            edited_by: self.scope.trainer.name.clone(),
            previous_data: Box::new(previous.clone()),
        });

        self.sessions[index] = updated.clone();
        info!(
            session_id = %id,
            edit_count = updated.edit_history.len(),
            "Session updated"
        );

        self.persist();
        Ok(updated)
    }

    fn persist(&self) {
        let payload = match serde_json::to_string(&self.sessions) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(scope = %self.key, error = %e, "Failed to serialize sessions");
                return;
            }
        };

        match self.store.save(&self.key, &payload) {
            Ok(()) => debug!(scope = %self.key, count = self.sessions.len(), "Sessions persisted"),
            Err(e) => warn!(scope = %self.key, error = %e, "Failed to persist sessions"),
        }
    }
}

/// Read a scope's list back from the store. Missing, unreadable and
/// corrupt payloads all yield an empty list.
fn load_sessions(store: &dyn Store, key: &ScopeKey) -> Vec<SessionRecord> {
    let payload = match store.load(key) {
        Ok(Some(payload)) => payload,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(scope = %key, error = %e, "Failed to load sessions, starting empty");
            return Vec::new();
        }
    };

    match serde_json::from_str(&payload) {
        Ok(sessions) => sessions,
        Err(e) => {
            warn!(scope = %key, error = %e, "Stored sessions are unreadable, starting empty");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, TimeZone};
    use fieldlog_api::{Grade, School, Trainer};
    use fieldlog_store::MemoryStore;
    use std::sync::atomic::Ordering;

    fn scope() -> Scope {
        Scope::new(
            Trainer {
                name: "Asha Rao".into(),
                identity: "asha@example.org".into(),
            },
            School {
                identity: "sunrise".into(),
                name: "Sunrise Primary".into(),
            },
        )
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()
    }

    fn draft(grade: u8) -> SessionDraft {
        SessionDraft {
            date: NaiveDate::from_ymd_opt(2024, 3, 1),
            time: Some("09:30".into()),
            grade: Grade::numbered(grade),
            boys_attendance: Some("12".into()),
            girls_attendance: Some("8".into()),
            ..Default::default()
        }
    }

    fn open(store: &Arc<MemoryStore>) -> SessionBook {
        SessionBook::open(store.clone(), scope())
    }

    #[test]
    fn add_stamps_new_record() {
        let store = Arc::new(MemoryStore::new());
        let mut book = open(&store);

        let record = book.add(draft(5), t0()).unwrap();
        assert!(record.edit_history.is_empty());
        assert_eq!(record.updated_at, Some(record.created_at));
        assert_eq!(record.created_at, t0());
        assert_eq!(record.id.as_i64(), t0().timestamp_millis());
        assert_eq!(record.trainer_identity, "asha@example.org");
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn add_prepends() {
        let store = Arc::new(MemoryStore::new());
        let mut book = open(&store);

        let first = book.add(draft(1), t0()).unwrap();
        let second = book.add(draft(2), t0()).unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(book.list_all()[0].id, second.id);
        assert_eq!(book.list_all()[1].id, first.id);
    }

    #[test]
    fn add_rejects_missing_fields_without_persisting() {
        let store = Arc::new(MemoryStore::new());
        let mut book = open(&store);

        let mut bad = draft(5);
        bad.grade = None;
        let err = book.add(bad, t0()).unwrap_err();

        assert!(matches!(err, FieldlogError::MissingField { field: "grade" }));
        assert!(book.is_empty());
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn update_appends_history_and_keeps_position() {
        let store = Arc::new(MemoryStore::new());
        let mut book = open(&store);

        let older = book.add(draft(3), t0()).unwrap();
        book.add(draft(7), t0() + Duration::seconds(1)).unwrap();

        let edit = SessionDraft {
            grade: Grade::numbered(4),
            ..Default::default()
        };
        let later = t0() + Duration::minutes(5);
        let updated = book.update(older.id, edit, later).unwrap();

        assert_eq!(updated.grade, Grade::numbered(4).unwrap());
        assert_eq!(updated.edit_history.len(), older.edit_history.len() + 1);
        assert_eq!(*updated.edit_history[0].previous_data, older);
        assert_eq!(updated.edit_history[0].edited_by, "Asha Rao");
        assert_eq!(updated.updated_at, Some(later));
        assert_eq!(updated.created_at, older.created_at);

        assert_eq!(book.len(), 2);
        assert_eq!(book.list_all()[1].id, older.id);
    }

    #[test]
    fn repeated_updates_grow_history_by_one_each() {
        let store = Arc::new(MemoryStore::new());
        let mut book = open(&store);
        let record = book.add(draft(3), t0()).unwrap();

        for n in 1..=3 {
            let edit = SessionDraft {
                summary: Some(format!("revision {n}")),
                ..Default::default()
            };
            let updated = book
                .update(record.id, edit, t0() + Duration::minutes(n))
                .unwrap();
            assert_eq!(updated.edit_history.len(), n as usize);
        }

        let history = &book.get(record.id).unwrap().edit_history;
        assert!(history[0].previous_data.summary.is_none());
        assert_eq!(history[2].previous_data.summary.as_deref(), Some("revision 2"));
    }

    #[test]
    fn update_never_predates_creation() {
        let store = Arc::new(MemoryStore::new());
        let mut book = open(&store);
        let record = book.add(draft(3), t0()).unwrap();

        let updated = book
            .update(record.id, SessionDraft::default(), t0() - Duration::hours(1))
            .unwrap();
        assert!(updated.last_modified() >= updated.created_at);
    }

    #[test]
    fn update_unknown_id_leaves_list_untouched() {
        let store = Arc::new(MemoryStore::new());
        let mut book = open(&store);
        book.add(draft(3), t0()).unwrap();
        let before = book.snapshot();
        let saves = store.save_count();

        let err = book
            .update(SessionId::new(42), draft(4), t0())
            .unwrap_err();

        assert!(matches!(err, FieldlogError::SessionNotFound(id) if id == SessionId::new(42)));
        assert_eq!(book.list_all(), before.as_slice());
        assert_eq!(store.save_count(), saves);
    }

    #[test]
    fn update_rejects_blank_time() {
        let store = Arc::new(MemoryStore::new());
        let mut book = open(&store);
        let record = book.add(draft(3), t0()).unwrap();

        let edit = SessionDraft {
            time: Some(" ".into()),
            ..Default::default()
        };
        assert!(book.update(record.id, edit, t0()).is_err());
        assert!(book.get(record.id).unwrap().edit_history.is_empty());
    }

    #[test]
    fn every_mutation_is_persisted_and_restored() {
        let store = Arc::new(MemoryStore::new());
        let mut book = open(&store);
        let record = book.add(draft(3), t0()).unwrap();
        book.update(record.id, draft(4), t0() + Duration::minutes(1))
            .unwrap();
        assert_eq!(store.save_count(), 2);

        let reopened = open(&store);
        assert_eq!(reopened.list_all(), book.list_all());
    }

    #[test]
    fn ids_stay_unique_after_reopen() {
        let store = Arc::new(MemoryStore::new());
        let mut book = open(&store);
        let first = book.add(draft(3), t0()).unwrap();

        let mut reopened = open(&store);
        let second = reopened.add(draft(3), t0()).unwrap();
        assert!(second.id > first.id);
    }

    #[test]
    fn corrupt_payload_opens_empty() {
        let key = scope().key();
        let store = Arc::new(MemoryStore::new().with_payload(&key, "{not json"));

        let book = open(&store);
        assert!(book.is_empty());
    }

    #[test]
    fn load_failure_opens_empty() {
        let store = Arc::new(MemoryStore::new());
        store.fail_load.store(true, Ordering::SeqCst);

        let book = open(&store);
        assert!(book.is_empty());
    }

    #[test]
    fn save_failure_does_not_fail_mutation() {
        let store = Arc::new(MemoryStore::new());
        store.fail_save.store(true, Ordering::SeqCst);
        let mut book = open(&store);

        let record = book.add(draft(3), t0()).unwrap();
        assert_eq!(book.get(record.id), Some(&record));
        assert!(store.payload(book.scope_key()).is_none());
    }

    #[test]
    fn scopes_do_not_share_sessions() {
        let store = Arc::new(MemoryStore::new());
        let mut sunrise = open(&store);
        sunrise.add(draft(3), t0()).unwrap();

        let mut other = scope();
        other.school.identity = "hillside".into();
        let hillside = SessionBook::open(store.clone(), other);
        assert!(hillside.is_empty());
    }
}
