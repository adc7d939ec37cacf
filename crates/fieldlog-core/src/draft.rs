//! Draft validation and field-by-field merging

use chrono::{DateTime, NaiveDate, Utc};
use fieldlog_api::{Grade, Scope, SessionDraft, SessionRecord};
use fieldlog_util::{FieldlogError, Result, SessionId};

/// The fields a new session cannot be created without
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredFields {
    pub date: NaiveDate,
    pub time: String,
    pub grade: Grade,
}

fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Check a draft for creating a session. Reports the first missing field
/// in form order: date, time, grade.
pub fn validate_new(draft: &SessionDraft) -> Result<RequiredFields> {
    let date = draft.date.ok_or_else(|| FieldlogError::missing("date"))?;
    let time = match draft.time.as_deref() {
        Some(t) if !is_blank(t) => t.to_string(),
        _ => return Err(FieldlogError::missing("time")),
    };
    let grade = draft.grade.ok_or_else(|| FieldlogError::missing("grade"))?;

    Ok(RequiredFields { date, time, grade })
}

/// Check a draft for editing a session.
///
/// Absent fields are kept from the existing record, so only a time that is
/// present but blank can clear a required field.
pub fn validate_edit(draft: &SessionDraft) -> Result<()> {
    match draft.time.as_deref() {
        Some(t) if is_blank(t) => Err(FieldlogError::missing("time")),
        _ => Ok(()),
    }
}

/// Build a brand-new record from a validated draft
pub fn new_record(
    id: SessionId,
    required: RequiredFields,
    draft: SessionDraft,
    scope: &Scope,
    now: DateTime<Utc>,
) -> SessionRecord {
    SessionRecord {
        id,
        date: required.date,
        time: required.time,
        duration_minutes: draft.duration_minutes,
        grade: required.grade,
        boys_attendance: draft.boys_attendance,
        girls_attendance: draft.girls_attendance,
        topics_taught: draft.topics_taught,
        teacher_attended: draft.teacher_attended,
        summary: draft.summary,
        media_files: draft.media_files.unwrap_or_default(),
        trainer_name: scope.trainer.name.clone(),
        trainer_identity: scope.trainer.identity.clone(),
        school_name: scope.school.name.clone(),
        school_identity: scope.school.identity.clone(),
        created_at: now,
        updated_at: Some(now),
        edit_history: Vec::new(),
    }
}

/// Overlay a draft onto a record. Fields present in the draft replace the
/// record's; absent ones are kept. Identity, context and timestamps are
/// never touched here.
pub fn merge_draft(record: &SessionRecord, draft: SessionDraft) -> SessionRecord {
    let mut merged = record.clone();

    if let Some(date) = draft.date {
        merged.date = date;
    }
    if let Some(time) = draft.time {
        merged.time = time;
    }
    if let Some(grade) = draft.grade {
        merged.grade = grade;
    }
    if draft.duration_minutes.is_some() {
        merged.duration_minutes = draft.duration_minutes;
    }
    if draft.boys_attendance.is_some() {
        merged.boys_attendance = draft.boys_attendance;
    }
    if draft.girls_attendance.is_some() {
        merged.girls_attendance = draft.girls_attendance;
    }
    if draft.topics_taught.is_some() {
        merged.topics_taught = draft.topics_taught;
    }
    if draft.teacher_attended.is_some() {
        merged.teacher_attended = draft.teacher_attended;
    }
    if draft.summary.is_some() {
        merged.summary = draft.summary;
    }
    if let Some(files) = draft.media_files {
        merged.media_files = files;
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use fieldlog_api::{MediaFile, School, Trainer};

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

    fn full_draft() -> SessionDraft {
        SessionDraft {
            date: NaiveDate::from_ymd_opt(2024, 3, 1),
            time: Some("09:30".into()),
            grade: Grade::numbered(3),
            boys_attendance: Some("10".into()),
            summary: Some("Fractions".into()),
            ..Default::default()
        }
    }

    fn record() -> SessionRecord {
        let draft = full_draft();
        let required = validate_new(&draft).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        new_record(SessionId::new(1), required, draft, &scope(), now)
    }

    #[test]
    fn new_requires_date_time_grade() {
        assert!(validate_new(&full_draft()).is_ok());

        let mut draft = full_draft();
        draft.date = None;
        assert!(matches!(
            validate_new(&draft),
            Err(FieldlogError::MissingField { field: "date" })
        ));

        let mut draft = full_draft();
        draft.time = Some("   ".into());
        assert!(matches!(
            validate_new(&draft),
            Err(FieldlogError::MissingField { field: "time" })
        ));

        let mut draft = full_draft();
        draft.grade = None;
        assert!(matches!(
            validate_new(&draft),
            Err(FieldlogError::MissingField { field: "grade" })
        ));
    }

    #[test]
    fn first_missing_field_is_reported() {
        let err = validate_new(&SessionDraft::default()).unwrap_err();
        assert!(matches!(err, FieldlogError::MissingField { field: "date" }));
    }

    #[test]
    fn edit_accepts_partial_drafts() {
        assert!(validate_edit(&SessionDraft::default()).is_ok());

        let draft = SessionDraft {
            time: Some(String::new()),
            ..Default::default()
        };
        assert!(validate_edit(&draft).is_err());
    }

    #[test]
    fn new_record_captures_scope_and_timestamps() {
        let record = record();
        assert_eq!(record.trainer_name, "Asha Rao");
        assert_eq!(record.school_identity, "sunrise");
        assert_eq!(record.updated_at, Some(record.created_at));
        assert!(record.edit_history.is_empty());
        assert!(record.media_files.is_empty());
    }

    #[test]
    fn merge_keeps_absent_fields() {
        let before = record();
        let draft = SessionDraft {
            grade: Grade::numbered(4),
            girls_attendance: Some("7".into()),
            ..Default::default()
        };

        let after = merge_draft(&before, draft);
        assert_eq!(after.grade, Grade::numbered(4).unwrap());
        assert_eq!(after.girls_attendance.as_deref(), Some("7"));
        assert_eq!(after.boys_attendance.as_deref(), Some("10"));
        assert_eq!(after.summary.as_deref(), Some("Fractions"));
        assert_eq!(after.time, "09:30");
        assert_eq!(after.id, before.id);
        assert_eq!(after.created_at, before.created_at);
    }

    #[test]
    fn merge_replaces_media_list_wholesale() {
        let mut before = record();
        before.media_files = vec![MediaFile {
            name: "a.jpg".into(),
            size: 10,
            mime_type: "image/jpeg".into(),
        }];

        let draft = SessionDraft {
            media_files: Some(vec![]),
            ..Default::default()
        };
        assert!(merge_draft(&before, draft).media_files.is_empty());
        assert_eq!(merge_draft(&before, SessionDraft::default()).media_files.len(), 1);
    }
}
