use super::*;
use shared::domain::{ProjectContext, ProjectId};

fn submission(id: i64) -> Submission {
    Submission {
        id: SubmissionId(id),
        approval_status: ApprovalStatus::Pending,
        approved_hours: None,
        hours_justification: None,
        project: None,
        user: None,
        submitted_at: None,
    }
}

fn with_computed_hours(mut record: Submission, hours: f64) -> Submission {
    record.project = Some(ProjectContext {
        id: ProjectId(record.id.0 * 10),
        name: format!("project-{}", record.id.0),
        computed_hours: Some(hours),
    });
    record
}

#[test]
fn approved_hours_are_stringified_as_is() {
    let mut record = with_computed_hours(submission(1), 40.0);
    record.approved_hours = Some(12.0);
    assert_eq!(derive_draft(&record).approved_hours, "12");

    record.approved_hours = Some(7.25);
    assert_eq!(derive_draft(&record).approved_hours, "7.25");
}

#[test]
fn computed_hours_fallback_keeps_one_fractional_digit() {
    let record = with_computed_hours(submission(1), 12.0);
    assert_eq!(derive_draft(&record).approved_hours, "12.0");

    let record = with_computed_hours(submission(2), 3.14159);
    assert_eq!(derive_draft(&record).approved_hours, "3.1");
}

#[test]
fn hours_are_empty_without_any_source() {
    let draft = derive_draft(&submission(1));
    assert_eq!(draft.approved_hours, "");
    assert_eq!(draft.hours_justification, "");
    assert_eq!(draft.approval_status, ApprovalStatus::Pending);
}

#[test]
fn justification_and_status_are_copied() {
    let mut record = submission(3);
    record.approval_status = ApprovalStatus::Rejected;
    record.hours_justification = Some("duplicate of #2".to_string());
    let draft = derive_draft(&record);
    assert_eq!(draft.approval_status, ApprovalStatus::Rejected);
    assert_eq!(draft.hours_justification, "duplicate of #2");
}

#[test]
fn fill_missing_keeps_existing_edits() {
    let records = vec![submission(5), submission(6)];
    let mut store = DraftStore::new();
    store.rebuild_all(&records);
    assert!(store.set_hours(SubmissionId(5), "9.5"));
    let edited = store.get(SubmissionId(5)).cloned().expect("draft");

    let mut refreshed = records.clone();
    refreshed[0].approved_hours = Some(2.0);
    refreshed.push(submission(8));
    store.fill_missing(&refreshed);

    assert_eq!(store.get(SubmissionId(5)), Some(&edited));
    assert_eq!(
        store.get(SubmissionId(8)),
        Some(&derive_draft(&submission(8)))
    );
    assert_eq!(store.len(), 3);
}

#[test]
fn rebuild_all_overwrites_edited_drafts() {
    let mut store = DraftStore::new();
    store.rebuild_all(&[submission(5)]);
    store.set_hours(SubmissionId(5), "99");
    store.set_justification(SubmissionId(5), "typed locally");

    let mut refreshed = submission(5);
    refreshed.approved_hours = Some(4.5);
    store.rebuild_all(&[refreshed.clone()]);

    assert_eq!(store.get(SubmissionId(5)), Some(&derive_draft(&refreshed)));
}

#[test]
fn rebuild_all_drops_drafts_for_absent_records() {
    let mut store = DraftStore::new();
    store.rebuild_all(&[submission(1), submission(2)]);
    store.rebuild_all(&[submission(2)]);
    assert!(store.get(SubmissionId(1)).is_none());
    assert_eq!(store.len(), 1);
}

#[test]
fn fill_missing_never_prunes_stale_drafts() {
    let mut store = DraftStore::new();
    store.rebuild_all(&[submission(1), submission(2)]);
    store.fill_missing(&[submission(2)]);
    assert!(store.get(SubmissionId(1)).is_some());
}

#[test]
fn reset_one_discards_only_that_draft() {
    let records = vec![submission(1), submission(2)];
    let mut store = DraftStore::new();
    store.rebuild_all(&records);
    store.set_hours(SubmissionId(1), "3");
    store.set_hours(SubmissionId(2), "4");

    store.reset_one(&records[0]);

    assert_eq!(store.get(SubmissionId(1)).expect("draft").approved_hours, "");
    assert_eq!(store.get(SubmissionId(2)).expect("draft").approved_hours, "4");
}

#[test]
fn empty_fields_become_nulls_in_payload() {
    let draft = DraftRecord {
        approval_status: ApprovalStatus::Approved,
        approved_hours: String::new(),
        hours_justification: String::new(),
    };
    assert_eq!(
        draft.to_payload(),
        UpdateSubmissionRequest {
            approval_status: ApprovalStatus::Approved,
            approved_hours: None,
            hours_justification: None,
        }
    );
}

#[test]
fn payload_parses_hours_and_keeps_justification() {
    let draft = DraftRecord {
        approval_status: ApprovalStatus::Approved,
        approved_hours: "15.5".to_string(),
        hours_justification: "verified commits".to_string(),
    };
    let payload = draft.to_payload();
    assert_eq!(payload.approved_hours, Some(15.5));
    assert_eq!(
        payload.hours_justification.as_deref(),
        Some("verified commits")
    );
}

#[test]
fn unparsable_hours_are_forwarded_as_nan() {
    let draft = DraftRecord {
        approval_status: ApprovalStatus::Approved,
        approved_hours: "lots".to_string(),
        hours_justification: String::new(),
    };
    let hours = draft.to_payload().approved_hours.expect("hours present");
    assert!(hours.is_nan());
}

#[test]
fn hours_parsing_is_permissive() {
    assert_eq!(parse_hours("12"), 12.0);
    assert_eq!(parse_hours("  4.5 hours"), 4.5);
    assert_eq!(parse_hours(".5"), 0.5);
    assert_eq!(parse_hours("7."), 7.0);
    assert_eq!(parse_hours("-2"), -2.0);
    assert_eq!(parse_hours("1e2"), 100.0);
    assert_eq!(parse_hours("3e"), 3.0);
    assert_eq!(parse_hours("1.2.3"), 1.2);
    assert!(parse_hours("").is_nan());
    assert!(parse_hours(".").is_nan());
    assert!(parse_hours("-").is_nan());
    assert!(parse_hours("h12").is_nan());
}

#[test]
fn dirty_tracks_divergence_from_canonical() {
    let record = with_computed_hours(submission(4), 6.0);
    let mut store = DraftStore::new();
    store.rebuild_all(std::slice::from_ref(&record));
    assert!(!store.is_dirty(&record));

    store.set_status(record.id, ApprovalStatus::Approved);
    assert!(store.is_dirty(&record));

    store.reset_one(&record);
    assert!(!store.is_dirty(&record));
}

#[test]
fn edits_on_unknown_ids_are_ignored() {
    let mut store = DraftStore::new();
    assert!(!store.set_hours(SubmissionId(1), "3"));
    assert!(store.payload(SubmissionId(1)).is_none());
    assert!(store.is_empty());
}
