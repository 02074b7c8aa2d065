use std::collections::HashMap;

use shared::{
    domain::{ApprovalStatus, SubmissionId},
    protocol::{Submission, UpdateSubmissionRequest},
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DraftRecord {
    pub approval_status: ApprovalStatus,
    pub approved_hours: String,
    pub hours_justification: String,
}

impl DraftRecord {
    pub fn to_payload(&self) -> UpdateSubmissionRequest {
        UpdateSubmissionRequest {
            approval_status: self.approval_status,
            approved_hours: if self.approved_hours.is_empty() {
                None
            } else {
                Some(parse_hours(&self.approved_hours))
            },
            hours_justification: if self.hours_justification.is_empty() {
                None
            } else {
                Some(self.hours_justification.clone())
            },
        }
    }
}

pub fn derive_draft(record: &Submission) -> DraftRecord {
    let approved_hours = match (record.approved_hours, record.computed_hours()) {
        (Some(hours), _) => hours.to_string(),
        (None, Some(computed)) => format!("{computed:.1}"),
        (None, None) => String::new(),
    };

    DraftRecord {
        approval_status: record.approval_status,
        approved_hours,
        hours_justification: record.hours_justification.clone().unwrap_or_default(),
    }
}

/// Parses the longest leading decimal number in `raw`, ignoring leading
/// whitespace and any trailing text. Returns NaN when no number is found.
pub fn parse_hours(raw: &str) -> f64 {
    let text = raw.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return f64::NAN;
    }

    // exponent only counts when at least one digit follows it
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    text[..end].parse::<f64>().unwrap_or(f64::NAN)
}

#[derive(Debug, Clone, Default)]
pub struct DraftStore {
    drafts: HashMap<SubmissionId, DraftRecord>,
}

impl DraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: SubmissionId) -> Option<&DraftRecord> {
        self.drafts.get(&id)
    }

    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }

    /// Replaces the whole store with drafts seeded from `records`. Drafts for
    /// ids missing from `records` are dropped along with every local edit.
    pub fn rebuild_all(&mut self, records: &[Submission]) {
        self.drafts = records
            .iter()
            .map(|record| (record.id, derive_draft(record)))
            .collect();
    }

    /// Seeds drafts only for records that do not have one yet.
    pub fn fill_missing(&mut self, records: &[Submission]) {
        for record in records {
            self.drafts
                .entry(record.id)
                .or_insert_with(|| derive_draft(record));
        }
    }

    pub fn reset_one(&mut self, record: &Submission) {
        self.drafts.insert(record.id, derive_draft(record));
    }

    pub fn edit(&mut self, id: SubmissionId, edit: impl FnOnce(&mut DraftRecord)) -> bool {
        match self.drafts.get_mut(&id) {
            Some(draft) => {
                edit(draft);
                true
            }
            None => false,
        }
    }

    pub fn set_status(&mut self, id: SubmissionId, status: ApprovalStatus) -> bool {
        self.edit(id, |draft| draft.approval_status = status)
    }

    pub fn set_hours(&mut self, id: SubmissionId, hours: impl Into<String>) -> bool {
        let hours = hours.into();
        self.edit(id, |draft| draft.approved_hours = hours)
    }

    pub fn set_justification(&mut self, id: SubmissionId, justification: impl Into<String>) -> bool {
        let justification = justification.into();
        self.edit(id, |draft| draft.hours_justification = justification)
    }

    pub fn is_dirty(&self, record: &Submission) -> bool {
        self.drafts
            .get(&record.id)
            .is_some_and(|draft| *draft != derive_draft(record))
    }

    pub fn payload(&self, id: SubmissionId) -> Option<UpdateSubmissionRequest> {
        self.drafts.get(&id).map(DraftRecord::to_payload)
    }
}

#[cfg(test)]
#[path = "tests/drafts_tests.rs"]
mod tests;
