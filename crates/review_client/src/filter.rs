use std::{fmt, str::FromStr};

use shared::{
    domain::ApprovalStatus,
    error::ParseStatusError,
    protocol::{Project, Submission, User},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ApprovalStatus),
}

impl StatusFilter {
    pub fn matches(self, status: ApprovalStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }

    pub fn apply(self, records: &[Submission]) -> Vec<&Submission> {
        records
            .iter()
            .filter(|record| self.matches(record.approval_status))
            .collect()
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::Only(status) => write!(f, "{status}"),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        s.parse().map(StatusFilter::Only)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub all: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
}

impl StatusCounts {
    pub fn tally(records: &[Submission]) -> Self {
        records
            .iter()
            .fold(StatusCounts::default(), |mut counts, record| {
                counts.all += 1;
                match record.approval_status {
                    ApprovalStatus::Pending => counts.pending += 1,
                    ApprovalStatus::Approved => counts.approved += 1,
                    ApprovalStatus::Rejected => counts.rejected += 1,
                }
                counts
            })
    }

    pub fn get(&self, filter: StatusFilter) -> usize {
        match filter {
            StatusFilter::All => self.all,
            StatusFilter::Only(ApprovalStatus::Pending) => self.pending,
            StatusFilter::Only(ApprovalStatus::Approved) => self.approved,
            StatusFilter::Only(ApprovalStatus::Rejected) => self.rejected,
        }
    }
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

pub fn search_projects<'a>(projects: &'a [Project], query: &str) -> Vec<&'a Project> {
    let needle = query.trim().to_lowercase();
    projects
        .iter()
        .filter(|project| {
            needle.is_empty()
                || contains_folded(&project.name, &needle)
                || project
                    .description
                    .as_deref()
                    .is_some_and(|description| contains_folded(description, &needle))
                || project
                    .owner
                    .as_ref()
                    .is_some_and(|owner| contains_folded(&owner.name, &needle))
        })
        .collect()
}

pub fn search_users<'a>(users: &'a [User], query: &str) -> Vec<&'a User> {
    let needle = query.trim().to_lowercase();
    users
        .iter()
        .filter(|user| {
            needle.is_empty()
                || contains_folded(&user.name, &needle)
                || user
                    .email
                    .as_deref()
                    .is_some_and(|email| contains_folded(email, &needle))
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/filter_tests.rs"]
mod tests;
