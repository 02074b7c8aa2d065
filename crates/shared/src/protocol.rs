use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    ApprovalStatus, ProjectContext, ProjectId, SubmissionId, UserId, UserRole, UserSummary,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: SubmissionId,
    pub approval_status: ApprovalStatus,
    #[serde(default)]
    pub approved_hours: Option<f64>,
    #[serde(default)]
    pub hours_justification: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectContext>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
}

impl Submission {
    pub fn computed_hours(&self) -> Option<f64> {
        self.project.as_ref().and_then(|project| project.computed_hours)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<UserSummary>,
    #[serde(default)]
    pub computed_hours: Option<f64>,
    #[serde(default)]
    pub approved_hours: Option<f64>,
    #[serde(default)]
    pub submission_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub project_count: u32,
    #[serde(default)]
    pub approved_hours: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Metrics {
    pub total_users: u64,
    pub total_projects: u64,
    pub total_submissions: u64,
    pub pending_submissions: u64,
    pub total_approved_hours: f64,
    pub total_computed_hours: f64,
}

/// Payload of `PATCH /api/admin/submissions/{id}`. Absent values are sent
/// as explicit `null`s. A NaN hour value also serializes as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubmissionRequest {
    pub approval_status: ApprovalStatus,
    pub approved_hours: Option<f64>,
    pub hours_justification: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickApproveRequest {
    pub hours_justification: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecalculateAllResponse {
    pub updated: u64,
}
