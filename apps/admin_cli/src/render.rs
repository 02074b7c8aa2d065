use review_client::{DraftRecord, SlotStatus, StatusCounts};
use shared::protocol::{Metrics, Project, Submission, User};

fn hours(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.1}"))
}

pub fn submission_line(record: &Submission, draft: Option<&DraftRecord>) -> String {
    let project = record
        .project
        .as_ref()
        .map_or("-", |project| project.name.as_str());
    let user = record.user.as_ref().map_or("-", |user| user.name.as_str());
    let draft_hours = draft.map_or("", |draft| draft.approved_hours.as_str());
    format!(
        "#{:<6} {:<9} project={project} user={user} approved={} computed={} draft_hours={draft_hours}",
        record.id,
        record.approval_status,
        hours(record.approved_hours),
        hours(record.computed_hours()),
    )
}

pub fn counts_line(counts: &StatusCounts) -> String {
    format!(
        "all={} pending={} approved={} rejected={}",
        counts.all, counts.pending, counts.approved, counts.rejected
    )
}

pub fn project_line(project: &Project) -> String {
    let owner = project.owner.as_ref().map_or("-", |owner| owner.name.as_str());
    format!(
        "#{:<6} {} owner={owner} computed={} approved={} submissions={}",
        project.id,
        project.name,
        hours(project.computed_hours),
        hours(project.approved_hours),
        project.submission_count,
    )
}

pub fn user_line(user: &User) -> String {
    format!(
        "#{:<6} {} <{}> role={} projects={} approved_hours={:.1}",
        user.id,
        user.name,
        user.email.as_deref().unwrap_or("-"),
        user.role,
        user.project_count,
        user.approved_hours,
    )
}

pub fn metrics_lines(metrics: &Metrics) -> Vec<String> {
    vec![
        format!("users:               {}", metrics.total_users),
        format!("projects:            {}", metrics.total_projects),
        format!("submissions:         {}", metrics.total_submissions),
        format!("pending submissions: {}", metrics.pending_submissions),
        format!("approved hours:      {:.1}", metrics.total_approved_hours),
        format!("computed hours:      {:.1}", metrics.total_computed_hours),
    ]
}

pub fn slot_line(status: &SlotStatus) -> Option<String> {
    status
        .error()
        .map(|message| format!("error: {message}"))
        .or_else(|| status.success().map(|message| format!("ok: {message}")))
}
