use super::*;
use shared::domain::{ProjectId, SubmissionId, UserId, UserRole, UserSummary};

fn submission(id: i64, status: ApprovalStatus) -> Submission {
    Submission {
        id: SubmissionId(id),
        approval_status: status,
        approved_hours: None,
        hours_justification: None,
        project: None,
        user: None,
        submitted_at: None,
    }
}

fn project(id: i64, name: &str, owner: &str) -> Project {
    Project {
        id: ProjectId(id),
        name: name.to_string(),
        description: Some(format!("{name} built with rust")),
        owner: Some(UserSummary {
            id: UserId(id),
            name: owner.to_string(),
            email: None,
        }),
        computed_hours: None,
        approved_hours: None,
        submission_count: 0,
        created_at: None,
    }
}

fn user(id: i64, name: &str, email: &str) -> User {
    User {
        id: UserId(id),
        name: name.to_string(),
        email: Some(email.to_string()),
        role: UserRole::User,
        project_count: 0,
        approved_hours: 0.0,
        created_at: None,
    }
}

#[test]
fn counts_partition_the_collection() {
    let statuses = [
        ApprovalStatus::Pending,
        ApprovalStatus::Approved,
        ApprovalStatus::Pending,
        ApprovalStatus::Rejected,
        ApprovalStatus::Approved,
        ApprovalStatus::Pending,
    ];
    let records: Vec<_> = statuses
        .iter()
        .enumerate()
        .map(|(index, status)| submission(index as i64, *status))
        .collect();

    let counts = StatusCounts::tally(&records);
    assert_eq!(counts.all, records.len());
    assert_eq!(counts.pending + counts.approved + counts.rejected, counts.all);
    assert_eq!(counts.pending, 3);
    assert_eq!(counts.approved, 2);
    assert_eq!(counts.rejected, 1);
    assert_eq!(StatusCounts::tally(&[]), StatusCounts::default());
}

#[test]
fn filter_counts_agree_with_filtered_lists() {
    let records = vec![
        submission(1, ApprovalStatus::Pending),
        submission(2, ApprovalStatus::Rejected),
        submission(3, ApprovalStatus::Pending),
    ];
    let counts = StatusCounts::tally(&records);
    for filter in [
        StatusFilter::All,
        StatusFilter::Only(ApprovalStatus::Pending),
        StatusFilter::Only(ApprovalStatus::Approved),
        StatusFilter::Only(ApprovalStatus::Rejected),
    ] {
        assert_eq!(filter.apply(&records).len(), counts.get(filter), "{filter}");
    }
}

#[test]
fn parses_filters() {
    assert_eq!("all".parse::<StatusFilter>().expect("filter"), StatusFilter::All);
    assert_eq!(
        "pending".parse::<StatusFilter>().expect("filter"),
        StatusFilter::Only(ApprovalStatus::Pending)
    );
    assert!("done".parse::<StatusFilter>().is_err());
}

#[test]
fn project_search_matches_name_description_and_owner() {
    let projects = vec![
        project(1, "Desk Lamp", "ada"),
        project(2, "Weather Station", "grace"),
    ];
    let ids = |query: &str| {
        search_projects(&projects, query)
            .into_iter()
            .map(|project| project.id.0)
            .collect::<Vec<_>>()
    };
    assert_eq!(ids("lamp"), vec![1]);
    assert_eq!(ids("GRACE"), vec![2]);
    assert_eq!(ids("rust"), vec![1, 2]);
    assert_eq!(ids("  "), vec![1, 2]);
    assert!(ids("zeppelin").is_empty());
}

#[test]
fn user_search_matches_name_and_email() {
    let users = vec![
        user(1, "Ada", "ada@example.com"),
        user(2, "Grace", "hopper@example.org"),
    ];
    let found = search_users(&users, "hopper");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, UserId(2));
    assert_eq!(search_users(&users, "example").len(), 2);
}
