use std::{path::PathBuf, sync::Arc};

use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand};
use review_client::{
    search_projects, search_users, ActionOutcome, GlobalAction, HttpAdminApi, ReviewSession,
    SlotStatus, StatusFilter,
};
use shared::domain::{ApprovalStatus, ProjectId, SubmissionId};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod render;

#[derive(Parser, Debug)]
#[command(about = "Review project submissions and their hour claims")]
struct Args {
    /// Overrides the server url from the config file and environment.
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List submissions with their current drafts.
    Submissions {
        #[arg(long, default_value = "all")]
        status: StatusFilter,
    },
    /// Edit a submission's review fields and save them.
    Review {
        id: i64,
        #[arg(long)]
        status: Option<ApprovalStatus>,
        /// Approved hours; pass an empty string to clear them.
        #[arg(long)]
        hours: Option<String>,
        #[arg(long)]
        justification: Option<String>,
    },
    /// Approve a submission in one step.
    Approve {
        id: i64,
        #[arg(long)]
        justification: Option<String>,
    },
    /// Reject a submission with zero hours.
    Deny { id: i64 },
    Projects {
        #[arg(long)]
        search: Option<String>,
    },
    Users {
        #[arg(long)]
        search: Option<String>,
    },
    Metrics,
    /// Recompute tracked hours for one project or for all of them.
    Recalculate {
        #[arg(long, conflicts_with = "all", required_unless_present = "all")]
        project: Option<i64>,
        #[arg(long)]
        all: bool,
    },
    DeleteProject { id: i64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
    let args = Args::parse();

    let mut settings = config::load_settings(args.config.as_deref())?;
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }
    info!(server_url = %settings.server_url, "using admin api");

    let api = HttpAdminApi::new(&settings.server_url, settings.request_timeout())?;
    let session = ReviewSession::new(Arc::new(api));
    run(&session, args.command).await
}

async fn run(session: &ReviewSession, command: Command) -> Result<()> {
    match command {
        Command::Submissions { status } => {
            ensure_loaded(session, session.load_submissions().await).await?;
            session.set_filter(status).await;
            for record in session.visible_submissions().await {
                let draft = session.draft(record.id).await;
                println!("{}", render::submission_line(&record, draft.as_ref()));
            }
            println!("{}", render::counts_line(&session.status_counts().await));
        }
        Command::Review {
            id,
            status,
            hours,
            justification,
        } => {
            let id = SubmissionId(id);
            ensure_loaded(session, session.load_submissions().await).await?;
            let found = session
                .edit_draft(id, |draft| {
                    if let Some(status) = status {
                        draft.approval_status = status;
                    }
                    if let Some(hours) = hours {
                        draft.approved_hours = hours;
                    }
                    if let Some(justification) = justification {
                        draft.hours_justification = justification;
                    }
                })
                .await;
            if !found {
                bail!("submission {id} not found");
            }
            let outcome = session.commit(id).await;
            report(outcome, session.row_status(id).await, &format!("submission {id}"))?;
            print_submission(session, id).await;
        }
        Command::Approve { id, justification } => {
            let id = SubmissionId(id);
            ensure_loaded(session, session.load_submissions().await).await?;
            if let Some(justification) = justification {
                session
                    .edit_draft(id, |draft| draft.hours_justification = justification)
                    .await;
            }
            let outcome = session.quick_approve(id).await;
            report(outcome, session.row_status(id).await, &format!("submission {id}"))?;
            print_submission(session, id).await;
        }
        Command::Deny { id } => {
            let id = SubmissionId(id);
            ensure_loaded(session, session.load_submissions().await).await?;
            let outcome = session.quick_deny(id).await;
            report(outcome, session.row_status(id).await, &format!("submission {id}"))?;
            print_submission(session, id).await;
        }
        Command::Projects { search } => {
            ensure_loaded(session, session.load_projects().await).await?;
            let projects = session.projects().await;
            for project in search_projects(&projects, search.as_deref().unwrap_or_default()) {
                println!("{}", render::project_line(project));
            }
        }
        Command::Users { search } => {
            ensure_loaded(session, session.load_users().await).await?;
            let users = session.users().await;
            for user in search_users(&users, search.as_deref().unwrap_or_default()) {
                println!("{}", render::user_line(user));
            }
        }
        Command::Metrics => {
            ensure_loaded(session, session.load_metrics().await).await?;
            if let Some(metrics) = session.metrics().await {
                for line in render::metrics_lines(&metrics) {
                    println!("{line}");
                }
            }
        }
        Command::Recalculate { project, all } => {
            if all {
                let outcome = session.recalculate_all().await;
                report(
                    outcome,
                    session.global_status(GlobalAction::RecalculateAll).await,
                    "bulk recalculation",
                )?;
            } else if let Some(project) = project {
                let id = ProjectId(project);
                ensure_loaded(session, session.load_projects().await).await?;
                let outcome = session.recalculate_project(id).await;
                report(outcome, session.project_status(id).await, &format!("project {id}"))?;
            }
        }
        Command::DeleteProject { id } => {
            let id = ProjectId(id);
            let outcome = session.delete_project(id).await;
            report(outcome, session.project_status(id).await, &format!("project {id}"))?;
        }
    }
    Ok(())
}

async fn ensure_loaded(session: &ReviewSession, outcome: ActionOutcome) -> Result<()> {
    if outcome.is_completed() {
        return Ok(());
    }
    let message = session
        .page_error()
        .await
        .unwrap_or_else(|| "load failed".to_string());
    Err(anyhow!(message))
}

fn report(outcome: ActionOutcome, status: SlotStatus, subject: &str) -> Result<()> {
    match outcome {
        ActionOutcome::Completed => {
            if let Some(line) = render::slot_line(&status) {
                println!("{line}");
            }
            Ok(())
        }
        ActionOutcome::Failed => Err(anyhow!(status
            .error()
            .unwrap_or("request failed")
            .to_string())),
        ActionOutcome::AlreadyInFlight => Err(anyhow!("{subject} is already being updated")),
        ActionOutcome::Missing => Err(anyhow!("{subject} not found")),
    }
}

async fn print_submission(session: &ReviewSession, id: SubmissionId) {
    let submissions = session.submissions().await;
    if let Some(record) = submissions.iter().find(|record| record.id == id) {
        let draft = session.draft(id).await;
        println!("{}", render::submission_line(record, draft.as_ref()));
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
