use std::{collections::HashMap, future::Future, sync::Arc};

use shared::{
    domain::{ApprovalStatus, ProjectId, SubmissionId},
    protocol::{Metrics, Project, Submission, User},
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    api::{AdminApi, ApiResult},
    drafts::{DraftRecord, DraftStore},
    filter::{StatusCounts, StatusFilter},
    slots::{ActionSlots, SlotStatus},
};

const MSG_SUBMISSION_UPDATED: &str = "Submission updated";
const MSG_SUBMISSION_APPROVED: &str = "Submission approved";
const MSG_SUBMISSION_REJECTED: &str = "Submission rejected";
const MSG_PROJECT_RECALCULATED: &str = "Project hours recalculated";
const MSG_PROJECT_DELETED: &str = "Project deleted";

const ERR_UPDATE_SUBMISSION: &str = "Failed to update submission";
const ERR_APPROVE_SUBMISSION: &str = "Failed to approve submission";
const ERR_RECALCULATE_PROJECT: &str = "Failed to recalculate project hours";
const ERR_RECALCULATE_ALL: &str = "Failed to recalculate all projects";
const ERR_DELETE_PROJECT: &str = "Failed to delete project";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DashboardTab {
    #[default]
    Submissions,
    Projects,
    Users,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Submissions,
    Projects,
    Users,
    Metrics,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Submissions,
        Collection::Projects,
        Collection::Users,
        Collection::Metrics,
    ];

    fn load_error(self) -> &'static str {
        match self {
            Collection::Submissions => "Failed to load submissions",
            Collection::Projects => "Failed to load projects",
            Collection::Users => "Failed to load users",
            Collection::Metrics => "Failed to load metrics",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlobalAction {
    RecalculateAll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Completed,
    Failed,
    AlreadyInFlight,
    Missing,
}

impl ActionOutcome {
    pub fn is_completed(self) -> bool {
        self == ActionOutcome::Completed
    }
}

#[derive(Default)]
struct SessionState {
    tab: DashboardTab,
    filter: StatusFilter,
    submissions: Vec<Submission>,
    projects: Vec<Project>,
    users: Vec<User>,
    metrics: Option<Metrics>,
    drafts: DraftStore,
    rows: ActionSlots<SubmissionId>,
    project_actions: ActionSlots<ProjectId>,
    global_actions: ActionSlots<GlobalAction>,
    loads: ActionSlots<Collection>,
    loads_in_flight: HashMap<Collection, usize>,
}

impl SessionState {
    fn submission(&self, id: SubmissionId) -> Option<&Submission> {
        self.submissions.iter().find(|record| record.id == id)
    }

    fn start_load(&mut self, collection: Collection) {
        *self.loads_in_flight.entry(collection).or_default() += 1;
        self.loads.begin(collection);
    }

    fn end_load(&mut self, collection: Collection) -> bool {
        let remaining = self.loads_in_flight.entry(collection).or_default();
        *remaining = remaining.saturating_sub(1);
        if *remaining == 0 {
            self.loads_in_flight.remove(&collection);
            true
        } else {
            false
        }
    }

    fn splice_submission(&mut self, updated: Submission) {
        match self
            .submissions
            .iter_mut()
            .find(|record| record.id == updated.id)
        {
            Some(existing) => *existing = updated,
            None => self.submissions.push(updated),
        }
        self.drafts.fill_missing(&self.submissions);
    }
}

pub struct ReviewSession {
    api: Arc<dyn AdminApi>,
    inner: Mutex<SessionState>,
}

impl ReviewSession {
    pub fn new(api: Arc<dyn AdminApi>) -> Self {
        Self {
            api,
            inner: Mutex::new(SessionState::default()),
        }
    }

    async fn load<T, F>(
        &self,
        collection: Collection,
        fetch: F,
        apply: impl FnOnce(&mut SessionState, T),
    ) -> ActionOutcome
    where
        F: Future<Output = ApiResult<T>>,
    {
        self.inner.lock().await.start_load(collection);
        let result = fetch.await;
        let mut guard = self.inner.lock().await;
        // Only the last of several overlapping loads settles the slot.
        let last = guard.end_load(collection);
        match result {
            Ok(value) => {
                apply(&mut *guard, value);
                if last {
                    guard.loads.finish(collection);
                }
                ActionOutcome::Completed
            }
            Err(err) => {
                warn!(?collection, "load failed: {err}");
                if last {
                    guard
                        .loads
                        .fail(collection, err.user_message(collection.load_error()));
                }
                ActionOutcome::Failed
            }
        }
    }

    pub async fn load_submissions(&self) -> ActionOutcome {
        self.load(
            Collection::Submissions,
            self.api.list_submissions(),
            |state, records| {
                state.drafts.rebuild_all(&records);
                state.submissions = records;
            },
        )
        .await
    }

    pub async fn refresh_submissions(&self) -> ActionOutcome {
        self.load(
            Collection::Submissions,
            self.api.list_submissions(),
            |state, records| {
                state.submissions = records;
                state.drafts.fill_missing(&state.submissions);
            },
        )
        .await
    }

    pub async fn load_projects(&self) -> ActionOutcome {
        self.load(
            Collection::Projects,
            self.api.list_projects(),
            |state, projects| state.projects = projects,
        )
        .await
    }

    pub async fn load_users(&self) -> ActionOutcome {
        self.load(Collection::Users, self.api.list_users(), |state, users| {
            state.users = users
        })
        .await
    }

    pub async fn load_metrics(&self) -> ActionOutcome {
        self.load(Collection::Metrics, self.api.metrics(), |state, metrics| {
            state.metrics = Some(metrics)
        })
        .await
    }

    pub async fn load_dashboard(&self) -> ActionOutcome {
        let outcomes = [
            self.load_submissions().await,
            self.load_projects().await,
            self.load_users().await,
            self.load_metrics().await,
        ];
        if outcomes.iter().all(|outcome| outcome.is_completed()) {
            ActionOutcome::Completed
        } else {
            ActionOutcome::Failed
        }
    }

    pub async fn open_tab(&self, tab: DashboardTab) -> ActionOutcome {
        self.inner.lock().await.tab = tab;
        match tab {
            DashboardTab::Submissions => self.load_submissions().await,
            DashboardTab::Projects => self.load_projects().await,
            DashboardTab::Users => self.load_users().await,
        }
    }

    pub async fn tab(&self) -> DashboardTab {
        self.inner.lock().await.tab
    }

    pub async fn set_filter(&self, filter: StatusFilter) {
        self.inner.lock().await.filter = filter;
    }

    pub async fn filter(&self) -> StatusFilter {
        self.inner.lock().await.filter
    }

    pub async fn submissions(&self) -> Vec<Submission> {
        self.inner.lock().await.submissions.clone()
    }

    pub async fn visible_submissions(&self) -> Vec<Submission> {
        let guard = self.inner.lock().await;
        guard
            .filter
            .apply(&guard.submissions)
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn status_counts(&self) -> StatusCounts {
        StatusCounts::tally(&self.inner.lock().await.submissions)
    }

    pub async fn projects(&self) -> Vec<Project> {
        self.inner.lock().await.projects.clone()
    }

    pub async fn users(&self) -> Vec<User> {
        self.inner.lock().await.users.clone()
    }

    pub async fn metrics(&self) -> Option<Metrics> {
        self.inner.lock().await.metrics.clone()
    }

    pub async fn draft(&self, id: SubmissionId) -> Option<DraftRecord> {
        self.inner.lock().await.drafts.get(id).cloned()
    }

    pub async fn is_dirty(&self, id: SubmissionId) -> bool {
        let guard = self.inner.lock().await;
        guard
            .submission(id)
            .is_some_and(|record| guard.drafts.is_dirty(record))
    }

    pub async fn edit_draft(&self, id: SubmissionId, edit: impl FnOnce(&mut DraftRecord)) -> bool {
        self.inner.lock().await.drafts.edit(id, edit)
    }

    pub async fn reset_draft(&self, id: SubmissionId) -> ActionOutcome {
        let mut guard = self.inner.lock().await;
        let Some(record) = guard.submission(id).cloned() else {
            return ActionOutcome::Missing;
        };
        guard.drafts.reset_one(&record);
        guard.rows.clear(id);
        ActionOutcome::Completed
    }

    pub async fn row_status(&self, id: SubmissionId) -> SlotStatus {
        self.inner.lock().await.rows.status(id)
    }

    pub async fn project_status(&self, id: ProjectId) -> SlotStatus {
        self.inner.lock().await.project_actions.status(id)
    }

    pub async fn global_status(&self, action: GlobalAction) -> SlotStatus {
        self.inner.lock().await.global_actions.status(action)
    }

    pub async fn load_status(&self, collection: Collection) -> SlotStatus {
        self.inner.lock().await.loads.status(collection)
    }

    pub async fn page_error(&self) -> Option<String> {
        let guard = self.inner.lock().await;
        Collection::ALL
            .iter()
            .find_map(|collection| guard.loads.status(*collection).error().map(str::to_string))
    }

    pub async fn commit(&self, id: SubmissionId) -> ActionOutcome {
        self.commit_with_message(id, MSG_SUBMISSION_UPDATED).await
    }

    async fn commit_with_message(&self, id: SubmissionId, success: &str) -> ActionOutcome {
        let payload = {
            let mut guard = self.inner.lock().await;
            if guard.rows.is_busy(id) {
                return ActionOutcome::AlreadyInFlight;
            }
            let Some(payload) = guard.drafts.payload(id) else {
                return ActionOutcome::Missing;
            };
            guard.rows.begin(id);
            payload
        };

        debug!(
            submission_id = id.0,
            status = %payload.approval_status,
            "committing submission draft"
        );
        match self.api.update_submission(id, &payload).await {
            Ok(updated) => {
                {
                    let mut guard = self.inner.lock().await;
                    guard.splice_submission(updated);
                    guard.rows.succeed(id, success);
                }
                info!(submission_id = id.0, "submission updated");
                self.load_submissions().await;
                self.load_metrics().await;
                ActionOutcome::Completed
            }
            Err(err) => {
                warn!(submission_id = id.0, "submission update failed: {err}");
                self.inner
                    .lock()
                    .await
                    .rows
                    .fail(id, err.user_message(ERR_UPDATE_SUBMISSION));
                ActionOutcome::Failed
            }
        }
    }

    pub async fn quick_approve(&self, id: SubmissionId) -> ActionOutcome {
        let justification = {
            let mut guard = self.inner.lock().await;
            if guard.rows.is_busy(id) {
                return ActionOutcome::AlreadyInFlight;
            }
            if guard.submission(id).is_none() {
                return ActionOutcome::Missing;
            }
            guard.rows.begin(id);
            guard
                .drafts
                .get(id)
                .map(|draft| draft.hours_justification.clone())
                .filter(|justification| !justification.is_empty())
        };

        match self.api.quick_approve(id, justification).await {
            Ok(()) => {
                self.inner
                    .lock()
                    .await
                    .rows
                    .succeed(id, MSG_SUBMISSION_APPROVED);
                info!(submission_id = id.0, "submission approved");
                self.load_submissions().await;
                self.load_metrics().await;
                ActionOutcome::Completed
            }
            Err(err) => {
                warn!(submission_id = id.0, "quick approve failed: {err}");
                self.inner
                    .lock()
                    .await
                    .rows
                    .fail(id, err.user_message(ERR_APPROVE_SUBMISSION));
                ActionOutcome::Failed
            }
        }
    }

    /// Rejects with zero hours. Local edits to the row are discarded first,
    /// so only the canonical justification travels with the denial.
    pub async fn quick_deny(&self, id: SubmissionId) -> ActionOutcome {
        {
            let mut guard = self.inner.lock().await;
            if guard.rows.is_busy(id) {
                return ActionOutcome::AlreadyInFlight;
            }
            let Some(record) = guard.submission(id).cloned() else {
                return ActionOutcome::Missing;
            };
            guard.drafts.reset_one(&record);
            guard.drafts.edit(id, |draft| {
                draft.approval_status = ApprovalStatus::Rejected;
                draft.approved_hours = "0".to_string();
            });
        }
        self.commit_with_message(id, MSG_SUBMISSION_REJECTED).await
    }

    pub async fn recalculate_project(&self, id: ProjectId) -> ActionOutcome {
        if !self.inner.lock().await.project_actions.begin(id) {
            return ActionOutcome::AlreadyInFlight;
        }

        match self.api.recalculate_project(id).await {
            Ok(project) => {
                {
                    let mut guard = self.inner.lock().await;
                    if let Some(existing) = guard.projects.iter_mut().find(|p| p.id == id) {
                        *existing = project;
                    }
                    guard
                        .project_actions
                        .succeed(id, MSG_PROJECT_RECALCULATED);
                }
                info!(project_id = id.0, "project hours recalculated");
                self.load_projects().await;
                self.refresh_submissions().await;
                self.load_metrics().await;
                ActionOutcome::Completed
            }
            Err(err) => {
                warn!(project_id = id.0, "project recalculation failed: {err}");
                self.inner
                    .lock()
                    .await
                    .project_actions
                    .fail(id, err.user_message(ERR_RECALCULATE_PROJECT));
                ActionOutcome::Failed
            }
        }
    }

    pub async fn recalculate_all(&self) -> ActionOutcome {
        let action = GlobalAction::RecalculateAll;
        if !self.inner.lock().await.global_actions.begin(action) {
            return ActionOutcome::AlreadyInFlight;
        }

        match self.api.recalculate_all().await {
            Ok(updated) => {
                self.inner
                    .lock()
                    .await
                    .global_actions
                    .succeed(action, format!("Recalculated hours for {updated} projects"));
                info!(updated, "all project hours recalculated");
                self.load_projects().await;
                self.refresh_submissions().await;
                self.load_metrics().await;
                ActionOutcome::Completed
            }
            Err(err) => {
                warn!("bulk recalculation failed: {err}");
                self.inner
                    .lock()
                    .await
                    .global_actions
                    .fail(action, err.user_message(ERR_RECALCULATE_ALL));
                ActionOutcome::Failed
            }
        }
    }

    pub async fn delete_project(&self, id: ProjectId) -> ActionOutcome {
        if !self.inner.lock().await.project_actions.begin(id) {
            return ActionOutcome::AlreadyInFlight;
        }

        match self.api.delete_project(id).await {
            Ok(()) => {
                {
                    let mut guard = self.inner.lock().await;
                    guard.projects.retain(|project| project.id != id);
                    guard.project_actions.succeed(id, MSG_PROJECT_DELETED);
                }
                info!(project_id = id.0, "project deleted");
                self.load_projects().await;
                self.refresh_submissions().await;
                self.load_metrics().await;
                ActionOutcome::Completed
            }
            Err(err) => {
                warn!(project_id = id.0, "project deletion failed: {err}");
                self.inner
                    .lock()
                    .await
                    .project_actions
                    .fail(id, err.user_message(ERR_DELETE_PROJECT));
                ActionOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
