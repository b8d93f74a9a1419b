use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::info;

use crate::error::{Error, Result};
use crate::forms::job_form::{FormMode, JobForm};
use crate::models::filter::{FilterState, JobFilter, SortKey};
use crate::models::job::{Job, JobType};
use crate::services::confirm_service::Confirmer;
use crate::services::filter_service::FilterService;
use crate::services::job_api_service::JobApiService;
use crate::services::job_list_service::{JobListService, ListedJob, LoadingTracker, RefreshOutcome};
use crate::services::toast_service::ToastService;
use crate::AppState;

pub const DELETE_CONFIRMATION: &str = "Are you sure you want to delete this job?";

/// What a front end needs to draw the board.
#[derive(Debug, Clone)]
pub struct BoardView {
    pub filters: FilterState,
    /// Jobs passing the search term, in server order.
    pub jobs: Vec<ListedJob>,
    pub total: usize,
    pub error: Option<String>,
    pub loading: bool,
}

/// Ties the filter bar, the job list and the API together, with toasts and
/// confirmation supplied by the caller.
pub struct BoardService<C> {
    api: JobApiService,
    toasts: ToastService,
    confirm: C,
    filters: Mutex<FilterService>,
    list: Arc<Mutex<JobListService>>,
    loading: LoadingTracker,
    highlight_duration: Duration,
    highlight_task: Mutex<Option<JoinHandle<()>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn failure_message(err: &Error, fallback: &str) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}

impl<C: Confirmer> BoardService<C> {
    pub fn new(state: AppState, confirm: C) -> Self {
        Self {
            api: state.api,
            toasts: state.toasts,
            confirm,
            filters: Mutex::new(FilterService::new()),
            list: Arc::new(Mutex::new(JobListService::new())),
            loading: LoadingTracker::new(),
            highlight_duration: state.highlight_duration,
            highlight_task: Mutex::new(None),
        }
    }

    pub fn toasts(&self) -> &ToastService {
        &self.toasts
    }

    pub fn confirmer(&self) -> &C {
        &self.confirm
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    pub fn filters(&self) -> FilterState {
        lock(&self.filters).state().clone()
    }

    pub fn view(&self) -> BoardView {
        let filters = lock(&self.filters).clone();
        let list = lock(&self.list);
        let jobs: Vec<ListedJob> = list
            .jobs()
            .iter()
            .filter(|l| filters.matches(&l.job))
            .cloned()
            .collect();

        BoardView {
            filters: filters.state().clone(),
            jobs,
            total: list.jobs().len(),
            error: list.error().map(ToString::to_string),
            loading: self.loading.is_loading(),
        }
    }

    pub fn job(&self, id: &str) -> Option<Job> {
        lock(&self.list).get(id).cloned()
    }

    /// Fetches with the current filters.
    pub async fn load(&self) -> RefreshOutcome {
        let filter = lock(&self.filters).server_filter();
        self.refresh(filter).await
    }

    pub fn set_search_term(&self, term: impl Into<String>) {
        lock(&self.filters).set_search_term(term);
    }

    /// Returns `None` when the value did not change and nothing was fetched.
    pub async fn set_location(&self, location: impl Into<String>) -> Option<RefreshOutcome> {
        let filter = lock(&self.filters).set_location(location)?;
        Some(self.refresh(filter).await)
    }

    pub async fn set_job_type(&self, job_type: Option<JobType>) -> Option<RefreshOutcome> {
        let filter = lock(&self.filters).set_job_type(job_type)?;
        Some(self.refresh(filter).await)
    }

    pub async fn set_sort(&self, sort: SortKey) -> Option<RefreshOutcome> {
        let filter = lock(&self.filters).set_sort(sort)?;
        Some(self.refresh(filter).await)
    }

    /// Sets every filter field at once and fetches once if a server-backed
    /// field changed.
    pub async fn apply_filters(&self, state: FilterState) -> Option<RefreshOutcome> {
        let filter = lock(&self.filters).replace(state)?;
        Some(self.refresh(filter).await)
    }

    pub async fn clear_filters(&self) -> RefreshOutcome {
        let filter = lock(&self.filters).clear();
        self.refresh(filter).await
    }

    async fn refresh(&self, filter: JobFilter) -> RefreshOutcome {
        let ticket = lock(&self.list).begin_refresh(filter);
        let result = {
            let _loading = self.loading.start();
            self.api.list_jobs(&ticket.filter).await
        };
        lock(&self.list).complete_refresh(ticket, result)
    }

    /// Loads a single job from the server, e.g. to seed an edit form.
    pub async fn fetch_job(&self, id: &str) -> Result<Job> {
        let _loading = self.loading.start();
        self.api.get_job(id).await
    }

    /// Edit form for a job in the current list.
    pub fn edit_form(&self, id: &str) -> Option<JobForm> {
        self.job(id).map(|job| JobForm::edit(&job))
    }

    /// Sends an add or edit form. Validation failures stay with the form and
    /// never reach the network; request failures leave the list untouched and
    /// raise an error toast.
    pub async fn submit(&self, form: &mut JobForm) -> Result<Job> {
        let draft = form.begin_submit()?;
        let mode = form.mode().clone();

        let result = {
            let _loading = self.loading.start();
            match &mode {
                FormMode::Add => self.api.create_job(&draft).await,
                FormMode::Edit { id } => self.api.update_job(id, &draft).await,
            }
        };
        form.finish_submit(result.as_ref());

        match (&mode, &result) {
            (FormMode::Add, Ok(job)) => {
                self.insert_highlighted(job.clone());
                self.toasts.success("Job added successfully");
            }
            (FormMode::Edit { .. }, Ok(job)) => {
                lock(&self.list).replace(job.clone());
                self.toasts.success("Job updated");
            }
            (FormMode::Add, Err(err)) => {
                self.toasts.error(failure_message(err, "Failed to add job"));
            }
            (FormMode::Edit { .. }, Err(err)) => {
                self.toasts.error(failure_message(err, "Failed to update job"));
            }
        }
        result
    }

    /// Deletes after the user confirms. `Ok(false)` means they declined and
    /// nothing was sent.
    pub async fn delete_job(&self, id: &str) -> Result<bool> {
        if !self.confirm.confirm(DELETE_CONFIRMATION).await {
            info!(job_id = %id, "Delete cancelled");
            return Ok(false);
        }

        let result = {
            let _loading = self.loading.start();
            self.api.delete_job(id).await
        };

        match result {
            Ok(()) => {
                lock(&self.list).remove(id);
                self.toasts.success("Job deleted");
                Ok(true)
            }
            Err(err) => {
                self.toasts.error(failure_message(&err, "Failed to delete job"));
                Err(err)
            }
        }
    }

    fn insert_highlighted(&self, job: Job) {
        let delay = self.highlight_duration;
        lock(&self.list).insert_highlighted(job, Instant::now() + delay);

        let list = Arc::clone(&self.list);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            lock(&list).clear_highlights();
        });
        if let Some(previous) = lock(&self.highlight_task).replace(handle) {
            previous.abort();
        }
    }
}

impl<C> Drop for BoardService<C> {
    fn drop(&mut self) {
        if let Some(task) = lock(&self.highlight_task).take() {
            task.abort();
        }
    }
}
