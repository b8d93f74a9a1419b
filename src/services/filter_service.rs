use crate::models::filter::{FilterState, JobFilter, SortKey};
use crate::models::job::{Job, JobType};

/// Filter bar state. Setters on server-backed fields hand back the filter to
/// fetch with when the value actually changed; the search term is applied
/// locally and never asks for a fetch.
#[derive(Debug, Clone, Default)]
pub struct FilterService {
    state: FilterState,
}

impl FilterService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: FilterState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn server_filter(&self) -> JobFilter {
        self.state.server_filter()
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.state.search_term = term.into();
    }

    pub fn set_location(&mut self, location: impl Into<String>) -> Option<JobFilter> {
        let location = location.into().trim().to_string();
        if self.state.location == location {
            return None;
        }
        self.state.location = location;
        Some(self.server_filter())
    }

    pub fn set_job_type(&mut self, job_type: Option<JobType>) -> Option<JobFilter> {
        if self.state.job_type == job_type {
            return None;
        }
        self.state.job_type = job_type;
        Some(self.server_filter())
    }

    pub fn set_sort(&mut self, sort: SortKey) -> Option<JobFilter> {
        if self.state.sort == sort {
            return None;
        }
        self.state.sort = sort;
        Some(self.server_filter())
    }

    /// Replaces every field in one step. Asks for a fetch when a
    /// server-backed field differs.
    pub fn replace(&mut self, mut state: FilterState) -> Option<JobFilter> {
        state.location = state.location.trim().to_string();
        let changed = self.state.server_filter() != state.server_filter();
        self.state = state;
        changed.then(|| self.server_filter())
    }

    /// Resets all four fields at once. Always asks for exactly one fetch.
    pub fn clear(&mut self) -> JobFilter {
        self.state = FilterState::default();
        self.server_filter()
    }

    pub fn matches(&self, job: &Job) -> bool {
        job.matches_search(&self.state.search_term)
    }
}
