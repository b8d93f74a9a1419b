use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::error::Result;
use crate::models::filter::JobFilter;
use crate::models::job::Job;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedJob {
    pub job: Job,
    pub highlight_until: Option<Instant>,
}

impl ListedJob {
    pub fn new(job: Job) -> Self {
        Self {
            job,
            highlight_until: None,
        }
    }

    pub fn is_highlighted(&self, now: Instant) -> bool {
        self.highlight_until.is_some_and(|until| until > now)
    }
}

/// Issued when a fetch starts; the response is applied only if no newer
/// ticket has been issued since.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTicket {
    pub generation: u64,
    pub filter: JobFilter,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied { count: usize },
    Failed { message: String },
    Stale,
}

/// Jobs for the current view plus the last fetch error.
#[derive(Debug, Default)]
pub struct JobListService {
    jobs: Vec<ListedJob>,
    error: Option<String>,
    latest_generation: u64,
    applied_filter: Option<JobFilter>,
}

impl JobListService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn jobs(&self) -> &[ListedJob] {
        &self.jobs
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Filter the current list was fetched with.
    pub fn applied_filter(&self) -> Option<&JobFilter> {
        self.applied_filter.as_ref()
    }

    pub fn get(&self, id: &str) -> Option<&Job> {
        self.jobs.iter().map(|l| &l.job).find(|j| j.id == id)
    }

    pub fn begin_refresh(&mut self, filter: JobFilter) -> RefreshTicket {
        self.latest_generation += 1;
        RefreshTicket {
            generation: self.latest_generation,
            filter,
        }
    }

    pub fn complete_refresh(&mut self, ticket: RefreshTicket, result: Result<Vec<Job>>) -> RefreshOutcome {
        if ticket.generation != self.latest_generation {
            debug!(
                generation = ticket.generation,
                latest = self.latest_generation,
                filter = ?ticket.filter,
                "Discarding stale job list response"
            );
            return RefreshOutcome::Stale;
        }

        match result {
            Ok(jobs) => {
                self.jobs = dedup_by_id(jobs).into_iter().map(ListedJob::new).collect();
                self.error = None;
                self.applied_filter = Some(ticket.filter);
                RefreshOutcome::Applied {
                    count: self.jobs.len(),
                }
            }
            Err(err) => {
                let message = err.to_string();
                warn!(error = %message, filter = ?ticket.filter, "Failed to load jobs");
                self.error = Some(message.clone());
                RefreshOutcome::Failed { message }
            }
        }
    }

    /// Puts a freshly created job at the front, highlighted until `until`.
    pub fn insert_highlighted(&mut self, job: Job, until: Instant) {
        self.jobs.retain(|l| l.job.id != job.id);
        self.jobs.insert(
            0,
            ListedJob {
                job,
                highlight_until: Some(until),
            },
        );
    }

    /// Swaps in the updated job by id. Jobs not in the list are not added.
    pub fn replace(&mut self, job: Job) -> bool {
        match self.jobs.iter_mut().find(|l| l.job.id == job.id) {
            Some(listed) => {
                listed.job = job;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.jobs.len();
        self.jobs.retain(|l| l.job.id != id);
        self.jobs.len() != before
    }

    pub fn clear_highlights(&mut self) {
        for listed in &mut self.jobs {
            listed.highlight_until = None;
        }
    }
}

fn dedup_by_id(jobs: Vec<Job>) -> Vec<Job> {
    let mut seen = std::collections::HashSet::new();
    let total = jobs.len();
    let unique: Vec<Job> = jobs.into_iter().filter(|j| seen.insert(j.id.clone())).collect();
    if unique.len() != total {
        warn!(dropped = total - unique.len(), "Server returned duplicate job ids");
    }
    unique
}

/// Count of API calls in flight. `is_loading` is true while any guard lives.
#[derive(Debug, Clone, Default)]
pub struct LoadingTracker {
    in_flight: Arc<AtomicUsize>,
}

impl LoadingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&self) -> LoadingGuard {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        LoadingGuard {
            in_flight: self.in_flight.clone(),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub struct LoadingGuard {
    in_flight: Arc<AtomicUsize>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}
