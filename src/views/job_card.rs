use chrono::{DateTime, Utc};
use std::fmt::Write as _;
use tokio::time::Instant;

use crate::models::job::Job;
use crate::services::board_service::BoardView;
use crate::utils::time::posted_label;

pub const EMPTY_STATE: &str = "No jobs found. Adjust search or filters.";
pub const LOADING: &str = "Loading jobs...";

pub fn render_card(job: &Job, highlighted: bool, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    let marker = if highlighted { "* " } else { "" };
    let _ = writeln!(out, "{}{}  [{}]", marker, job.title, job.id);
    let _ = writeln!(out, "  {}", job.company);
    let _ = writeln!(out, "  {} • {}", job.location, job.job_type);
    if let Some(salary) = &job.salary {
        let _ = writeln!(out, "  {}", salary);
    }
    let posted = posted_label(&job.posted_date, now);
    if !posted.is_empty() {
        let _ = writeln!(out, "  Posted: {}", posted);
    }
    if !job.tags.is_empty() {
        let _ = writeln!(out, "  Tags: {}", job.tags.join(" | "));
    }
    if let Some(url) = &job.url {
        let _ = writeln!(out, "  {}", url);
    }
    out
}

pub fn render_board(view: &BoardView, now: DateTime<Utc>, clock: Instant) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} Positions Available", view.jobs.len());
    let _ = writeln!(out);

    if view.loading {
        let _ = writeln!(out, "{}", LOADING);
        return out;
    }
    if let Some(error) = &view.error {
        let _ = writeln!(out, "{}", error);
        return out;
    }
    if view.jobs.is_empty() {
        let _ = writeln!(out, "{}", EMPTY_STATE);
        return out;
    }

    let cards: Vec<String> = view
        .jobs
        .iter()
        .map(|l| render_card(&l.job, l.is_highlighted(clock), now))
        .collect();
    out.push_str(&cards.join("\n"));
    out
}
