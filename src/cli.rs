use clap::{Args, Parser, Subcommand};
use std::future::Future;

use crate::forms::job_form::{JobForm, JobFormFields};
use crate::models::filter::{FilterState, SortKey};
use crate::models::job::JobType;
use crate::services::confirm_service::{Confirmer, TerminalConfirm};

/// job-board - browse and manage job postings
#[derive(Parser, Debug)]
#[command(name = "job-board")]
#[command(version)]
#[command(about = "Browse, post, edit and delete job postings", long_about = None)]
pub struct Cli {
    /// Jobs API base URL (overrides JOB_BOARD_API_BASE)
    #[arg(long = "api-base", global = true)]
    pub api_base: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List jobs, optionally filtered and searched
    List(ListArgs),
    /// Show a single job
    Show {
        id: String,
        /// Print the job as JSON
        #[arg(long)]
        json: bool,
    },
    /// Post a new job
    Add(AddArgs),
    /// Edit an existing job; omitted fields keep their values
    Edit {
        id: String,
        #[command(flatten)]
        fields: EditArgs,
    },
    /// Delete a job after confirmation
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Case-insensitive match on title, company or tag
    #[arg(short = 's', long = "search")]
    pub search: Option<String>,

    #[arg(short = 'l', long = "location")]
    pub location: Option<String>,

    /// Full-Time, Part-Time, Internship or Contract
    #[arg(short = 't', long = "type")]
    pub job_type: Option<JobType>,

    /// newest, oldest, salary_high or salary_low
    #[arg(long = "sort", default_value = "newest")]
    pub sort: SortKey,

    /// Print the visible jobs as a JSON array
    #[arg(long)]
    pub json: bool,
}

impl ListArgs {
    pub fn filter_state(&self) -> FilterState {
        FilterState {
            search_term: self.search.clone().unwrap_or_default(),
            location: self.location.clone().unwrap_or_default(),
            job_type: self.job_type,
            sort: self.sort,
        }
    }
}

#[derive(Args, Debug)]
pub struct AddArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub company: String,
    #[arg(long)]
    pub location: String,
    #[arg(short = 't', long = "type", default_value = "Full-Time")]
    pub job_type: JobType,
    #[arg(long)]
    pub salary: Option<String>,
    /// Comma-separated, e.g. "Pricing, SQL, Python"
    #[arg(long)]
    pub tags: Option<String>,
    #[arg(long)]
    pub url: Option<String>,
}

impl AddArgs {
    pub fn into_form(self) -> JobForm {
        let mut form = JobForm::add();
        form.open();
        form.fields = JobFormFields {
            title: self.title,
            company: self.company,
            location: self.location,
            job_type: self.job_type,
            salary: self.salary.unwrap_or_default(),
            tags: self.tags.unwrap_or_default(),
            url: self.url.unwrap_or_default(),
        };
        form
    }
}

#[derive(Args, Debug, Default)]
pub struct EditArgs {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub company: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(short = 't', long = "type")]
    pub job_type: Option<JobType>,
    #[arg(long)]
    pub salary: Option<String>,
    #[arg(long)]
    pub tags: Option<String>,
    #[arg(long)]
    pub url: Option<String>,
}

impl EditArgs {
    pub fn apply(self, fields: &mut JobFormFields) {
        if let Some(title) = self.title {
            fields.title = title;
        }
        if let Some(company) = self.company {
            fields.company = company;
        }
        if let Some(location) = self.location {
            fields.location = location;
        }
        if let Some(job_type) = self.job_type {
            fields.job_type = job_type;
        }
        if let Some(salary) = self.salary {
            fields.salary = salary;
        }
        if let Some(tags) = self.tags {
            fields.tags = tags;
        }
        if let Some(url) = self.url {
            fields.url = url;
        }
    }
}

/// Terminal confirmation, or an automatic yes for `--yes`.
#[derive(Debug, Clone, Copy)]
pub enum CliConfirm {
    Ask,
    AssumeYes,
}

impl Confirmer for CliConfirm {
    fn confirm(&self, message: &str) -> impl Future<Output = bool> + Send {
        let ask = matches!(self, CliConfirm::Ask);
        let message = message.to_string();
        async move {
            if !ask {
                return true;
            }
            TerminalConfirm.confirm(&message).await
        }
    }
}
