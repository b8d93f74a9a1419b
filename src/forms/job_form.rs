use validator::Validate;

use crate::error::{Error, Result};
use crate::models::job::{Job, JobDraft, JobType};
use crate::utils::tags::{join_tags, split_tags};
use crate::utils::validation::validate;

#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct JobFormFields {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Company is required"))]
    pub company: String,
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,
    pub job_type: JobType,
    pub salary: String,
    /// Comma-separated free text.
    pub tags: String,
    pub url: String,
}

impl JobFormFields {
    fn trimmed(&self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            company: self.company.trim().to_string(),
            location: self.location.trim().to_string(),
            job_type: self.job_type,
            salary: self.salary.trim().to_string(),
            tags: self.tags.trim().to_string(),
            url: self.url.trim().to_string(),
        }
    }

    pub fn to_draft(&self) -> JobDraft {
        let fields = self.trimmed();
        JobDraft {
            title: fields.title,
            company: fields.company,
            location: fields.location,
            job_type: fields.job_type,
            tags: split_tags(&fields.tags),
            salary: Some(fields.salary).filter(|s| !s.is_empty()),
            url: Some(fields.url).filter(|u| !u.is_empty()),
        }
    }
}

impl From<&Job> for JobFormFields {
    fn from(job: &Job) -> Self {
        Self {
            title: job.title.clone(),
            company: job.company.clone(),
            location: job.location.clone(),
            job_type: job.job_type,
            salary: job.salary.clone().unwrap_or_default(),
            tags: join_tags(&job.tags),
            url: job.url.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Add,
    Edit { id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Closed,
    Open,
    Submitting,
}

/// Modal form for adding or editing a job.
///
/// `Closed -> Open -> Submitting -> Closed` on success, or back to `Open`
/// with an error on failure. Closing is allowed in every state; a request
/// already in flight is left to finish.
#[derive(Debug, Clone)]
pub struct JobForm {
    mode: FormMode,
    state: FormState,
    pub fields: JobFormFields,
    error: Option<String>,
}

impl JobForm {
    pub fn add() -> Self {
        Self {
            mode: FormMode::Add,
            state: FormState::Closed,
            fields: JobFormFields::default(),
            error: None,
        }
    }

    /// Edit form pre-filled from `job`, already open.
    pub fn edit(job: &Job) -> Self {
        Self {
            mode: FormMode::Edit { id: job.id.clone() },
            state: FormState::Open,
            fields: JobFormFields::from(job),
            error: None,
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != FormState::Closed
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn open(&mut self) {
        if self.state == FormState::Closed {
            self.state = FormState::Open;
            self.error = None;
        }
    }

    pub fn close(&mut self) {
        self.state = FormState::Closed;
        self.error = None;
    }

    pub fn escape(&mut self) {
        self.close();
    }

    pub fn backdrop_click(&mut self) {
        self.close();
    }

    pub fn validate(&self) -> Result<()> {
        validate(&self.fields.trimmed())?;
        Ok(())
    }

    /// Whether the submit action is enabled.
    pub fn can_submit(&self) -> bool {
        self.state == FormState::Open && self.validate().is_ok()
    }

    /// Validates and moves to `Submitting`, handing back the draft to send.
    pub fn begin_submit(&mut self) -> Result<JobDraft> {
        match self.state {
            FormState::Open => {}
            FormState::Closed => return Err(Error::Form("form is closed".to_string())),
            FormState::Submitting => {
                return Err(Error::Form("a submission is already in progress".to_string()))
            }
        }
        self.validate()?;
        self.state = FormState::Submitting;
        self.error = None;
        Ok(self.fields.to_draft())
    }

    /// Applies the outcome of the request started by `begin_submit`.
    pub fn finish_submit(&mut self, outcome: std::result::Result<&Job, &Error>) {
        match outcome {
            Ok(job) => {
                match &self.mode {
                    FormMode::Add => self.fields = JobFormFields::default(),
                    FormMode::Edit { .. } => self.fields = JobFormFields::from(job),
                }
                self.state = FormState::Closed;
                self.error = None;
            }
            Err(err) => {
                if self.state == FormState::Submitting {
                    self.state = FormState::Open;
                    self.error = Some(err.to_string());
                }
            }
        }
    }
}
