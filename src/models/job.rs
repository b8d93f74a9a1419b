use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum JobType {
    #[default]
    #[serde(rename = "Full-Time")]
    FullTime,
    #[serde(rename = "Part-Time")]
    PartTime,
    #[serde(rename = "Internship")]
    Internship,
    #[serde(rename = "Contract")]
    Contract,
}

impl JobType {
    pub const ALL: [JobType; 4] = [
        JobType::FullTime,
        JobType::PartTime,
        JobType::Internship,
        JobType::Contract,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "Full-Time",
            JobType::PartTime => "Part-Time",
            JobType::Internship => "Internship",
            JobType::Contract => "Contract",
        }
    }

    /// Lenient match used for server records: case-insensitive, `_` and
    /// spaces are accepted in place of `-`.
    pub fn parse_lenient(raw: &str) -> Option<Self> {
        let key: String = raw
            .trim()
            .chars()
            .map(|c| match c {
                '_' | ' ' => '-',
                c => c.to_ascii_lowercase(),
            })
            .collect();
        match key.as_str() {
            "full-time" | "fulltime" => Some(JobType::FullTime),
            "part-time" | "parttime" => Some(JobType::PartTime),
            "internship" | "intern" => Some(JobType::Internship),
            "contract" | "contractor" => Some(JobType::Contract),
            _ => None,
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobType::parse_lenient(s).ok_or_else(|| {
            format!(
                "unknown job type '{}', expected one of: Full-Time, Part-Time, Internship, Contract",
                s
            )
        })
    }
}

/// A job posting as the rest of the crate sees it. Only the API client deals
/// with the wire record. Serializes in the camelCase shape used for
/// `--json` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(rename = "type")]
    pub job_type: JobType,
    pub tags: Vec<String>,
    pub posted_date: String,
    pub salary: Option<String>,
    pub url: Option<String>,
    pub company_url: Option<String>,
}

impl Job {
    /// Case-insensitive substring match against title, company and each tag.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(&term)
            || self.company.to_lowercase().contains(&term)
            || self.tags.iter().any(|t| t.to_lowercase().contains(&term))
    }
}

/// Editable part of a job: everything except the server-owned id and
/// posting date.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobDraft {
    pub title: String,
    pub company: String,
    pub location: String,
    pub job_type: JobType,
    pub tags: Vec<String>,
    pub salary: Option<String>,
    pub url: Option<String>,
}

impl From<&Job> for JobDraft {
    fn from(job: &Job) -> Self {
        Self {
            title: job.title.clone(),
            company: job.company.clone(),
            location: job.location.clone(),
            job_type: job.job_type,
            tags: job.tags.clone(),
            salary: job.salary.clone(),
            url: job.url.clone(),
        }
    }
}
