use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::job::JobType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Newest,
    Oldest,
    SalaryHigh,
    SalaryLow,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::Newest,
        SortKey::Oldest,
        SortKey::SalaryHigh,
        SortKey::SalaryLow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Newest => "newest",
            SortKey::Oldest => "oldest",
            SortKey::SalaryHigh => "salary_high",
            SortKey::SalaryLow => "salary_low",
        }
    }

    /// Token the jobs service understands in the `sort` query parameter.
    pub fn server_token(&self) -> &'static str {
        match self {
            SortKey::Newest => "posting_date_desc",
            SortKey::Oldest => "posting_date_asc",
            SortKey::SalaryHigh => "salary_high",
            SortKey::SalaryLow => "salary_low",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "unknown sort '{}', expected one of: newest, oldest, salary_high, salary_low",
                    s
                )
            })
    }
}

/// The server-backed part of the filter. A change to any of these fields
/// means a refetch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct JobFilter {
    pub location: String,
    pub job_type: Option<JobType>,
    pub sort: SortKey,
}

/// Everything the filter bar holds, including the client-side search term.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    pub search_term: String,
    pub location: String,
    pub job_type: Option<JobType>,
    pub sort: SortKey,
}

impl FilterState {
    pub fn server_filter(&self) -> JobFilter {
        JobFilter {
            location: self.location.trim().to_string(),
            job_type: self.job_type,
            sort: self.sort,
        }
    }
}
