use serde::{Deserialize, Deserializer, Serialize};

use crate::models::filter::JobFilter;
use crate::models::job::{Job, JobDraft, JobType};
use crate::utils::tags::{join_tags, split_tags};

/// Placeholder the jobs service stores when no posting link was supplied.
const URL_PLACEHOLDER: &str = "#";

fn deserialize_id_flexible<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrInt {
        String(String),
        Int(i64),
    }

    match StringOrInt::deserialize(deserializer)? {
        StringOrInt::String(s) => Ok(s),
        StringOrInt::Int(i) => Ok(i.to_string()),
    }
}

/// Job record as the REST service sends it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    #[serde(deserialize_with = "deserialize_id_flexible")]
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(default)]
    pub posting_date: Option<String>,
    #[serde(default)]
    pub job_type: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub company_url: Option<String>,
    #[serde(default)]
    pub salary: Option<String>,
}

/// Body for `POST /jobs` and `PUT /jobs/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPayload {
    pub title: String,
    pub company: String,
    pub location: String,
    pub job_type: String,
    pub tags: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posting_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct JobListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl From<JobRecord> for Job {
    fn from(value: JobRecord) -> Self {
        let job_type = match value.job_type.as_deref().and_then(JobType::parse_lenient) {
            Some(job_type) => job_type,
            None => {
                tracing::warn!(
                    job_id = %value.id,
                    job_type = ?value.job_type,
                    "Unrecognized job type from server, treating as Full-Time"
                );
                JobType::FullTime
            }
        };

        Self {
            id: value.id,
            title: value.title,
            company: value.company,
            location: value.location,
            job_type,
            tags: split_tags(value.tags.as_deref().unwrap_or_default()),
            posted_date: value.posting_date.unwrap_or_default(),
            salary: non_blank(value.salary),
            url: non_blank(value.url).filter(|u| u != URL_PLACEHOLDER),
            company_url: non_blank(value.company_url),
        }
    }
}

impl JobPayload {
    /// Body for `POST /jobs`. Blank optionals are left out so the server
    /// fills in its own defaults.
    pub fn for_create(draft: &JobDraft, posting_date: String) -> Self {
        Self {
            title: draft.title.clone(),
            company: draft.company.clone(),
            location: draft.location.clone(),
            job_type: draft.job_type.as_str().to_string(),
            tags: join_tags(&draft.tags),
            salary: non_blank(draft.salary.clone()),
            url: non_blank(draft.url.clone()),
            posting_date: Some(posting_date),
        }
    }

    /// Body for `PUT /jobs/{id}`, a full replacement: a blank salary or url
    /// is sent as `""` so the stored value is cleared.
    pub fn for_update(draft: &JobDraft) -> Self {
        Self {
            salary: Some(non_blank(draft.salary.clone()).unwrap_or_default()),
            url: Some(non_blank(draft.url.clone()).unwrap_or_default()),
            posting_date: None,
            ..Self::for_create(draft, String::new())
        }
    }
}

impl From<&JobFilter> for JobListQuery {
    fn from(value: &JobFilter) -> Self {
        Self {
            location: Some(value.location.trim().to_string()).filter(|l| !l.is_empty()),
            job_type: value.job_type.map(|t| t.as_str().to_string()),
            sort: Some(value.sort.server_token().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::filter::SortKey;
    use serde_json::json;

    #[test]
    fn record_maps_to_domain_shape() {
        let record: JobRecord = serde_json::from_value(json!({
            "id": "a1",
            "title": "Pricing Actuary",
            "company": "Acme Mutual",
            "location": "Remote",
            "posting_date": "2024-05-01T12:00:00Z",
            "job_type": "Part-Time",
            "tags": "Pricing,  SQL ,,Python",
            "url": "#",
            "company_url": "",
            "salary": "$85,000 - $110,000",
            "scraped_on": "2024-05-02T00:00:00"
        }))
        .unwrap();

        let job = Job::from(record);
        assert_eq!(job.id, "a1");
        assert_eq!(job.job_type, JobType::PartTime);
        assert_eq!(job.tags, vec!["Pricing", "SQL", "Python"]);
        assert_eq!(job.posted_date, "2024-05-01T12:00:00Z");
        assert_eq!(job.salary.as_deref(), Some("$85,000 - $110,000"));
        assert_eq!(job.url, None);
        assert_eq!(job.company_url, None);
    }

    #[test]
    fn sparse_record_gets_defaults() {
        let record: JobRecord = serde_json::from_value(json!({
            "id": 17,
            "title": "Intern",
            "company": "Globex",
            "location": "New York",
            "tags": null
        }))
        .unwrap();

        let job = Job::from(record);
        assert_eq!(job.id, "17");
        assert_eq!(job.job_type, JobType::FullTime);
        assert!(job.tags.is_empty());
        assert_eq!(job.posted_date, "");
        assert_eq!(job.salary, None);
    }

    #[test]
    fn payload_rejoins_tags_and_omits_empty_optionals() {
        let draft = JobDraft {
            title: "Analyst".into(),
            company: "Initech".into(),
            location: "Chicago".into(),
            job_type: JobType::Contract,
            tags: vec!["Excel".into(), "R".into()],
            salary: Some("  ".into()),
            url: Some("https://initech.example/jobs/1".into()),
        };

        let body = serde_json::to_value(JobPayload::for_create(
            &draft,
            "2024-06-01T00:00:00+00:00".into(),
        ))
        .unwrap();
        assert_eq!(
            body,
            json!({
                "title": "Analyst",
                "company": "Initech",
                "location": "Chicago",
                "job_type": "Contract",
                "tags": "Excel, R",
                "url": "https://initech.example/jobs/1",
                "posting_date": "2024-06-01T00:00:00+00:00"
            })
        );
    }

    #[test]
    fn update_payload_always_carries_optional_fields() {
        let draft = JobDraft {
            title: "Analyst".into(),
            company: "Initech".into(),
            location: "Chicago".into(),
            job_type: JobType::FullTime,
            tags: vec![],
            salary: None,
            url: Some("   ".into()),
        };

        let body = serde_json::to_value(JobPayload::for_update(&draft)).unwrap();
        assert_eq!(
            body,
            json!({
                "title": "Analyst",
                "company": "Initech",
                "location": "Chicago",
                "job_type": "Full-Time",
                "tags": "",
                "salary": "",
                "url": ""
            })
        );
    }

    #[test]
    fn query_omits_empty_filters() {
        let filter = JobFilter {
            location: String::new(),
            job_type: Some(JobType::Internship),
            sort: SortKey::SalaryHigh,
        };
        let query = JobListQuery::from(&filter);
        assert_eq!(query.location, None);
        assert_eq!(query.job_type.as_deref(), Some("Internship"));
        assert_eq!(query.sort.as_deref(), Some("salary_high"));
    }
}
