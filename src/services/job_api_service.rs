use crate::dto::job_dto::{JobListQuery, JobPayload, JobRecord};
use crate::error::{Error, Result};
use crate::models::filter::JobFilter;
use crate::models::job::{Job, JobDraft};
use crate::utils::time;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// HTTP client for the jobs REST service. It is the only place wire records
/// exist; every method takes and returns domain types.
#[derive(Clone)]
pub struct JobApiService {
    client: Client,
    base_url: Url,
}

impl JobApiService {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self::with_client(base_url, client))
    }

    pub fn with_client(base_url: Url, client: Client) -> Self {
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("API base is not a base URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn list_jobs(&self, filter: &JobFilter) -> Result<Vec<Job>> {
        let url = self.endpoint(&["jobs"])?;
        let query = JobListQuery::from(filter);
        debug!(?query, "Fetching jobs");

        let response = self.client.get(url).query(&query).send().await?;
        let records: Vec<JobRecord> = handle_response(response).await?;

        info!(count = records.len(), "Fetched jobs");
        Ok(records.into_iter().map(Job::from).collect())
    }

    pub async fn get_job(&self, id: &str) -> Result<Job> {
        let url = self.endpoint(&["jobs", id])?;
        let response = self.client.get(url).send().await?;
        let record: JobRecord = handle_response(response).await?;
        Ok(record.into())
    }

    pub async fn create_job(&self, draft: &JobDraft) -> Result<Job> {
        let url = self.endpoint(&["jobs"])?;
        let payload = JobPayload::for_create(draft, time::to_rfc3339(time::now()));

        let response = self.client.post(url).json(&payload).send().await?;
        let record: JobRecord = handle_response(response).await?;

        info!(job_id = %record.id, "Created job");
        Ok(record.into())
    }

    pub async fn update_job(&self, id: &str, draft: &JobDraft) -> Result<Job> {
        let url = self.endpoint(&["jobs", id])?;
        let payload = JobPayload::for_update(draft);

        let response = self.client.put(url).json(&payload).send().await?;
        let record: JobRecord = handle_response(response).await?;

        info!(job_id = %id, "Updated job");
        Ok(record.into())
    }

    pub async fn delete_job(&self, id: &str) -> Result<()> {
        let url = self.endpoint(&["jobs", id])?;
        let response = self.client.delete(url).send().await?;

        let status = response.status();
        if !status.is_success() && status != StatusCode::NO_CONTENT {
            return Err(error_from_response(response).await);
        }

        info!(job_id = %id, "Deleted job");
        Ok(())
    }
}

async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T> {
    if !response.status().is_success() {
        return Err(error_from_response(response).await);
    }
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| Error::Decode(e.to_string()))
}

/// Message comes from the JSON `error`/`message` field, else the raw body,
/// else the status line.
async fn error_from_response(response: Response) -> Error {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = extract_message(status, &body);
    warn!(status = status.as_u16(), %message, "Jobs API request failed");
    Error::api(status, message)
}

fn extract_message(status: StatusCode, body: &str) -> String {
    let body = body.trim();
    if let Ok(JsonValue::Object(map)) = serde_json::from_str::<JsonValue>(body) {
        let field = ["error", "message"]
            .iter()
            .find_map(|key| map.get(*key).and_then(JsonValue::as_str));
        if let Some(message) = field.map(str::trim).filter(|m| !m.is_empty()) {
            return message.to_string();
        }
    }
    if !body.is_empty() {
        return body.to_string();
    }
    format!(
        "{} {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown Status")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(base: &str) -> JobApiService {
        JobApiService::with_client(Url::parse(base).unwrap(), Client::new())
    }

    #[test]
    fn endpoints_append_to_base_path() {
        let api = service("http://localhost:5001/api");
        assert_eq!(
            api.endpoint(&["jobs"]).unwrap().as_str(),
            "http://localhost:5001/api/jobs"
        );
        assert_eq!(
            api.endpoint(&["jobs", "a b/c"]).unwrap().as_str(),
            "http://localhost:5001/api/jobs/a%20b%2Fc"
        );

        let root = service("https://jobs.example.com/");
        assert_eq!(
            root.endpoint(&["jobs"]).unwrap().as_str(),
            "https://jobs.example.com/jobs"
        );
    }

    #[test]
    fn error_message_prefers_json_error_field() {
        assert_eq!(
            extract_message(StatusCode::NOT_FOUND, r#"{"error": "Job not found"}"#),
            "Job not found"
        );
        assert_eq!(
            extract_message(StatusCode::BAD_REQUEST, r#"{"message": "bad sort"}"#),
            "bad sort"
        );
    }

    #[test]
    fn error_message_falls_back_to_body_then_status() {
        assert_eq!(
            extract_message(StatusCode::BAD_GATEWAY, "upstream down\n"),
            "upstream down"
        );
        assert_eq!(
            extract_message(StatusCode::INTERNAL_SERVER_ERROR, ""),
            "500 Internal Server Error"
        );
        assert_eq!(
            extract_message(StatusCode::CONFLICT, r#"{"error": ""}"#),
            r#"{"error": ""}"#
        );
    }
}
