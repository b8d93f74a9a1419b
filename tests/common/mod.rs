#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Map, Value as JsonValue};
use tokio::net::TcpListener;

use job_board::config::Config;
use job_board::AppState;

#[derive(Default)]
pub struct MockState {
    pub jobs: Vec<JsonValue>,
    pub requests: usize,
    pub list_queries: Vec<HashMap<String, String>>,
    pub deletes: usize,
    pub fail_list_with: Option<u16>,
    pub list_delays: HashMap<String, Duration>,
    next_id: u64,
}

/// In-memory stand-in for the jobs REST service.
#[derive(Clone, Default)]
pub struct MockJobs {
    state: Arc<Mutex<MockState>>,
}

impl MockJobs {
    pub fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().expect("mock state poisoned")
    }

    pub fn seed(&self, title: &str, company: &str, location: &str, job_type: &str, tags: &str) -> String {
        let mut state = self.lock();
        state.next_id += 1;
        let n = state.next_id;
        let id = format!("job-{}", n);
        state.jobs.push(json!({
            "id": id,
            "title": title,
            "company": company,
            "location": location,
            "posting_date": format!("2024-05-{:02}T09:00:00Z", n),
            "job_type": job_type,
            "tags": tags,
            "url": "#",
            "company_url": "",
            "salary": "Not specified",
            "scraped_on": "2024-05-30T00:00:00"
        }));
        id
    }

    pub fn requests(&self) -> usize {
        self.lock().requests
    }

    pub fn list_calls(&self) -> usize {
        self.lock().list_queries.len()
    }

    pub fn last_query(&self) -> Option<HashMap<String, String>> {
        self.lock().list_queries.last().cloned()
    }

    pub fn has_job(&self, id: &str) -> bool {
        self.lock().jobs.iter().any(|j| j["id"] == id)
    }
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn contains_ci(field: &JsonValue, needle: &str) -> bool {
    field
        .as_str()
        .map(|v| v.to_lowercase().contains(&needle.to_lowercase()))
        .unwrap_or(false)
}

async fn list_jobs(
    State(mock): State<MockJobs>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let (delay, fail) = {
        let mut state = mock.lock();
        state.requests += 1;
        state.list_queries.push(params.clone());
        let delay = params
            .get("location")
            .and_then(|l| state.list_delays.get(l).copied());
        (delay, state.fail_list_with)
    };

    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    if let Some(status) = fail {
        let status = StatusCode::from_u16(status).expect("valid status");
        return error(status, "database unavailable");
    }

    let mut jobs: Vec<JsonValue> = mock
        .lock()
        .jobs
        .iter()
        .filter(|j| params.get("location").map_or(true, |l| contains_ci(&j["location"], l)))
        .filter(|j| params.get("job_type").map_or(true, |t| contains_ci(&j["job_type"], t)))
        .cloned()
        .collect();
    if params.get("sort").map(String::as_str) != Some("posting_date_asc") {
        jobs.reverse();
    }
    Json(jobs).into_response()
}

async fn get_job(State(mock): State<MockJobs>, Path(id): Path<String>) -> Response {
    let mut state = mock.lock();
    state.requests += 1;
    match state.jobs.iter().find(|j| j["id"] == id.as_str()) {
        Some(job) => Json(job.clone()).into_response(),
        None => error(StatusCode::NOT_FOUND, "Job not found"),
    }
}

async fn create_job(State(mock): State<MockJobs>, Json(body): Json<JsonValue>) -> Response {
    let mut state = mock.lock();
    state.requests += 1;

    let required = ["title", "company", "location"];
    if required.iter().any(|f| !body[*f].is_string()) {
        return error(
            StatusCode::BAD_REQUEST,
            "Missing required fields: title, company, and location are required.",
        );
    }
    if state
        .jobs
        .iter()
        .any(|j| j["title"] == body["title"] && j["company"] == body["company"])
    {
        return error(
            StatusCode::CONFLICT,
            "A job with the same title and company already exists.",
        );
    }

    state.next_id += 1;
    let or = |key: &str, default: &str| body.get(key).cloned().unwrap_or_else(|| json!(default));
    let record = json!({
        "id": format!("job-{}", state.next_id),
        "title": body["title"],
        "company": body["company"],
        "location": body["location"],
        "posting_date": or("posting_date", "N/A"),
        "job_type": or("job_type", "Full-Time"),
        "tags": or("tags", ""),
        "url": or("url", "#"),
        "company_url": or("company_url", ""),
        "salary": or("salary", "Not specified"),
        "scraped_on": "2024-06-01T00:00:00"
    });
    state.jobs.push(record.clone());
    (StatusCode::CREATED, Json(record)).into_response()
}

async fn update_job(
    State(mock): State<MockJobs>,
    Path(id): Path<String>,
    Json(body): Json<Map<String, JsonValue>>,
) -> Response {
    let mut state = mock.lock();
    state.requests += 1;
    let Some(job) = state.jobs.iter_mut().find(|j| j["id"] == id.as_str()) else {
        return error(StatusCode::NOT_FOUND, "Job not found");
    };
    for key in ["title", "company", "location", "job_type", "tags", "salary", "url"] {
        if let Some(value) = body.get(key) {
            job[key] = value.clone();
        }
    }
    Json(job.clone()).into_response()
}

async fn delete_job(State(mock): State<MockJobs>, Path(id): Path<String>) -> Response {
    let mut state = mock.lock();
    state.requests += 1;
    state.deletes += 1;
    let before = state.jobs.len();
    state.jobs.retain(|j| j["id"] != id.as_str());
    if state.jobs.len() == before {
        return error(StatusCode::NOT_FOUND, "Job not found");
    }
    StatusCode::NO_CONTENT.into_response()
}

/// Serves the mock on an ephemeral port and returns its API base URL.
pub async fn spawn_server(mock: MockJobs) -> String {
    let app = Router::new()
        .route("/api/jobs", get(list_jobs).post(create_job))
        .route(
            "/api/jobs/:id",
            get(get_job).put(update_job).delete(delete_job),
        )
        .with_state(mock);

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind mock");
    let addr = listener.local_addr().expect("mock addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock server");
    });
    format!("http://{}/api", addr)
}

pub async fn setup() -> (MockJobs, AppState) {
    let mock = MockJobs::default();
    mock.seed("Pricing Actuary", "Acme Mutual", "Remote", "Full-Time", "Pricing, SQL");
    mock.seed("Health Analyst", "Globex", "Chicago", "Part-Time", "Health, Python");
    mock.seed("Actuarial Intern", "Initech", "New York", "Internship", "Entry Level, Excel");

    let base = spawn_server(mock.clone()).await;
    let mut config = Config::with_api_base(&base).expect("config");
    config.highlight_duration = Duration::from_millis(100);
    let state = AppState::new(&config).expect("app state");
    (mock, state)
}
