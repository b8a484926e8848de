//! HTTP client for the AIO Tests REST API.
//!
//! Each method issues exactly one request against the configured base URL and
//! returns the upstream JSON unmodified; projection into tool payloads happens
//! in the server layer. Requests and response statuses are logged through
//! `tracing` (stderr), never on the protocol channel.

use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{AioConfig, AuthMode};

/// Search page size requested from the paged test-case endpoint.
const SEARCH_PAGE_SIZE: u32 = 100;

/// Bound on every outbound call; the upstream has no streaming endpoints.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const ACCEPT_JSON: &str = "application/json;charset=utf-8";

/// Client operation result type.
pub type ApiResult<T> = Result<T, ApiError>;

/// Upstream call failures.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{status} - {message}")]
    Api { status: u16, message: String },
}

/// AIO Tests API client. Cheap to clone; holds one connection pool.
#[derive(Debug, Clone)]
pub struct AioClient {
    http: reqwest::Client,
    config: AioConfig,
}

impl AioClient {
    /// Build a client from resolved config. TLS verification is only relaxed
    /// when the config explicitly opts in.
    pub fn new(config: AioConfig) -> Result<Self, reqwest::Error> {
        if config.allow_insecure {
            warn!("TLS certificate verification disabled for upstream requests");
        }
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .danger_accept_invalid_certs(config.allow_insecure)
            .build()?;
        Ok(Self { http, config })
    }

    /// Fetch full detail for a single test case.
    pub async fn get_test_case(
        &self,
        project_key: &str,
        test_case_key: &str,
    ) -> ApiResult<Value> {
        let url = format!(
            "{}/rest/aio-tcms-api/1.0/project/{}/testcase/{}/detail",
            self.config.base_url, project_key, test_case_key
        );
        debug!(%url, "GET test case detail");
        let response = self
            .http
            .get(&url)
            .header(ACCEPT, ACCEPT_JSON)
            .header(AUTHORIZATION, self.auth_header())
            .send()
            .await?;
        read_json(response).await
    }

    /// Search test cases in a project, optionally restricted to folders.
    /// Returns one upstream page (newest case keys first).
    pub async fn search_test_cases(
        &self,
        project_id: u64,
        folder_ids: &[u64],
    ) -> ApiResult<Value> {
        let url = format!(
            "{}/rest/aio-tcms/1.0/project/{}/testcase/paged",
            self.config.base_url, project_id
        );
        debug!(%url, folders = folder_ids.len(), "POST test case search");
        let response = self
            .http
            .post(&url)
            .header(ACCEPT, ACCEPT_JSON)
            .header(AUTHORIZATION, self.auth_header())
            .header("X-Requested-With", "XMLHttpRequest")
            .json(&search_body(folder_ids))
            .send()
            .await?;
        read_json(response).await
    }

    /// Fetch the test-case folder tree for a project.
    pub async fn get_folders(&self, project_id: u64) -> ApiResult<Value> {
        let url = format!(
            "{}/rest/aio-tcms/1.0/project/{}/testcase/folder",
            self.config.base_url, project_id
        );
        debug!(%url, "GET folders");
        let response = self
            .http
            .get(&url)
            .header(ACCEPT, ACCEPT_JSON)
            .header(AUTHORIZATION, self.auth_header())
            .header("X-Requested-With", "XMLHttpRequest")
            .send()
            .await?;
        read_json(response).await
    }

    /// List Jira projects visible to the configured credential.
    pub async fn list_projects(&self) -> ApiResult<Value> {
        let url = format!("{}/rest/api/latest/project", self.config.base_url);
        debug!(%url, "GET projects");
        let response = self
            .http
            .get(&url)
            .header(ACCEPT, ACCEPT_JSON)
            .header(AUTHORIZATION, self.auth_header())
            .send()
            .await?;
        read_json(response).await
    }

    fn auth_header(&self) -> String {
        match self.config.auth_mode {
            AuthMode::Basic => format!("Basic {}", self.config.token),
            AuthMode::Bearer => format!("Bearer {}", self.config.token),
        }
    }
}

/// Request body for the paged search endpoint: one page from offset 0,
/// descending by case key, with a folder IN-filter only when ids are given.
fn search_body(folder_ids: &[u64]) -> Value {
    let mut body = json!({
        "startAt": 0,
        "maxResults": SEARCH_PAGE_SIZE,
        "fields": ["key", "name", "status", "priority", "folder", "owner"],
        "sort": [{ "field": "key", "order": "DESC" }],
    });
    if !folder_ids.is_empty() {
        body["filters"] = json!({
            "folder": { "comparisonType": "IN", "list": folder_ids }
        });
    }
    body
}

/// Decode the response body, mapping non-2xx statuses to [`ApiError::Api`]
/// with the upstream `message` field when the body carries one.
async fn read_json(response: reqwest::Response) -> ApiResult<Value> {
    let status = response.status();
    if status.is_success() {
        debug!(status = status.as_u16(), "upstream responded");
        return Ok(response.json().await?);
    }

    let body = response.text().await.unwrap_or_default();
    let message = extract_error_message(&body);
    warn!(status = status.as_u16(), %message, "upstream request failed");
    Err(ApiError::Api {
        status: status.as_u16(),
        message,
    })
}

fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message")?.as_str().map(String::from))
        .unwrap_or_else(|| body.to_string())
}
