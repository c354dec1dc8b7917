//! Reclaim API client for the MCP server
//!
//! One thin binding per upstream operation: CRUD on `/tasks` plus the
//! planner action endpoints under `/planner/<action>/task/{id}`. Each
//! binding performs exactly one HTTP call, returns the decoded body, and
//! normalizes every failure into [`ApiError`]. No retries, no caching, no
//! shared state beyond the connection pool reqwest manages internally.

use crate::error::ApiError;
use crate::filter::tasks_from_value;
use crate::model::{
    ApiResponse, EventCategory, EventColor, Priority, Task, TaskDraft, TaskPatch, TaskStatus,
};
use crate::normalize::{DeadlineInput, end_of_day_if_bare_date, normalize_deadline};
use anyhow::{Context, Result};
use chrono::SecondsFormat;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::Value;

/// Default Reclaim API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.reclaim.ai/api";

/// Explicit client configuration, injected at process start.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bearer token for the Reclaim API
    pub api_token: String,
    /// Base URL, overridable for tests and self-hosted proxies
    pub base_url: String,
}

/// Validated input for creating a task.
///
/// This is the tool-facing shape: `deadline` and `snooze_until` are still
/// flexible inputs here and get normalized to UTC timestamps when the
/// client builds the wire payload.
#[derive(Debug, Clone, Default)]
pub struct CreateTask {
    pub title: String,
    pub notes: Option<String>,
    pub event_category: Option<EventCategory>,
    pub event_sub_type: Option<String>,
    pub priority: Option<Priority>,
    pub time_chunks_required: Option<u32>,
    pub on_deck: Option<bool>,
    pub status: Option<TaskStatus>,
    pub deadline: Option<DeadlineInput>,
    pub snooze_until: Option<DeadlineInput>,
    pub event_color: Option<EventColor>,
}

/// Validated input for partially updating a task.
#[derive(Debug, Clone, Default)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub notes: Option<String>,
    pub event_category: Option<EventCategory>,
    pub event_sub_type: Option<String>,
    pub priority: Option<Priority>,
    pub time_chunks_required: Option<u32>,
    pub on_deck: Option<bool>,
    pub status: Option<TaskStatus>,
    pub deadline: Option<DeadlineInput>,
    pub snooze_until: Option<DeadlineInput>,
    pub event_color: Option<EventColor>,
}

impl UpdateTask {
    /// True when no update field was provided at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.notes.is_none()
            && self.event_category.is_none()
            && self.event_sub_type.is_none()
            && self.priority.is_none()
            && self.time_chunks_required.is_none()
            && self.on_deck.is_none()
            && self.status.is_none()
            && self.deadline.is_none()
            && self.snooze_until.is_none()
            && self.event_color.is_none()
    }
}

/// HTTP client for the Reclaim API.
pub struct ReclaimClient {
    http: reqwest::Client,
    base_url: String,
}

impl ReclaimClient {
    /// Build a client from an explicit configuration.
    ///
    /// The bearer token goes into the default headers once; every request
    /// inherits it.
    pub fn new(config: &Config) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_token))
            .context("API token contains characters not valid in an HTTP header")?;
        auth.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and normalize the outcome.
    ///
    /// Success bodies decode to JSON (an empty body becomes `Null`);
    /// non-2xx responses and transport failures become [`ApiError`].
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Value, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.json::<Value>().await.unwrap_or(Value::Null);
            return Err(ApiError::from_response(status, body));
        }
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| ApiError {
            message: format!("Upstream returned undecodable JSON: {}", e),
            status: Some(status.as_u16()),
            detail: None,
        })
    }

    fn decode_task(value: Value) -> Result<Task, ApiError> {
        serde_json::from_value(value).map_err(|e| ApiError {
            message: format!("Upstream task body did not match the expected shape: {}", e),
            status: None,
            detail: None,
        })
    }

    /// GET /tasks — fetch every task. A non-array body is coerced to an
    /// empty list rather than treated as an error.
    pub async fn list(&self) -> Result<Vec<Task>, ApiError> {
        tracing::debug!("GET /tasks");
        let value = self.send(self.http.get(self.url("/tasks"))).await?;
        Ok(tasks_from_value(value))
    }

    /// GET /tasks/{id} — fetch a single task. A missing task surfaces as a
    /// normalized 404.
    pub async fn get(&self, id: u64) -> Result<Task, ApiError> {
        tracing::debug!(task_id = id, "GET /tasks/{{id}}");
        let value = self
            .send(self.http.get(self.url(&format!("/tasks/{}", id))))
            .await?;
        Self::decode_task(value)
    }

    /// POST /tasks — create a task.
    ///
    /// Maps the flexible `deadline` input to the upstream `due` field,
    /// defaulting to 24 hours out when absent, and normalizes
    /// `snooze_until` the same way. Absent optional fields are stripped
    /// from the wire body entirely.
    pub async fn create(&self, params: CreateTask) -> Result<Task, ApiError> {
        let draft = TaskDraft {
            title: params.title,
            notes: params.notes,
            event_category: params.event_category,
            event_sub_type: params.event_sub_type,
            priority: params.priority,
            time_chunks_required: params.time_chunks_required,
            on_deck: params.on_deck,
            status: params.status,
            due: Some(normalize_deadline(params.deadline.as_ref())),
            snooze_until: params
                .snooze_until
                .map(|input| normalize_deadline(Some(&input))),
            event_color: params.event_color,
        };
        tracing::debug!(title = %draft.title, "POST /tasks");
        let value = self
            .send(self.http.post(self.url("/tasks")).json(&draft))
            .await?;
        Self::decode_task(value)
    }

    /// PATCH /tasks/{id} — partial update.
    ///
    /// Absent fields mean "leave unchanged", so `due` is never defaulted
    /// here. When every field is absent after stripping, no write is sent
    /// at all; the current state comes back via [`ReclaimClient::get`]
    /// instead. (The tool layer already rejects empty updates, so through
    /// the MCP surface this fallback only serves direct library callers.)
    pub async fn update(&self, id: u64, params: UpdateTask) -> Result<Task, ApiError> {
        let patch = TaskPatch {
            title: params.title,
            notes: params.notes,
            event_category: params.event_category,
            event_sub_type: params.event_sub_type,
            priority: params.priority,
            time_chunks_required: params.time_chunks_required,
            on_deck: params.on_deck,
            status: params.status,
            due: params
                .deadline
                .as_ref()
                .map(|input| normalize_deadline(Some(input))),
            snooze_until: params
                .snooze_until
                .as_ref()
                .map(|input| normalize_deadline(Some(input))),
            event_color: params.event_color,
        };
        if patch.is_empty() {
            tracing::debug!(task_id = id, "empty patch; returning current state");
            return self.get(id).await;
        }
        tracing::debug!(task_id = id, "PATCH /tasks/{{id}}");
        let value = self
            .send(
                self.http
                    .patch(self.url(&format!("/tasks/{}", id)))
                    .json(&patch),
            )
            .await?;
        Self::decode_task(value)
    }

    /// DELETE /tasks/{id} — soft-delete upstream; success body is empty.
    pub async fn delete(&self, id: u64) -> Result<ApiResponse, ApiError> {
        tracing::debug!(task_id = id, "DELETE /tasks/{{id}}");
        let value = self
            .send(self.http.delete(self.url(&format!("/tasks/{}", id))))
            .await?;
        Ok(ApiResponse::from_value(value))
    }

    /// POST to a planner action endpoint, with optional query parameters.
    async fn planner_action(
        &self,
        action: &str,
        id: u64,
        query: &[(&str, String)],
    ) -> Result<ApiResponse, ApiError> {
        tracing::debug!(task_id = id, action, "POST /planner action");
        let mut request = self
            .http
            .post(self.url(&format!("/planner/{}/task/{}", action, id)));
        if !query.is_empty() {
            request = request.query(query);
        }
        let value = self.send(request).await?;
        Ok(ApiResponse::from_value(value))
    }

    /// Mark a task done (moves it to ARCHIVED).
    pub async fn mark_complete(&self, id: u64) -> Result<ApiResponse, ApiError> {
        self.planner_action("done", id, &[]).await
    }

    /// Unarchive a task (reverses mark-complete).
    pub async fn mark_incomplete(&self, id: u64) -> Result<ApiResponse, ApiError> {
        self.planner_action("unarchive", id, &[]).await
    }

    /// Add scheduled time to a task. Rejects non-positive `minutes`
    /// locally, before any request is constructed.
    pub async fn add_time(&self, id: u64, minutes: i64) -> Result<ApiResponse, ApiError> {
        ensure_positive_minutes(minutes)?;
        self.planner_action("add-time", id, &[("minutes", minutes.to_string())])
            .await
    }

    /// Start the task's timer.
    pub async fn start_timer(&self, id: u64) -> Result<ApiResponse, ApiError> {
        self.planner_action("start", id, &[]).await
    }

    /// Stop the task's timer.
    pub async fn stop_timer(&self, id: u64) -> Result<ApiResponse, ApiError> {
        self.planner_action("stop", id, &[]).await
    }

    /// Log already-worked time against a task.
    ///
    /// Rejects non-positive `minutes` locally. The optional `end` goes
    /// through the deadline normalizer; a bare `YYYY-MM-DD` input is then
    /// pushed to the end of that day so the logged interval covers it.
    pub async fn log_work(
        &self,
        id: u64,
        minutes: i64,
        end: Option<&DeadlineInput>,
    ) -> Result<ApiResponse, ApiError> {
        ensure_positive_minutes(minutes)?;
        let mut query = vec![("minutes", minutes.to_string())];
        if let Some(input) = end {
            let normalized = normalize_deadline(Some(input));
            let coerced = end_of_day_if_bare_date(input, normalized);
            query.push(("end", coerced.to_rfc3339_opts(SecondsFormat::Secs, true)));
        }
        self.planner_action("log-work", id, &query).await
    }

    /// Clear scheduling exceptions so the planner can reschedule freely.
    pub async fn clear_exceptions(&self, id: u64) -> Result<ApiResponse, ApiError> {
        self.planner_action("clear-exceptions", id, &[]).await
    }

    /// Ask the planner to prioritize this task over its peers.
    pub async fn prioritize(&self, id: u64) -> Result<ApiResponse, ApiError> {
        self.planner_action("prioritize", id, &[]).await
    }
}

/// Reject a non-positive minutes argument before any network call.
fn ensure_positive_minutes(minutes: i64) -> Result<(), ApiError> {
    if minutes <= 0 {
        return Err(ApiError::precondition(format!(
            "minutes must be a positive integer (got {})",
            minutes
        )));
    }
    Ok(())
}
