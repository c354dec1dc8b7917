//! Reclaim MCP Server Library
//!
//! This library provides a Model Context Protocol (MCP) server exposing the
//! Reclaim.ai task API as callable tools, so an LLM-driven client can list,
//! create, update, and manipulate tasks.
//!
//! # Architecture
//!
//! The library follows a 3-layer architecture:
//! - **MCP Layer**: `ReclaimServerHandler` - Handles MCP protocol communication
//! - **Normalization Layer**: `validation`, `normalize`, `filter`, `envelope` -
//!   argument validation, flexible-date handling, active filtering, and the
//!   uniform result envelope
//! - **API Layer**: `api` module - Per-operation HTTP bindings to Reclaim
//!
//! Tool and argument names follow the published tool schema (camelCase
//! arguments like `taskId`), not Rust naming, since they are the wire
//! contract LLM clients see.
//!
//! # Example
//!
//! ```no_run
//! use reclaim_mcp::{Config, ReclaimServerHandler};
//! use anyhow::Result;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config {
//!         api_token: std::env::var("RECLAIM_API_TOKEN")?,
//!         base_url: reclaim_mcp::api::DEFAULT_BASE_URL.to_string(),
//!     };
//!     let handler = ReclaimServerHandler::new(&config)?;
//!     // Use handler with MCP server...
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod envelope;
pub mod error;
pub mod filter;
pub mod model;
pub mod normalize;
pub mod validation;

use anyhow::Result;
use mcp_attr::server::{McpServer, mcp_server};
use mcp_attr::Result as McpResult;

use crate::api::{CreateTask, ReclaimClient, UpdateTask};
use crate::envelope::wrap;
use crate::filter::filter_active;
use crate::model::ApiResponse;
use crate::validation::{
    TaskListFilter, ensure_update_has_fields, parse_category_arg, parse_color_arg,
    parse_deadline_arg, parse_filter, parse_priority_arg, parse_status_arg, validate_chunks,
    validate_minutes, validate_task_id, validate_title,
};

// Re-export commonly used types
pub use api::Config;
pub use error::ApiError;
pub use model::{EventCategory, EventColor, Priority, Task, TaskStatus};

/// MCP server handler for Reclaim task management
///
/// Provides an MCP interface to the Reclaim.ai task API. The handler is
/// stateless: every tool call is an independent request against the
/// upstream service, with no caching between invocations.
pub struct ReclaimServerHandler {
    client: ReclaimClient,
}

impl ReclaimServerHandler {
    /// Create a new handler from an explicit configuration
    ///
    /// # Arguments
    /// * `config` - API token and base URL, injected at process start
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: ReclaimClient::new(config)?,
        })
    }
}

/// Reclaim.ai task management server.
///
/// Exposes the Reclaim task API as MCP tools: listing, creation, partial
/// updates, deletion, and the planner actions (timers, time logging,
/// prioritization).
///
/// Status terminology: Reclaim's COMPLETE status means the scheduled time
/// block elapsed, NOT that the user finished the work. Tasks the user
/// actually finished (via reclaim_mark_complete) show as ARCHIVED.
/// COMPLETE tasks therefore still count as active.
#[mcp_server]
impl McpServer for ReclaimServerHandler {
    /// List tasks. By default only active tasks are returned: not deleted,
    /// not ARCHIVED, not CANCELLED. COMPLETE tasks ARE included — in
    /// Reclaim, COMPLETE only means the scheduled time elapsed, so the task
    /// may still need attention.
    #[tool]
    pub async fn reclaim_list_tasks(
        &self,
        /// Filter: "active" (default) or "all"
        filter: Option<String>,
    ) -> McpResult<String> {
        let scope = parse_filter(filter.as_deref())?;
        let result = self.client.list().await.map(|tasks| match scope {
            TaskListFilter::Active => ApiResponse::TaskList(filter_active(&tasks)),
            TaskListFilter::All => ApiResponse::TaskList(tasks),
        });
        wrap(result)
    }

    /// Get a single task by its ID.
    #[allow(non_snake_case)]
    #[tool]
    pub async fn reclaim_get_task(
        &self,
        /// Task ID (positive integer)
        taskId: i64,
    ) -> McpResult<String> {
        let id = validate_task_id(taskId)?;
        wrap(self.client.get(id).await.map(ApiResponse::Task))
    }

    /// Create a new task. The deadline accepts a number of days from now,
    /// an ISO-8601 datetime, or a YYYY-MM-DD date; when omitted it defaults
    /// to 24 hours from now.
    #[allow(clippy::too_many_arguments)]
    #[allow(non_snake_case)]
    #[tool]
    pub async fn reclaim_create_task(
        &self,
        /// Task title (must not be empty)
        title: String,
        /// Notes in Markdown (optional)
        notes: Option<String>,
        /// Calendar category: WORK or PERSONAL (optional)
        eventCategory: Option<String>,
        /// Event subtype (optional)
        eventSubType: Option<String>,
        /// Priority: P1 (highest) to P4 (optional)
        priority: Option<String>,
        /// Effort in 15-minute chunks (optional)
        timeChunksRequired: Option<i64>,
        /// Put the task on deck (optional)
        onDeck: Option<bool>,
        /// Initial status: NEW/SCHEDULED/IN_PROGRESS/COMPLETE/CANCELLED/ARCHIVED (optional)
        status: Option<String>,
        /// Deadline: days from now, ISO-8601 datetime, or YYYY-MM-DD (optional, default 24h from now)
        deadline: Option<String>,
        /// Snooze until: same formats as deadline (optional)
        snoozeUntil: Option<String>,
        /// Calendar color, e.g. TOMATO, BLUEBERRY (optional)
        eventColor: Option<String>,
    ) -> McpResult<String> {
        let params = CreateTask {
            title: validate_title(&title)?,
            notes,
            event_category: parse_category_arg(eventCategory.as_deref())?,
            event_sub_type: eventSubType,
            priority: parse_priority_arg(priority.as_deref())?,
            time_chunks_required: validate_chunks(timeChunksRequired)?,
            on_deck: onDeck,
            status: parse_status_arg(status.as_deref())?,
            deadline: deadline.as_deref().map(parse_deadline_arg),
            snooze_until: snoozeUntil.as_deref().map(parse_deadline_arg),
            event_color: parse_color_arg(eventColor.as_deref())?,
        };
        wrap(self.client.create(params).await.map(ApiResponse::Task))
    }

    /// Update an existing task (partial update). At least one field besides
    /// taskId is required; omitted fields are left unchanged. Unlike
    /// creation, an omitted deadline is NOT defaulted.
    #[allow(clippy::too_many_arguments)]
    #[allow(non_snake_case)]
    #[tool]
    pub async fn reclaim_update_task(
        &self,
        /// Task ID (positive integer)
        taskId: i64,
        /// New title (optional)
        title: Option<String>,
        /// New notes; overwrites the whole field (optional)
        notes: Option<String>,
        /// Calendar category: WORK or PERSONAL (optional)
        eventCategory: Option<String>,
        /// Event subtype (optional)
        eventSubType: Option<String>,
        /// Priority: P1 (highest) to P4 (optional)
        priority: Option<String>,
        /// Effort in 15-minute chunks (optional)
        timeChunksRequired: Option<i64>,
        /// Put the task on deck (optional)
        onDeck: Option<bool>,
        /// New status: NEW/SCHEDULED/IN_PROGRESS/COMPLETE/CANCELLED/ARCHIVED (optional)
        status: Option<String>,
        /// Deadline: days from now, ISO-8601 datetime, or YYYY-MM-DD (optional)
        deadline: Option<String>,
        /// Snooze until: same formats as deadline (optional)
        snoozeUntil: Option<String>,
        /// Calendar color, e.g. TOMATO, BLUEBERRY (optional)
        eventColor: Option<String>,
    ) -> McpResult<String> {
        let id = validate_task_id(taskId)?;
        let params = UpdateTask {
            title,
            notes,
            event_category: parse_category_arg(eventCategory.as_deref())?,
            event_sub_type: eventSubType,
            priority: parse_priority_arg(priority.as_deref())?,
            time_chunks_required: validate_chunks(timeChunksRequired)?,
            on_deck: onDeck,
            status: parse_status_arg(status.as_deref())?,
            deadline: deadline.as_deref().map(parse_deadline_arg),
            snooze_until: snoozeUntil.as_deref().map(parse_deadline_arg),
            event_color: parse_color_arg(eventColor.as_deref())?,
        };
        ensure_update_has_fields(&params)?;
        wrap(self.client.update(id, params).await.map(ApiResponse::Task))
    }

    /// Mark a task complete (done). This archives the task: its status
    /// becomes ARCHIVED and it leaves active listings.
    #[allow(non_snake_case)]
    #[tool]
    pub async fn reclaim_mark_complete(
        &self,
        /// Task ID (positive integer)
        taskId: i64,
    ) -> McpResult<String> {
        let id = validate_task_id(taskId)?;
        wrap(self.client.mark_complete(id).await)
    }

    /// Mark a task incomplete (unarchive), returning it to active planning.
    #[allow(non_snake_case)]
    #[tool]
    pub async fn reclaim_mark_incomplete(
        &self,
        /// Task ID (positive integer)
        taskId: i64,
    ) -> McpResult<String> {
        let id = validate_task_id(taskId)?;
        wrap(self.client.mark_incomplete(id).await)
    }

    /// Delete a task (soft delete upstream).
    #[allow(non_snake_case)]
    #[tool]
    pub async fn reclaim_delete_task(
        &self,
        /// Task ID (positive integer)
        taskId: i64,
    ) -> McpResult<String> {
        let id = validate_task_id(taskId)?;
        wrap(self.client.delete(id).await)
    }

    /// Add scheduled time to a task.
    #[allow(non_snake_case)]
    #[tool]
    pub async fn reclaim_add_time(
        &self,
        /// Task ID (positive integer)
        taskId: i64,
        /// Minutes to add (positive integer)
        minutes: i64,
    ) -> McpResult<String> {
        let id = validate_task_id(taskId)?;
        let minutes = validate_minutes(minutes)?;
        wrap(self.client.add_time(id, minutes).await)
    }

    /// Start the task's timer.
    #[allow(non_snake_case)]
    #[tool]
    pub async fn reclaim_start_timer(
        &self,
        /// Task ID (positive integer)
        taskId: i64,
    ) -> McpResult<String> {
        let id = validate_task_id(taskId)?;
        wrap(self.client.start_timer(id).await)
    }

    /// Stop the task's timer.
    #[allow(non_snake_case)]
    #[tool]
    pub async fn reclaim_stop_timer(
        &self,
        /// Task ID (positive integer)
        taskId: i64,
    ) -> McpResult<String> {
        let id = validate_task_id(taskId)?;
        wrap(self.client.stop_timer(id).await)
    }

    /// Log time already worked against a task.
    #[allow(non_snake_case)]
    #[tool]
    pub async fn reclaim_log_work(
        &self,
        /// Task ID (positive integer)
        taskId: i64,
        /// Minutes worked (positive integer)
        minutes: i64,
        /// End of the worked interval: ISO-8601 datetime or YYYY-MM-DD (optional)
        end: Option<String>,
    ) -> McpResult<String> {
        let id = validate_task_id(taskId)?;
        let minutes = validate_minutes(minutes)?;
        let end = end.as_deref().map(parse_deadline_arg);
        wrap(self.client.log_work(id, minutes, end.as_ref()).await)
    }

    /// Clear a task's scheduling exceptions so the planner can reschedule
    /// its blocks freely.
    #[allow(non_snake_case)]
    #[tool]
    pub async fn reclaim_clear_exceptions(
        &self,
        /// Task ID (positive integer)
        taskId: i64,
    ) -> McpResult<String> {
        let id = validate_task_id(taskId)?;
        wrap(self.client.clear_exceptions(id).await)
    }

    /// Prioritize a task over its peers in the planner.
    #[allow(non_snake_case)]
    #[tool]
    pub async fn reclaim_prioritize(
        &self,
        /// Task ID (positive integer)
        taskId: i64,
    ) -> McpResult<String> {
        let id = validate_task_id(taskId)?;
        wrap(self.client.prioritize(id).await)
    }

    /// Active tasks as a JSON resource: every task that is not deleted,
    /// archived, or cancelled (COMPLETE tasks included).
    #[resource("tasks://active")]
    pub async fn active_tasks(&self) -> McpResult<String> {
        let result = self
            .client
            .list()
            .await
            .map(|tasks| ApiResponse::TaskList(filter_active(&tasks)));
        wrap(result)
    }
}
