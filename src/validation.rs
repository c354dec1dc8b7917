//! Parameter validation helpers for Reclaim MCP server
//!
//! The transport-side schemas stay permissive (plain strings and integers)
//! so a sloppy call never dies as a protocol fault; these helpers are the
//! strict second pass inside each handler, turning bad arguments into
//! readable `INVALID_PARAMS` tool errors.

use crate::api::UpdateTask;
use crate::model::{EventCategory, EventColor, Priority, TaskStatus};
use crate::normalize::DeadlineInput;
use mcp_attr::Result as McpResult;
use std::str::FromStr;

/// Listing scope for the list-tasks tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskListFilter {
    /// Only active tasks (not deleted, archived, or cancelled)
    #[default]
    Active,
    /// Every task the upstream returns
    All,
}

impl FromStr for TaskListFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(TaskListFilter::Active),
            "all" => Ok(TaskListFilter::All),
            _ => Err(format!(
                "Invalid filter '{}'. Valid options are: active, all",
                s
            )),
        }
    }
}

/// Build an INVALID_PARAMS error whose message is shown to the caller.
fn invalid_params(message: String) -> mcp_attr::Error {
    mcp_attr::Error::new(mcp_attr::ErrorCode::INVALID_PARAMS).with_message(message, true)
}

/// Validate that a task identifier is a positive integer.
///
/// # Arguments
/// * `task_id` - Raw identifier from the tool call
///
/// # Returns
/// The identifier as `u64`, or a readable validation error
pub fn validate_task_id(task_id: i64) -> McpResult<u64> {
    if task_id <= 0 {
        return Err(invalid_params(format!(
            "taskId must be a positive integer (got {})",
            task_id
        )));
    }
    Ok(task_id as u64)
}

/// Validate that a minutes argument is a positive integer.
///
/// The API client re-checks this before any network call; validating here
/// too gives the caller a field-level message instead of a client error.
pub fn validate_minutes(minutes: i64) -> McpResult<i64> {
    if minutes <= 0 {
        return Err(invalid_params(format!(
            "minutes must be a positive integer (got {})",
            minutes
        )));
    }
    Ok(minutes)
}

/// Validate that a task title is non-empty.
pub fn validate_title(title: &str) -> McpResult<String> {
    if title.trim().is_empty() {
        return Err(invalid_params("title must not be empty".to_string()));
    }
    Ok(title.to_string())
}

/// Parse the list-tasks filter, defaulting to `active`.
pub fn parse_filter(filter: Option<&str>) -> McpResult<TaskListFilter> {
    match filter {
        None => Ok(TaskListFilter::Active),
        Some(s) => s.parse().map_err(invalid_params),
    }
}

/// Parse a flexible deadline/snooze argument.
///
/// A string of digits (with optional sign) is a day count from now;
/// anything else is handed to the normalizer as text. Never fails: the
/// normalizer degrades unparseable text to its default by design.
pub fn parse_deadline_arg(value: &str) -> DeadlineInput {
    match value.trim().parse::<i64>() {
        Ok(days) => DeadlineInput::Days(days),
        Err(_) => DeadlineInput::Text(value.to_string()),
    }
}

/// Parse an optional task status argument.
pub fn parse_status_arg(status: Option<&str>) -> McpResult<Option<TaskStatus>> {
    status
        .map(|s| s.parse().map_err(invalid_params))
        .transpose()
}

/// Parse an optional priority argument (P1 highest .. P4 lowest).
pub fn parse_priority_arg(priority: Option<&str>) -> McpResult<Option<Priority>> {
    priority
        .map(|s| s.parse().map_err(invalid_params))
        .transpose()
}

/// Parse an optional event category argument.
pub fn parse_category_arg(category: Option<&str>) -> McpResult<Option<EventCategory>> {
    category
        .map(|s| s.parse().map_err(invalid_params))
        .transpose()
}

/// Parse an optional event color argument.
pub fn parse_color_arg(color: Option<&str>) -> McpResult<Option<EventColor>> {
    color.map(|s| s.parse().map_err(invalid_params)).transpose()
}

/// Validate an optional time-chunks argument (non-negative, fits u32).
pub fn validate_chunks(chunks: Option<i64>) -> McpResult<Option<u32>> {
    match chunks {
        None => Ok(None),
        Some(n) if (0..=u32::MAX as i64).contains(&n) => Ok(Some(n as u32)),
        Some(n) => Err(invalid_params(format!(
            "timeChunksRequired must be a non-negative integer (got {})",
            n
        ))),
    }
}

/// Require that an update carries at least one field beyond the identifier.
///
/// An update with nothing to change is a caller mistake, surfaced as a
/// validation error rather than silently turned into a no-op.
pub fn ensure_update_has_fields(params: &UpdateTask) -> McpResult<()> {
    if params.is_empty() {
        return Err(invalid_params(
            "update requires at least one field besides taskId (e.g. title, notes, priority, deadline)"
                .to_string(),
        ));
    }
    Ok(())
}
