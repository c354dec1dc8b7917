//! Tool-result envelope construction for Reclaim MCP server
//!
//! Last line of defense before a handler returns to the transport: every
//! client outcome — success body, empty success, upstream failure — becomes
//! either a JSON text block or an in-band tool error with a uniform
//! `Error [status]: message` shape. Nothing in this module can panic; a
//! serialization failure degrades to a debug rendering instead.

use crate::error::{ApiError, detail_message};
use crate::model::ApiResponse;
use mcp_attr::Result as McpResult;
use serde::Serialize;
use serde_json::json;

/// Inline detail strings longer than this move to a separate block.
const SHORT_DETAIL_MAX: usize = 120;

/// Convert a client outcome into the uniform tool result.
pub fn wrap(result: Result<ApiResponse, ApiError>) -> McpResult<String> {
    match result {
        Ok(response) => Ok(render_success(&response)),
        Err(err) => Err(tool_error(&err)),
    }
}

/// Render a successful response as a pretty-printed JSON text block.
///
/// A void-like success (empty body) becomes the canonical
/// `{"success": true}` block so callers always get well-formed JSON.
pub fn render_success(response: &ApiResponse) -> String {
    match response {
        ApiResponse::Task(task) => pretty(task),
        ApiResponse::TaskList(tasks) => pretty(tasks),
        ApiResponse::Action(action) => pretty(action),
        ApiResponse::Empty => pretty(&json!({"success": true})),
        ApiResponse::Opaque(value) => pretty(value),
    }
}

/// Build the user-facing failure message for a normalized error.
///
/// Shape: `Error [status]: message`, with the status segment omitted when
/// the failure never reached the upstream (local preconditions, transport
/// errors without a response). A short, non-duplicate detail string is
/// appended inline; anything longer rides along as a separate pretty block
/// so a human or model can diagnose the upstream complaint.
pub fn format_error(err: &ApiError) -> String {
    let head = match err.status {
        Some(status) => format!("Error [{}]: {}", status, err.message),
        None => format!("Error: {}", err.message),
    };
    let Some(detail) = &err.detail else {
        return head;
    };
    match detail_message(detail) {
        Some(short) if short != err.message && short.len() <= SHORT_DETAIL_MAX => {
            format!("{} ({})", head, short)
        }
        _ => format!("{}\n\nUpstream detail:\n{}", head, pretty(detail)),
    }
}

fn tool_error(err: &ApiError) -> mcp_attr::Error {
    mcp_attr::Error::new(mcp_attr::ErrorCode::INTERNAL_ERROR)
        .with_message(format_error(err), true)
}

fn pretty<T: Serialize + std::fmt::Debug>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| format!("{:?}", value))
}
