//! Active-task filtering for Reclaim MCP server

use crate::model::Task;
use serde_json::Value;

/// Keep only "active" tasks: not soft-deleted, not archived, not cancelled.
///
/// Order-preserving and stable. COMPLETE tasks are always retained: in
/// Reclaim's model COMPLETE means the scheduled time elapsed, so the task
/// still needs user attention and must stay visible in active listings.
pub fn filter_active(tasks: &[Task]) -> Vec<Task> {
    use crate::model::TaskStatus::{Archived, Cancelled};
    tasks
        .iter()
        .filter(|task| !task.deleted && task.status != Archived && task.status != Cancelled)
        .cloned()
        .collect()
}

/// Decode a task-collection response body, coercing non-arrays to empty.
///
/// The list endpoint should always return an array, but a defensive caller
/// cannot assume that. A null or otherwise non-array body becomes an empty
/// list with a warning instead of an error. Array elements that fail to
/// decode are skipped individually, also with a warning.
pub fn tasks_from_value(value: Value) -> Vec<Task> {
    let Value::Array(items) = value else {
        tracing::warn!("task list response was not an array; treating as empty");
        return Vec::new();
    };
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<Task>(item) {
            Ok(task) => Some(task),
            Err(e) => {
                tracing::warn!("skipping undecodable task in list response: {}", e);
                None
            }
        })
        .collect()
}
