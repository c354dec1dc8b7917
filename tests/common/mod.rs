//! Common test utilities for integration tests
//!
//! Provides a stateful stand-in for the Reclaim API: a single wiremock
//! responder backed by an in-memory task store, so lifecycle tests can
//! drive the real client through create/update/action/delete sequences and
//! observe state transitions.

use reclaim_mcp::api::{Config, ReclaimClient};
use reclaim_mcp::model::{MINUTES_PER_CHUNK, Task, TaskStatus};
use reclaim_mcp::ReclaimServerHandler;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use wiremock::matchers::any;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Build a client pointed at a mock server.
pub fn client_for(server: &MockServer) -> ReclaimClient {
    ReclaimClient::new(&Config {
        api_token: "test-token".to_string(),
        base_url: server.uri(),
    })
    .expect("client construction should not fail")
}

/// Build an MCP handler pointed at a mock server.
pub fn handler_for(server: &MockServer) -> ReclaimServerHandler {
    ReclaimServerHandler::new(&Config {
        api_token: "test-token".to_string(),
        base_url: server.uri(),
    })
    .expect("handler construction should not fail")
}

/// Start a mock server running the stateful task store.
pub async fn start_stub_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ReclaimStub::new())
        .mount(&server)
        .await;
    server
}

#[derive(Default)]
struct TaskStore {
    next_id: u64,
    tasks: BTreeMap<u64, Task>,
}

/// Stateful mock of the Reclaim API.
///
/// Implements just enough of the upstream contract for lifecycle tests:
/// CRUD on `/tasks` plus the planner action endpoints, with chunk
/// arithmetic recomputed locally (the one place chunk math is allowed
/// outside the upstream service).
pub struct ReclaimStub {
    store: Arc<Mutex<TaskStore>>,
}

impl ReclaimStub {
    pub fn new() -> Self {
        Self {
            store: Arc::new(Mutex::new(TaskStore {
                next_id: 1,
                tasks: BTreeMap::new(),
            })),
        }
    }
}

impl Default for ReclaimStub {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found() -> ResponseTemplate {
    ResponseTemplate::new(404).set_body_json(json!({
        "title": "Task not found",
        "status": 404
    }))
}

fn task_json(task: &Task) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(task)
}

fn action_json(task: &Task) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "events": [],
        "taskOrHabit": task
    }))
}

fn query_minutes(request: &Request) -> Option<i64> {
    request
        .url
        .query_pairs()
        .find(|(k, _)| k == "minutes")
        .and_then(|(_, v)| v.parse().ok())
}

fn chunks_for(minutes: i64) -> u32 {
    (minutes as u32).div_ceil(MINUTES_PER_CHUNK)
}

fn recompute_remaining(task: &mut Task) {
    let required = task.time_chunks_required.unwrap_or(0);
    let spent = task.time_chunks_spent.unwrap_or(0);
    task.time_chunks_remaining = Some(required.saturating_sub(spent));
}

impl Respond for ReclaimStub {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let mut store = self.store.lock().expect("stub store poisoned");
        let method = request.method.to_string().to_uppercase();
        let path = request.url.path().to_string();
        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

        match (method.as_str(), segments.as_slice()) {
            ("GET", ["tasks"]) => {
                let tasks: Vec<&Task> = store.tasks.values().collect();
                ResponseTemplate::new(200).set_body_json(&tasks)
            }
            ("POST", ["tasks"]) => {
                let Ok(mut task) = serde_json::from_slice::<Task>(&request.body) else {
                    return ResponseTemplate::new(400)
                        .set_body_json(json!({"title": "Malformed task body"}));
                };
                task.id = store.next_id;
                store.next_id += 1;
                task.time_chunks_required = task.time_chunks_required.or(Some(4));
                task.time_chunks_spent = Some(0);
                recompute_remaining(&mut task);
                let response = task_json(&task);
                store.tasks.insert(task.id, task);
                response
            }
            ("GET", ["tasks", id]) => match id.parse().ok().and_then(|id: u64| store.tasks.get(&id)) {
                Some(task) => task_json(task),
                None => not_found(),
            },
            ("PATCH", ["tasks", id]) => {
                let Some(id) = id.parse::<u64>().ok() else {
                    return not_found();
                };
                let Some(task) = store.tasks.get(&id).cloned() else {
                    return not_found();
                };
                let mut merged = serde_json::to_value(&task).expect("task serializes");
                let patch: Value =
                    serde_json::from_slice(&request.body).unwrap_or(Value::Null);
                if let (Some(base), Some(fields)) = (merged.as_object_mut(), patch.as_object()) {
                    for (key, value) in fields {
                        base.insert(key.clone(), value.clone());
                    }
                }
                let Ok(mut updated) = serde_json::from_value::<Task>(merged) else {
                    return ResponseTemplate::new(400)
                        .set_body_json(json!({"title": "Malformed patch body"}));
                };
                updated.id = id;
                recompute_remaining(&mut updated);
                let response = task_json(&updated);
                store.tasks.insert(id, updated);
                response
            }
            ("DELETE", ["tasks", id]) => {
                let Some(task) = id.parse().ok().and_then(|id: u64| store.tasks.get_mut(&id))
                else {
                    return not_found();
                };
                task.deleted = true;
                // Soft delete: empty success body
                ResponseTemplate::new(200)
            }
            ("POST", ["planner", action, "task", id]) => {
                let action = action.to_string();
                let Some(task) = id.parse().ok().and_then(|id: u64| store.tasks.get_mut(&id))
                else {
                    return not_found();
                };
                match action.as_str() {
                    "done" => {
                        task.status = TaskStatus::Archived;
                        task.finished = Some(chrono::Utc::now());
                    }
                    "unarchive" => {
                        task.status = TaskStatus::New;
                        task.finished = None;
                    }
                    "add-time" => {
                        let Some(minutes) = query_minutes(request) else {
                            return ResponseTemplate::new(400)
                                .set_body_json(json!({"title": "minutes query param required"}));
                        };
                        let required = task.time_chunks_required.unwrap_or(0);
                        task.time_chunks_required = Some(required + chunks_for(minutes));
                    }
                    "start" => task.status = TaskStatus::InProgress,
                    "stop" => task.status = TaskStatus::Scheduled,
                    "log-work" => {
                        let Some(minutes) = query_minutes(request) else {
                            return ResponseTemplate::new(400)
                                .set_body_json(json!({"title": "minutes query param required"}));
                        };
                        let spent = task.time_chunks_spent.unwrap_or(0);
                        task.time_chunks_spent = Some(spent + chunks_for(minutes));
                    }
                    "clear-exceptions" => {}
                    "prioritize" => task.on_deck = Some(true),
                    _ => return not_found(),
                }
                recompute_remaining(task);
                action_json(task)
            }
            _ => not_found(),
        }
    }
}
