use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// Length of one Reclaim scheduling chunk, in minutes.
///
/// The planner API reports task effort in 15-minute chunks. Only the test
/// double recomputes chunk arithmetic locally; production code treats the
/// chunk fields as upstream-owned.
pub const MINUTES_PER_CHUNK: u32 = 15;

/// Scheduling status of a task, as reported by the Reclaim API.
///
/// Note the terminology trap: `Complete` means the scheduled time block has
/// elapsed, NOT that the user finished the work. A task the user actually
/// finished (via mark-complete) moves to `Archived`. This server documents
/// the distinction in its tool descriptions and never reinterprets it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Created but not yet scheduled
    #[default]
    New,
    /// Time blocks have been placed on the calendar
    Scheduled,
    /// A scheduled block is currently underway
    InProgress,
    /// All scheduled time has elapsed (the work may or may not be done)
    Complete,
    /// Cancelled by the user
    Cancelled,
    /// Marked done and moved out of active planning
    Archived,
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NEW" => Ok(TaskStatus::New),
            "SCHEDULED" => Ok(TaskStatus::Scheduled),
            "IN_PROGRESS" => Ok(TaskStatus::InProgress),
            "COMPLETE" => Ok(TaskStatus::Complete),
            "CANCELLED" => Ok(TaskStatus::Cancelled),
            "ARCHIVED" => Ok(TaskStatus::Archived),
            _ => Err(format!(
                "Invalid status '{}'. Valid options are: NEW, SCHEDULED, IN_PROGRESS, COMPLETE, CANCELLED, ARCHIVED",
                s
            )),
        }
    }
}

/// Task priority, P1 highest through P4 lowest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    P1,
    P2,
    P3,
    P4,
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "P1" => Ok(Priority::P1),
            "P2" => Ok(Priority::P2),
            "P3" => Ok(Priority::P3),
            "P4" => Ok(Priority::P4),
            _ => Err(format!(
                "Invalid priority '{}'. Valid options are: P1, P2, P3, P4 (P1 is highest)",
                s
            )),
        }
    }
}

/// Calendar the task's blocks are scheduled on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventCategory {
    Work,
    Personal,
}

impl FromStr for EventCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WORK" => Ok(EventCategory::Work),
            "PERSONAL" => Ok(EventCategory::Personal),
            _ => Err(format!(
                "Invalid event category '{}'. Valid options are: WORK, PERSONAL",
                s
            )),
        }
    }
}

/// Calendar color for the task's scheduled blocks (Google Calendar palette).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventColor {
    Lavender,
    Sage,
    Grape,
    Flamingo,
    Banana,
    Tangerine,
    Peacock,
    Graphite,
    Blueberry,
    Basil,
    Tomato,
}

impl FromStr for EventColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LAVENDER" => Ok(EventColor::Lavender),
            "SAGE" => Ok(EventColor::Sage),
            "GRAPE" => Ok(EventColor::Grape),
            "FLAMINGO" => Ok(EventColor::Flamingo),
            "BANANA" => Ok(EventColor::Banana),
            "TANGERINE" => Ok(EventColor::Tangerine),
            "PEACOCK" => Ok(EventColor::Peacock),
            "GRAPHITE" => Ok(EventColor::Graphite),
            "BLUEBERRY" => Ok(EventColor::Blueberry),
            "BASIL" => Ok(EventColor::Basil),
            "TOMATO" => Ok(EventColor::Tomato),
            _ => Err(format!(
                "Invalid event color '{}'. Valid options are: LAVENDER, SAGE, GRAPE, FLAMINGO, BANANA, TANGERINE, PEACOCK, GRAPHITE, BLUEBERRY, BASIL, TOMATO",
                s
            )),
        }
    }
}

/// A Reclaim task as returned by the upstream API.
///
/// The upstream service owns every field; this server only holds transient
/// in-memory copies per request. Unknown upstream fields are ignored on
/// decode so new API fields never break the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Task {
    /// Upstream-assigned identifier, immutable once set
    pub id: u64,
    /// Short description of the task
    pub title: String,
    /// Free-form notes; updates overwrite the whole field
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Current scheduling status
    pub status: TaskStatus,
    /// Soft-delete flag, independent of `status`
    pub deleted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    /// Total effort, in chunks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_chunks_required: Option<u32>,
    /// Chunks already scheduled/elapsed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_chunks_spent: Option<u32>,
    /// Upstream-computed remainder; never recalculated locally
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_chunks_remaining: Option<u32>,
    /// Deadline the planner schedules against (input-facing name: `deadline`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<DateTime<Utc>>,
    /// Earliest time the planner may schedule blocks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snooze_until: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_category: Option<EventCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_sub_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_color: Option<EventColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_deck: Option<bool>,
    /// Set only while the task sits in ARCHIVED via mark-complete
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished: Option<DateTime<Utc>>,
}

/// Payload for creating a task (POST /tasks).
///
/// Every `None` field is stripped from the wire body via
/// `skip_serializing_if`, matching the upstream API's expectation that
/// absent means "use the default".
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_category: Option<EventCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_sub_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_chunks_required: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_deck: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    /// Always populated by the client: a missing deadline input defaults
    /// to 24 hours from now before the draft goes on the wire.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snooze_until: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_color: Option<EventColor>,
}

/// Payload for partially updating a task (PATCH /tasks/{id}).
///
/// Unlike `TaskDraft`, an absent `due` here means "leave unchanged" — the
/// client never defaults it.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_category: Option<EventCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_sub_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_chunks_required: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_deck: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snooze_until: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_color: Option<EventColor>,
}

impl TaskPatch {
    /// True when every field is `None`, i.e. serializing would produce `{}`.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.notes.is_none()
            && self.event_category.is_none()
            && self.event_sub_type.is_none()
            && self.priority.is_none()
            && self.time_chunks_required.is_none()
            && self.on_deck.is_none()
            && self.status.is_none()
            && self.due.is_none()
            && self.snooze_until.is_none()
            && self.event_color.is_none()
    }
}

/// Result of a planner action endpoint (done, start, stop, ...).
///
/// Upstream returns the affected calendar events alongside the updated
/// task under the `taskOrHabit` key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_or_habit: Option<Task>,
}

/// Decoded upstream response body, one variant per known shape.
///
/// Upstream endpoints disagree about what they return (a task, a planner
/// action result, nothing at all), so responses are decoded by probing the
/// JSON shape instead of trusting a single schema. Unrecognized bodies are
/// carried opaquely rather than dropped.
#[derive(Debug, Clone)]
pub enum ApiResponse {
    Task(Task),
    TaskList(Vec<Task>),
    Action(ActionResult),
    /// Empty success body (e.g. DELETE)
    Empty,
    /// Valid JSON in a shape this server does not recognize
    Opaque(Value),
}

impl ApiResponse {
    /// Classify a response body by probing its shape.
    pub fn from_value(value: Value) -> ApiResponse {
        match &value {
            Value::Null => ApiResponse::Empty,
            Value::Array(_) => match serde_json::from_value::<Vec<Task>>(value.clone()) {
                Ok(tasks) => ApiResponse::TaskList(tasks),
                Err(_) => ApiResponse::Opaque(value),
            },
            Value::Object(map) => {
                if map.contains_key("taskOrHabit") || map.contains_key("events") {
                    match serde_json::from_value::<ActionResult>(value.clone()) {
                        Ok(action) => ApiResponse::Action(action),
                        Err(_) => ApiResponse::Opaque(value),
                    }
                } else if map.contains_key("id") && map.contains_key("title") {
                    match serde_json::from_value::<Task>(value.clone()) {
                        Ok(task) => ApiResponse::Task(task),
                        Err(_) => ApiResponse::Opaque(value),
                    }
                } else if map.is_empty() {
                    ApiResponse::Empty
                } else {
                    ApiResponse::Opaque(value)
                }
            }
            _ => ApiResponse::Opaque(value),
        }
    }
}
