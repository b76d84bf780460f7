use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// The unique identifier for the task.
    pub id: Uuid,
    /// The task's title.
    pub title: String,
    /// The task's description.
    #[serde(default)]
    pub description: String,
    /// The task's workflow status, as reported by the API.
    #[serde(default)]
    pub status: String,
    /// The task's priority, when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    /// The task's due date, when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    /// The project this task belongs to, when any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<Uuid>,
    /// The users assigned to this task.
    #[serde(default)]
    pub assignees: Vec<Uuid>,
    /// The task's subtasks.
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
}

/// Represents a subtask of a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subtask {
    /// The unique identifier for the subtask.
    pub id: Uuid,
    /// The subtask's title.
    pub title: String,
    /// Whether the subtask has been completed.
    #[serde(default)]
    pub completed: bool,
}

/// The payload for creating or updating a task.
///
/// Absent fields are omitted from the request body, so a partial update
/// touches only the fields that are set.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<Uuid>,
}
