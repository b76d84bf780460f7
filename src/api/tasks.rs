use reqwest::Method;
use serde_json::json;
use uuid::Uuid;

use crate::error::Result;
use crate::gateway::Gateway;
use crate::models::task::{Subtask, Task, TaskPayload};

/// Lists all tasks visible to the signed-in user.
pub async fn list(gateway: &Gateway) -> Result<Vec<Task>> {
    let body = gateway.send(Method::GET, "/api/tasks/", None, None).await?;
    Ok(serde_json::from_value(body)?)
}

/// Fetches one task.
pub async fn get(gateway: &Gateway, task_id: Uuid) -> Result<Task> {
    let body = gateway
        .send(Method::GET, &format!("/api/tasks/{}/", task_id), None, None)
        .await?;
    Ok(serde_json::from_value(body)?)
}

/// Creates a task.
pub async fn create(gateway: &Gateway, payload: &TaskPayload) -> Result<Task> {
    let body = gateway
        .send(Method::POST, "/api/tasks/", Some(&json!(payload)), None)
        .await?;
    Ok(serde_json::from_value(body)?)
}

/// Applies a partial update to a task.
pub async fn update(gateway: &Gateway, task_id: Uuid, payload: &TaskPayload) -> Result<Task> {
    let body = gateway
        .send(
            Method::PATCH,
            &format!("/api/tasks/{}/", task_id),
            Some(&json!(payload)),
            None,
        )
        .await?;
    Ok(serde_json::from_value(body)?)
}

/// Deletes a task.
pub async fn delete(gateway: &Gateway, task_id: Uuid) -> Result<()> {
    gateway
        .send(
            Method::DELETE,
            &format!("/api/tasks/{}/", task_id),
            None,
            None,
        )
        .await?;
    Ok(())
}

/// Replaces the set of users assigned to a task.
pub async fn set_assignees(gateway: &Gateway, task_id: Uuid, user_ids: &[Uuid]) -> Result<Task> {
    let body = gateway
        .send(
            Method::POST,
            &format!("/api/task/{}/assignees/", task_id),
            Some(&json!({ "assignees": user_ids })),
            None,
        )
        .await?;
    Ok(serde_json::from_value(body)?)
}

/// Creates a subtask under a task.
pub async fn create_subtask(gateway: &Gateway, task_id: Uuid, title: &str) -> Result<Subtask> {
    let body = gateway
        .send(
            Method::POST,
            &format!("/api/tasks/{}/subtask/", task_id),
            Some(&json!({ "title": title })),
            None,
        )
        .await?;
    Ok(serde_json::from_value(body)?)
}

/// Applies a partial update to a subtask.
pub async fn update_subtask(
    gateway: &Gateway,
    task_id: Uuid,
    subtask_id: Uuid,
    completed: bool,
) -> Result<Subtask> {
    let body = gateway
        .send(
            Method::PATCH,
            &format!("/api/tasks/{}/subtask/{}/", task_id, subtask_id),
            Some(&json!({ "completed": completed })),
            None,
        )
        .await?;
    Ok(serde_json::from_value(body)?)
}

/// Deletes a subtask.
pub async fn delete_subtask(gateway: &Gateway, task_id: Uuid, subtask_id: Uuid) -> Result<()> {
    gateway
        .send(
            Method::DELETE,
            &format!("/api/tasks/{}/subtask/{}/", task_id, subtask_id),
            None,
            None,
        )
        .await?;
    Ok(())
}
