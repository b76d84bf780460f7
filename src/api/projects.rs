use reqwest::Method;
use serde_json::json;
use uuid::Uuid;

use crate::error::Result;
use crate::gateway::Gateway;
use crate::models::project::{Project, ProjectPayload};

/// Lists all projects the signed-in user belongs to.
pub async fn list(gateway: &Gateway) -> Result<Vec<Project>> {
    let body = gateway
        .send(Method::GET, "/api/projects/", None, None)
        .await?;
    Ok(serde_json::from_value(body)?)
}

/// Fetches one project.
pub async fn get(gateway: &Gateway, project_id: Uuid) -> Result<Project> {
    let body = gateway
        .send(
            Method::GET,
            &format!("/api/project/{}/", project_id),
            None,
            None,
        )
        .await?;
    Ok(serde_json::from_value(body)?)
}

/// Creates a project.
pub async fn create(gateway: &Gateway, payload: &ProjectPayload) -> Result<Project> {
    let body = gateway
        .send(Method::POST, "/api/projects/", Some(&json!(payload)), None)
        .await?;
    Ok(serde_json::from_value(body)?)
}

/// Applies a partial update to a project.
pub async fn update(
    gateway: &Gateway,
    project_id: Uuid,
    payload: &ProjectPayload,
) -> Result<Project> {
    let body = gateway
        .send(
            Method::PATCH,
            &format!("/api/project/{}/", project_id),
            Some(&json!(payload)),
            None,
        )
        .await?;
    Ok(serde_json::from_value(body)?)
}

/// Deletes a project.
pub async fn delete(gateway: &Gateway, project_id: Uuid) -> Result<()> {
    gateway
        .send(
            Method::DELETE,
            &format!("/api/project/{}/", project_id),
            None,
            None,
        )
        .await?;
    Ok(())
}

/// Adds a user to a project.
pub async fn add_member(gateway: &Gateway, project_id: Uuid, user_id: Uuid) -> Result<Project> {
    let body = gateway
        .send(
            Method::POST,
            &format!("/api/project/{}/members/{}/", project_id, user_id),
            None,
            None,
        )
        .await?;
    Ok(serde_json::from_value(body)?)
}

/// Removes a user from a project.
pub async fn remove_member(gateway: &Gateway, project_id: Uuid, user_id: Uuid) -> Result<()> {
    gateway
        .send(
            Method::DELETE,
            &format!("/api/project/{}/members/{}/", project_id, user_id),
            None,
            None,
        )
        .await?;
    Ok(())
}
