use reqwest::multipart::{Form, Part};
use reqwest::Method;
use uuid::Uuid;

use crate::error::Result;
use crate::gateway::Gateway;
use crate::models::asset::Asset;

/// Lists the signed-in user's file assets.
pub async fn list(gateway: &Gateway) -> Result<Vec<Asset>> {
    let body = gateway.send(Method::GET, "/api/assets/", None, None).await?;
    Ok(serde_json::from_value(body)?)
}

/// Fetches one asset.
pub async fn get(gateway: &Gateway, asset_id: Uuid) -> Result<Asset> {
    let body = gateway
        .send(
            Method::GET,
            &format!("/api/assets/{}/", asset_id),
            None,
            None,
        )
        .await?;
    Ok(serde_json::from_value(body)?)
}

/// Uploads a file asset, optionally attached to a task.
///
/// # Arguments
///
/// * `file_name` - The original file name.
/// * `bytes` - The file contents.
/// * `mime` - The file's MIME type.
/// * `task_id` - The task to attach the asset to, when any.
pub async fn upload(
    gateway: &Gateway,
    file_name: &str,
    bytes: Vec<u8>,
    mime: &str,
    task_id: Option<Uuid>,
) -> Result<Asset> {
    let part = Part::bytes(bytes)
        .file_name(file_name.to_string())
        .mime_str(mime)?;

    let mut form = Form::new().part("file", part);
    if let Some(task_id) = task_id {
        form = form.text("task", task_id.to_string());
    }

    let body = gateway
        .send_multipart(Method::POST, "/api/assets/", form)
        .await?;
    Ok(serde_json::from_value(body)?)
}

/// Deletes an asset.
pub async fn delete(gateway: &Gateway, asset_id: Uuid) -> Result<()> {
    gateway
        .send(
            Method::DELETE,
            &format!("/api/assets/{}/", asset_id),
            None,
            None,
        )
        .await?;
    Ok(())
}
