use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::Serialize;
use serde_json::json;

use crate::error::Result;
use crate::gateway::Gateway;
use crate::models::user::UserProfile;

/// The payload for a partial profile update.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// Fetches the signed-in user's profile.
pub async fn me(gateway: &Gateway) -> Result<UserProfile> {
    let body = gateway
        .send(Method::GET, "/api/users/me/", None, None)
        .await?;
    Ok(serde_json::from_value(body)?)
}

/// Applies a partial update to the signed-in user's profile.
pub async fn update_profile(gateway: &Gateway, update: &ProfileUpdate) -> Result<UserProfile> {
    let body = gateway
        .send(
            Method::PATCH,
            "/api/users/me/",
            Some(&json!(update)),
            None,
        )
        .await?;
    Ok(serde_json::from_value(body)?)
}

/// Uploads a new avatar image for the signed-in user.
///
/// # Arguments
///
/// * `file_name` - The original file name.
/// * `bytes` - The image contents.
/// * `mime` - The image MIME type, e.g. `image/png`.
pub async fn update_avatar(
    gateway: &Gateway,
    file_name: &str,
    bytes: Vec<u8>,
    mime: &str,
) -> Result<UserProfile> {
    let part = Part::bytes(bytes)
        .file_name(file_name.to_string())
        .mime_str(mime)?;
    let form = Form::new().part("avatar", part);

    let body = gateway
        .send_multipart(Method::PATCH, "/api/users/me/", form)
        .await?;
    Ok(serde_json::from_value(body)?)
}
