use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents an uploaded file asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    /// The unique identifier for the asset.
    pub id: Uuid,
    /// The asset's original file name.
    #[serde(default)]
    pub file_name: String,
    /// The URL the asset can be downloaded from.
    #[serde(default)]
    pub url: String,
    /// The task this asset is attached to, when any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<Uuid>,
    /// The timestamp when the asset was uploaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<DateTime<Utc>>,
}
