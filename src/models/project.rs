use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// The unique identifier for the project.
    pub id: Uuid,
    /// The project's name.
    pub name: String,
    /// The project's description.
    #[serde(default)]
    pub description: String,
    /// The user who owns the project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<Uuid>,
    /// The project's members.
    #[serde(default)]
    pub members: Vec<ProjectMember>,
}

/// Represents a user's membership in a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMember {
    /// The member's user identifier.
    pub id: Uuid,
    /// The member's email address.
    #[serde(default)]
    pub email: String,
    /// The member's role within the project, as reported by the API.
    #[serde(default)]
    pub role: String,
}

/// The payload for creating or updating a project.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
