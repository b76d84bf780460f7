use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents the profile of the signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// The unique identifier for the user.
    pub id: Uuid,
    /// The user's email address.
    pub email: String,
    /// The user's username, when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// The user's first name.
    #[serde(default)]
    pub first_name: String,
    /// The user's last name.
    #[serde(default)]
    pub last_name: String,
    /// The URL of the user's avatar image, when one has been uploaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl UserProfile {
    /// The user's display name, derived from the first and last names.
    ///
    /// Falls back to the username, then the email, when both names are empty.
    pub fn name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if !full.is_empty() {
            return full.to_string();
        }
        if let Some(username) = &self.username {
            if !username.is_empty() {
                return username.clone();
            }
        }
        self.email.clone()
    }
}
