use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{ClientError, Result};

/// The claims carried by an access token that the client cares about.
///
/// The token is decoded without signature verification: the client only needs
/// the expiry for lazy eviction and the subject for sanity-checking what it is
/// about to persist. The server remains the authority on token validity.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessClaims {
    /// Standard JWT expiry (Unix timestamp, seconds).
    pub exp: Option<i64>,
    /// The user identifier claim, as issued by the API.
    #[serde(default)]
    pub user_id: Option<Value>,
    /// Standard JWT subject, when the API sets one instead of `user_id`.
    #[serde(default)]
    pub sub: Option<String>,
}

impl AccessClaims {
    /// Whether the claims carry a subject identifier in either form.
    pub fn has_subject(&self) -> bool {
        self.user_id.is_some() || self.sub.is_some()
    }

    /// Whether the expiry claim is at or before `now` (Unix seconds).
    ///
    /// A missing expiry counts as expired: a token the client cannot
    /// validate must never establish an authenticated session.
    pub fn is_expired_at(&self, now: i64) -> bool {
        match self.exp {
            Some(exp) => exp <= now,
            None => true,
        }
    }
}

/// Decodes the claims segment of a JWT-shaped access token.
///
/// # Arguments
///
/// * `token` - The raw access token string.
///
/// # Returns
///
/// A `Result` containing the decoded `AccessClaims`, or
/// `ClientError::InvalidCredentials` when the token is not three
/// dot-separated segments with a base64url JSON payload.
pub fn decode_claims(token: &str) -> Result<AccessClaims> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(ClientError::InvalidCredentials(
            "Access token is not a well-formed JWT".to_string(),
        ));
    }
    let payload = segments[1];

    let decoded = URL_SAFE_NO_PAD.decode(payload).map_err(|e| {
        ClientError::InvalidCredentials(format!("Access token payload is not base64url: {}", e))
    })?;

    serde_json::from_slice(&decoded).map_err(|e| {
        ClientError::InvalidCredentials(format!("Access token payload is not JSON: {}", e))
    })
}

#[cfg(test)]
pub(crate) fn forge_token(payload: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string().as_bytes());
    format!("{}.{}.sig", header, body)
}
