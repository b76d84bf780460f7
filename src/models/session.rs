use serde::{Deserialize, Serialize};

use crate::models::user::UserProfile;

/// The credentials produced by a successful auth flow, ready to be persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// The short-lived bearer credential. Carries `exp` and `user_id` claims.
    pub access_token: String,
    /// The longer-lived credential used server-side to mint new access tokens.
    /// Never decoded client-side.
    pub refresh_token: Option<String>,
    /// The profile of the user the credentials belong to.
    pub user: UserProfile,
}

/// A read of the current session state.
///
/// `is_authenticated` is the only authentication signal: a present `user`
/// without a validated token must never be treated as a signed-in state.
#[derive(Debug, Clone, Default)]
pub struct CurrentSession {
    /// The access token, when a valid one is stored.
    pub token: Option<String>,
    /// The stored user profile, when one is stored alongside a valid token.
    pub user: Option<UserProfile>,
    /// Whether the stored access token decodes and its expiry is in the future.
    pub is_authenticated: bool,
}

/// The purpose of a pending one-time-code verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpPurpose {
    /// Verifying an email address during registration.
    Registration,
    /// Verifying an email address before a password reset.
    PasswordReset,
}

impl OtpPurpose {
    /// The wire value sent to the send-OTP endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            OtpPurpose::Registration => "registration",
            OtpPurpose::PasswordReset => "reset",
        }
    }
}

/// Transient OTP-flow state. Held only in flow memory, never persisted.
#[derive(Debug, Clone)]
pub struct PendingVerification {
    /// The email address the code was sent to.
    pub email: String,
    /// What the verification is for.
    pub purpose: OtpPurpose,
    /// Whether the code has been verified with the server.
    pub otp_verified: bool,
}
