use reqwest::Method;
use serde_json::{json, Value};

use crate::error::{ClientError, Result};
use crate::gateway::Gateway;
use crate::models::session::{Credentials, OtpPurpose, PendingVerification};
use crate::models::user::UserProfile;
use crate::validation::auth::*;

/// The number of digits in a one-time code.
pub const OTP_LENGTH: usize = 6;

/// Parses the `{access, refresh, user}` shape every credential-issuing
/// endpoint responds with.
///
/// A response missing the `access` field or the user object is reported as
/// `ClientError::InvalidResponse`; nothing gets persisted from it.
pub(crate) fn parse_credentials(body: &Value) -> Result<Credentials> {
    let access_token = body
        .get("access")
        .and_then(Value::as_str)
        .ok_or(ClientError::InvalidResponse)?
        .to_string();

    let refresh_token = body
        .get("refresh")
        .and_then(Value::as_str)
        .map(str::to_string);

    let user: UserProfile = body
        .get("user")
        .cloned()
        .ok_or(ClientError::InvalidResponse)
        .and_then(|v| serde_json::from_value(v).map_err(|_| ClientError::InvalidResponse))?;

    Ok(Credentials {
        access_token,
        refresh_token,
        user,
    })
}

/// Logs a user in and persists the resulting session.
///
/// # Arguments
///
/// * `gateway` - The request gateway.
/// * `email` - The user's email address.
/// * `password` - The user's password.
/// * `remember_me` - Selects the durable session tier when `true`.
///
/// # Returns
///
/// A `Result` containing the signed-in user's profile.
pub async fn login(
    gateway: &Gateway,
    email: &str,
    password: &str,
    remember_me: bool,
) -> Result<UserProfile> {
    validate_email(email)?;
    if password.is_empty() {
        return Err(ClientError::Validation("Password is required".to_string()));
    }

    tracing::info!("🔐 Login attempt for {}", email);

    let body = gateway
        .send(
            Method::POST,
            "/api/users/login/",
            Some(&json!({ "email": email.trim(), "password": password })),
            None,
        )
        .await?;

    let credentials = parse_credentials(&body)?;
    gateway.session().persist(&credentials, remember_me)?;

    tracing::info!("✅ User logged in: {}", credentials.user.id);
    Ok(credentials.user)
}

/// Logs the user out.
///
/// The refresh token is handed to the server for invalidation first, then
/// both local tiers are cleared regardless of the server's answer. A failed
/// server call is still reported so the caller can surface it, but it never
/// leaves credentials behind.
pub async fn logout(gateway: &Gateway) -> Result<()> {
    let refresh = gateway.session().refresh_token();

    let server_result = match refresh {
        Some(refresh) => gateway
            .send(
                Method::POST,
                "/api/users/logout/",
                Some(&json!({ "refresh": refresh })),
                None,
            )
            .await
            .map(|_| ()),
        None => Ok(()),
    };

    gateway.session().clear();
    tracing::info!("👋 Logged out, session cleared");

    server_result
}

/// Changes the password of the signed-in user.
pub async fn change_password(
    gateway: &Gateway,
    old_password: &str,
    new_password: &str,
) -> Result<()> {
    validate_password(new_password)?;
    gateway.session().authenticated_token()?;

    gateway
        .send(
            Method::POST,
            "/api/users/password/",
            Some(&json!({
                "old_password": old_password,
                "new_password": new_password,
            })),
            None,
        )
        .await?;

    tracing::info!("🔑 Password changed");
    Ok(())
}

/// Asks the API whether an account exists for the given email.
pub async fn check_email_exists(gateway: &Gateway, email: &str) -> Result<bool> {
    let body = gateway
        .send(
            Method::POST,
            "/api/users/auth/check-email/",
            Some(&json!({ "email": email.trim() })),
            None,
        )
        .await?;
    Ok(body.get("exists").and_then(Value::as_bool).unwrap_or(false))
}

/// Sends a one-time code to the given email.
pub async fn send_otp(gateway: &Gateway, email: &str, purpose: OtpPurpose) -> Result<()> {
    gateway
        .send(
            Method::POST,
            "/api/users/auth/send-otp/",
            Some(&json!({ "email": email.trim(), "purpose": purpose.as_str() })),
            None,
        )
        .await?;
    tracing::info!("📧 OTP sent to {} ({:?})", email, purpose);
    Ok(())
}

/// Verifies a one-time code with the server.
pub async fn verify_otp(gateway: &Gateway, email: &str, code: &str) -> Result<()> {
    validate_otp_code(code, OTP_LENGTH)?;
    gateway
        .send(
            Method::POST,
            "/api/users/auth/verify-otp/",
            Some(&json!({ "email": email.trim(), "otp": code })),
            None,
        )
        .await?;
    Ok(())
}

/// The step a registration flow is currently on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationStep {
    /// Collecting the email (and later the account details).
    Form,
    /// A code has been sent; waiting for the user to enter it.
    OtpSent,
    /// The code has been verified; waiting for the account details.
    OtpVerified,
}

/// The account details submitted at the end of registration.
#[derive(Debug, Clone)]
pub struct RegistrationDetails {
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub username: Option<String>,
}

/// The registration flow: check-email → send-OTP → verify-OTP → register →
/// chained login → persist.
///
/// Any step's failure halts the chain with that step's error. A failure in
/// the final register call after a successful verification returns the flow
/// to [`RegistrationStep::Form`]: the code is single-use, so the flow never
/// re-prompts for the already-consumed code.
pub struct RegistrationFlow {
    gateway: Gateway,
    pending: Option<PendingVerification>,
}

impl RegistrationFlow {
    /// Creates a flow at the form step.
    pub fn new(gateway: Gateway) -> Self {
        Self {
            gateway,
            pending: None,
        }
    }

    /// The step the flow is currently on.
    pub fn step(&self) -> RegistrationStep {
        match &self.pending {
            None => RegistrationStep::Form,
            Some(p) if p.otp_verified => RegistrationStep::OtpVerified,
            Some(_) => RegistrationStep::OtpSent,
        }
    }

    /// Starts the flow: verifies the email is unused and sends the code.
    pub async fn start(&mut self, email: &str) -> Result<()> {
        validate_email(email)?;

        if check_email_exists(&self.gateway, email).await? {
            return Err(ClientError::Conflict {
                message: "An account with this email already exists".to_string(),
                data: None,
            });
        }

        send_otp(&self.gateway, email, OtpPurpose::Registration).await?;
        self.pending = Some(PendingVerification {
            email: email.trim().to_string(),
            purpose: OtpPurpose::Registration,
            otp_verified: false,
        });
        Ok(())
    }

    /// Verifies the entered code.
    pub async fn verify(&mut self, code: &str) -> Result<()> {
        let pending = self.pending.as_mut().ok_or_else(|| {
            ClientError::Internal("verify called before start".to_string())
        })?;

        verify_otp(&self.gateway, &pending.email, code).await?;
        pending.otp_verified = true;
        tracing::info!("✅ OTP verified for {}", pending.email);
        Ok(())
    }

    /// Registers the account and chains straight into login.
    ///
    /// # Arguments
    ///
    /// * `details` - The account details from the form.
    /// * `remember_me` - Selects the durable session tier when `true`.
    pub async fn complete(
        &mut self,
        details: RegistrationDetails,
        remember_me: bool,
    ) -> Result<UserProfile> {
        let pending = match &self.pending {
            Some(p) if p.otp_verified => p.clone(),
            _ => {
                return Err(ClientError::Internal(
                    "complete called before OTP verification".to_string(),
                ))
            }
        };

        validate_name(&details.first_name)?;
        validate_password(&details.password)?;

        let mut payload = json!({
            "email": pending.email,
            "first_name": details.first_name.trim(),
            "last_name": details.last_name.trim(),
            "password": details.password,
        });
        if let Some(username) = &details.username {
            payload["username"] = json!(username.trim());
        }

        let register_result = self
            .gateway
            .send(Method::POST, "/api/users/register/", Some(&payload), None)
            .await;

        if let Err(err) = register_result {
            // The verified code was consumed; restarting from OTP entry would
            // only fail again. Back to the form.
            self.pending = None;
            tracing::warn!("❌ Registration failed after OTP verification: {}", err);
            return Err(err);
        }

        tracing::info!("✅ Account registered for {}", pending.email);

        let user = login(&self.gateway, &pending.email, &details.password, remember_me).await?;
        self.pending = None;
        Ok(user)
    }
}

/// The password reset flow: check-email → send-OTP(reset) → verify-OTP →
/// submit new password.
///
/// The verified state (including the code itself, which the finalize endpoint
/// requires) lives only in this struct's memory and is discarded when the
/// flow ends.
pub struct PasswordResetFlow {
    gateway: Gateway,
    pending: Option<PendingVerification>,
    verified_code: Option<String>,
}

impl PasswordResetFlow {
    /// Creates a flow at the email step.
    pub fn new(gateway: Gateway) -> Self {
        Self {
            gateway,
            pending: None,
            verified_code: None,
        }
    }

    /// Whether the code has been verified and a new password can be submitted.
    pub fn otp_verified(&self) -> bool {
        self.pending.as_ref().is_some_and(|p| p.otp_verified)
    }

    /// Starts the flow: confirms the account exists and sends the code.
    pub async fn start(&mut self, email: &str) -> Result<()> {
        validate_email(email)?;

        if !check_email_exists(&self.gateway, email).await? {
            return Err(ClientError::Validation(
                "No account found with this email".to_string(),
            ));
        }

        send_otp(&self.gateway, email, OtpPurpose::PasswordReset).await?;
        self.pending = Some(PendingVerification {
            email: email.trim().to_string(),
            purpose: OtpPurpose::PasswordReset,
            otp_verified: false,
        });
        self.verified_code = None;
        Ok(())
    }

    /// Verifies the entered code.
    pub async fn verify(&mut self, code: &str) -> Result<()> {
        let pending = self.pending.as_mut().ok_or_else(|| {
            ClientError::Internal("verify called before start".to_string())
        })?;

        verify_otp(&self.gateway, &pending.email, code).await?;
        pending.otp_verified = true;
        self.verified_code = Some(code.to_string());
        Ok(())
    }

    /// Finalizes the reset with the new password.
    pub async fn submit(&mut self, new_password: &str) -> Result<()> {
        let (pending, code) = match (&self.pending, &self.verified_code) {
            (Some(p), Some(code)) if p.otp_verified => (p.clone(), code.clone()),
            _ => {
                return Err(ClientError::Internal(
                    "submit called before OTP verification".to_string(),
                ))
            }
        };

        validate_password(new_password)?;

        self.gateway
            .send(
                Method::POST,
                "/api/users/reset-password/",
                Some(&json!({
                    "email": pending.email,
                    "otp": code,
                    "new_password": new_password,
                })),
                None,
            )
            .await?;

        self.pending = None;
        self.verified_code = None;
        tracing::info!("✅ Password reset completed for {}", pending.email);
        Ok(())
    }
}
