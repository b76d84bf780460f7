use std::sync::Mutex;

use reqwest::Method;
use serde_json::json;

use crate::error::{ClientError, Result};
use crate::gateway::Gateway;
use crate::models::user::UserProfile;

/// The provider widget's one-shot initialization state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitState {
    /// The provider script has not loaded yet.
    Uninitialized,
    /// Initialization is running.
    Initializing,
    /// The provider is ready; further init calls are no-ops.
    Ready,
}

/// Google sign-in: exchanges the provider's credential for API tokens.
///
/// The provider's script loads asynchronously, so initialization is modeled
/// as a one-shot state machine: the script-load event is the only trigger out
/// of `Uninitialized`, and re-entrant calls while `Initializing` or `Ready`
/// do nothing. This is what keeps the button widget from double-rendering.
pub struct GoogleSignIn {
    gateway: Gateway,
    client_id: String,
    state: Mutex<InitState>,
}

impl GoogleSignIn {
    /// Creates an uninitialized sign-in handler.
    ///
    /// Fails when no Google client id is configured.
    pub fn new(gateway: Gateway, client_id: Option<String>) -> Result<Self> {
        let client_id = client_id.ok_or_else(|| {
            ClientError::Internal("Google sign-in is not configured".to_string())
        })?;

        Ok(Self {
            gateway,
            client_id,
            state: Mutex::new(InitState::Uninitialized),
        })
    }

    /// The configured provider client identifier.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// The current initialization state.
    pub fn init_state(&self) -> InitState {
        *self.state.lock().expect("google init lock poisoned")
    }

    /// Handles the provider script's load event.
    ///
    /// Returns `true` when this call performed the transition out of
    /// `Uninitialized`; repeated calls return `false` and change nothing.
    pub fn on_script_loaded(&self) -> bool {
        let mut state = self.state.lock().expect("google init lock poisoned");
        match *state {
            InitState::Uninitialized => {
                *state = InitState::Initializing;
                tracing::debug!("🔌 Google provider script loaded, initializing");
                true
            }
            InitState::Initializing | InitState::Ready => false,
        }
    }

    /// Marks the provider widget as rendered and ready.
    ///
    /// A no-op unless initialization is in progress.
    pub fn on_ready(&self) {
        let mut state = self.state.lock().expect("google init lock poisoned");
        if *state == InitState::Initializing {
            *state = InitState::Ready;
            tracing::info!("✅ Google sign-in ready");
        }
    }

    /// Exchanges the provider credential for API tokens and persists the
    /// session. Same contract as a password login.
    ///
    /// # Arguments
    ///
    /// * `credential` - The credential string issued by the provider widget.
    /// * `remember_me` - Selects the durable session tier when `true`.
    pub async fn sign_in(&self, credential: &str, remember_me: bool) -> Result<UserProfile> {
        if credential.is_empty() {
            return Err(ClientError::Validation(
                "Missing provider credential".to_string(),
            ));
        }

        tracing::info!("🔐 Google sign-in attempt");

        let body = self
            .gateway
            .send(
                Method::POST,
                "/api/users/auth/google/",
                Some(&json!({ "credential": credential })),
                None,
            )
            .await?;

        let credentials = super::auth::parse_credentials(&body)?;
        self.gateway.session().persist(&credentials, remember_me)?;

        tracing::info!("✅ Google sign-in completed: {}", credentials.user.id);
        Ok(credentials.user)
    }
}
