use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

/// The client's configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// The base URL of the task management API.
    pub api_base_url: String,
    /// The Google OAuth client identifier, when third-party sign-in is enabled.
    pub google_client_id: Option<String>,
    /// The path backing the durable session tier.
    pub session_path: PathBuf,
    /// The per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        let api_base_url = env::var("TASKDECK_API_BASE_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8000".to_string());

        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            anyhow::bail!("TASKDECK_API_BASE_URL must be an http(s) origin");
        }

        Ok(Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            google_client_id: env::var("TASKDECK_GOOGLE_CLIENT_ID").ok(),
            session_path: env::var("TASKDECK_SESSION_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".taskdeck/session.json")),
            request_timeout_secs: env::var("TASKDECK_REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .context("Invalid TASKDECK_REQUEST_TIMEOUT_SECS")?,
        })
    }
}
