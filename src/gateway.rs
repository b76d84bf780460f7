use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::multipart::Form;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde_json::Value;

use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::session::store::SessionStore;

/// The single chokepoint through which every API call is issued.
///
/// Reads the current bearer token from the session store at call time,
/// attaches it when present, and converts every failure mode into one typed
/// `ClientError`. No other module in this crate constructs HTTP requests.
#[derive(Clone)]
pub struct Gateway {
    http: reqwest::Client,
    base_url: String,
    session: SessionStore,
}

impl Gateway {
    /// Creates a new `Gateway`.
    ///
    /// # Arguments
    ///
    /// * `config` - The client configuration (base URL, timeout).
    /// * `session` - The session store the bearer token is read from.
    pub fn new(config: &Config, session: SessionStore) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        tracing::info!("✅ Gateway initialized for {}", config.api_base_url);

        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
            session,
        })
    }

    /// The session store this gateway reads its bearer token from.
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Issues one API call and normalizes the outcome.
    ///
    /// The bearer token is read from the session store on every call, never
    /// cached. GET requests never carry a body, even when one is passed.
    /// Cancellation (dropping the returned future) produces neither data nor
    /// error.
    ///
    /// # Arguments
    ///
    /// * `method` - The HTTP method.
    /// * `path` - The API path, appended to the configured base URL.
    /// * `body` - An optional JSON body, sent only for non-GET methods.
    /// * `extra_headers` - Additional headers to attach, when any.
    ///
    /// # Returns
    ///
    /// A `Result` containing the parsed response body (`Value::Null` for an
    /// empty 2xx response).
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        extra_headers: Option<HeaderMap>,
    ) -> Result<Value> {
        let mut builder = self.http.request(method.clone(), self.url(path));

        if method != Method::GET {
            if let Some(body) = body {
                builder = builder.json(body);
            }
        }

        if let Some(headers) = extra_headers {
            builder = builder.headers(headers);
        }

        tracing::debug!("📡 {} {}", method, path);
        self.dispatch(builder).await
    }

    /// Issues one multipart API call (avatar and asset uploads).
    ///
    /// # Arguments
    ///
    /// * `method` - The HTTP method.
    /// * `path` - The API path, appended to the configured base URL.
    /// * `form` - The multipart form to send.
    pub async fn send_multipart(&self, method: Method, path: &str, form: Form) -> Result<Value> {
        let builder = self
            .http
            .request(method.clone(), self.url(path))
            .multipart(form);

        tracing::debug!("📡 {} {} (multipart)", method, path);
        self.dispatch(builder).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn dispatch(&self, mut builder: RequestBuilder) -> Result<Value> {
        // Read at call time so a re-login or eviction between calls is picked
        // up. No token, no header.
        if let Some(token) = self.session.current_session().token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::warn!("❌ Network error: {}", e);
            ClientError::Network(e)
        })?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        let data: Option<Value> = if text.trim().is_empty() {
            None
        } else {
            serde_json::from_str(&text).ok()
        };

        if status.is_success() {
            return Ok(data.unwrap_or(Value::Null));
        }

        let message = extract_message(data.as_ref(), status);
        tracing::warn!("❌ API error {}: {}", status.as_u16(), message);

        match status {
            StatusCode::UNAUTHORIZED => Err(ClientError::Authentication { message, data }),
            StatusCode::CONFLICT => Err(ClientError::Conflict { message, data }),
            _ => Err(ClientError::Api {
                message,
                status: status.as_u16(),
                data,
            }),
        }
    }
}

/// Pulls a human-readable message out of an error response body.
///
/// The API reports errors under `detail`, `message`, or `error` depending on
/// the endpoint; the status line is the fallback when none is present.
fn extract_message(data: Option<&Value>, status: StatusCode) -> String {
    if let Some(data) = data {
        for key in ["detail", "message", "error"] {
            if let Some(msg) = data.get(key).and_then(Value::as_str) {
                return msg.to_string();
            }
        }
    }
    status
        .canonical_reason()
        .unwrap_or("Request failed")
        .to_string()
}
