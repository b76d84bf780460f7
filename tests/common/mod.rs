use std::path::PathBuf;
use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde_json::{json, Value};

use taskdeck_client::config::Config;
use taskdeck_client::gateway::Gateway;
use taskdeck_client::session::store::SessionStore;
use taskdeck_client::storage::kv::KeyValueStore;
use taskdeck_client::storage::memory::MemoryStore;

/// Forges an unsigned JWT-shaped token with the given claims payload.
pub fn forge_token(payload: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string().as_bytes());
    format!("{}.{}.sig", header, body)
}

/// A token whose expiry is one hour in the future.
pub fn fresh_token() -> String {
    forge_token(&json!({
        "exp": chrono::Utc::now().timestamp() + 3600,
        "user_id": 42,
    }))
}

/// The canonical user object the mock API responds with.
pub fn user_json() -> Value {
    json!({
        "id": "5f64a3c2-7a10-4c7a-9c36-3f1e90b2a111",
        "email": "jo@example.com",
        "username": "josmith",
        "first_name": "Jo",
        "last_name": "Smith",
    })
}

/// A `{access, refresh, user}` login response body.
pub fn login_body() -> Value {
    json!({
        "access": fresh_token(),
        "refresh": "refresh-token",
        "user": user_json(),
    })
}

pub fn test_config(base_url: &str) -> Config {
    Config {
        api_base_url: base_url.trim_end_matches('/').to_string(),
        google_client_id: Some("test-client-id".to_string()),
        session_path: PathBuf::from("unused"),
        request_timeout_secs: 5,
    }
}

/// A gateway over in-memory tiers, pointed at the given mock server URL.
pub fn test_gateway(base_url: &str) -> (Gateway, SessionStore) {
    test_gateway_with_durable(base_url, Arc::new(MemoryStore::new()))
}

/// Same, but with a caller-provided durable tier (for restart simulations).
pub fn test_gateway_with_durable(
    base_url: &str,
    durable: Arc<dyn KeyValueStore>,
) -> (Gateway, SessionStore) {
    let session = SessionStore::new(durable, Arc::new(MemoryStore::new()));
    let gateway = Gateway::new(&test_config(base_url), session.clone()).unwrap();
    (gateway, session)
}
