//! Client SDK for the Taskdeck task/project management API.
//!
//! The crate's core is the session/authentication lifecycle and the generic
//! API-access layer: a two-tier [`session::store::SessionStore`], the
//! [`gateway::Gateway`] every request routes through, the
//! [`fetch::FetchBinding`] that drives per-screen request state, and the auth
//! flows in [`services`]. The typed modules under [`api`] are the consumer
//! surface for tasks, projects, profiles, and file assets.

pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod gateway;

pub mod storage {
    pub mod file;
    pub mod kv;
    pub mod memory;
}

pub mod models {
    pub mod asset;
    pub mod project;
    pub mod session;
    pub mod task;
    pub mod user;
}

pub mod session {
    pub mod store;
    pub mod token;
}

pub mod api {
    pub mod assets;
    pub mod projects;
    pub mod tasks;
    pub mod users;
}

pub mod services {
    pub mod auth;
    pub mod google;
    pub mod otp;
}

pub mod validation {
    pub mod auth;
}

pub use client::TaskdeckClient;
pub use config::Config;
pub use error::{ClientError, Result};

/// Initializes the tracing subscriber from `RUST_LOG` and loads `.env`.
///
/// Call once at startup from the embedding application; library code only
/// emits events.
pub fn init() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
}
