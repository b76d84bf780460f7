use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::fetch::FetchBinding;
use crate::gateway::Gateway;
use crate::services::auth::{PasswordResetFlow, RegistrationFlow};
use crate::services::google::GoogleSignIn;
use crate::session::store::SessionStore;
use crate::storage::file::FileStore;
use crate::storage::memory::MemoryStore;

/// The assembled client: configuration, session store, and gateway.
///
/// Wires the durable tier to a file-backed store at the configured path and
/// the ephemeral tier to an in-memory store, then hands both to the session
/// store every other component reads from.
#[derive(Clone)]
pub struct TaskdeckClient {
    /// The client's configuration.
    pub config: Config,
    /// The session store.
    pub session: SessionStore,
    /// The authenticated request gateway.
    pub gateway: Gateway,
}

impl TaskdeckClient {
    /// Creates a new `TaskdeckClient`.
    ///
    /// # Arguments
    ///
    /// * `config` - The client's configuration.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `TaskdeckClient`.
    pub fn new(config: &Config) -> Result<Self> {
        let durable = Arc::new(FileStore::new(&config.session_path));
        let ephemeral = Arc::new(MemoryStore::new());
        let session = SessionStore::new(durable, ephemeral);
        tracing::info!(
            "✅ Session store initialized (durable tier at {})",
            config.session_path.display()
        );

        let gateway = Gateway::new(config, session.clone())?;

        Ok(Self {
            config: config.clone(),
            session,
            gateway,
        })
    }

    /// Creates a fresh fetch binding over this client's gateway.
    pub fn fetch(&self) -> FetchBinding {
        FetchBinding::new(self.gateway.clone())
    }

    /// Creates a registration flow.
    pub fn registration(&self) -> RegistrationFlow {
        RegistrationFlow::new(self.gateway.clone())
    }

    /// Creates a password reset flow.
    pub fn password_reset(&self) -> PasswordResetFlow {
        PasswordResetFlow::new(self.gateway.clone())
    }

    /// Creates the Google sign-in handler, when configured.
    pub fn google(&self) -> Result<GoogleSignIn> {
        GoogleSignIn::new(self.gateway.clone(), self.config.google_client_id.clone())
    }
}
