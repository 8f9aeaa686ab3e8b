//! Service implementation for the session identity provider.

use authn_session_sdk::{AuthenticationResult, FailureReason, Identity, Session};
use tracing::{debug, info};

use crate::config::SessionPluginConfig;

/// Session identity service.
#[derive(Debug, Clone)]
pub struct Service {
    name: String,
    session_key: String,
    cookie_name: String,
    cookie_path: String,
}

impl Service {
    /// Create a service from plugin configuration.
    #[must_use]
    pub fn from_config(cfg: &SessionPluginConfig) -> Self {
        info!(
            name = %cfg.name,
            session_key = %cfg.session_key,
            cookie_name = %cfg.cookie_name,
            "Loaded session provider configuration"
        );

        Self {
            name: cfg.name.clone(),
            session_key: cfg.session_key.clone(),
            cookie_name: cfg.cookie_name.clone(),
            cookie_path: cfg.cookie_path.clone(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read the identity stored in `session`.
    ///
    /// A session without the key carries no credentials for this provider
    /// and yields `Pending`.
    #[must_use]
    pub fn lookup(&self, session: &Session) -> AuthenticationResult {
        let Some(stored) = session.get(&self.session_key) else {
            return AuthenticationResult::Pending;
        };

        match Identity::from_value(stored.clone()) {
            Some(identity) if !identity.is_empty() => AuthenticationResult::success(identity),
            _ => {
                debug!(session_key = %self.session_key, "Session holds malformed identity");
                AuthenticationResult::failure(FailureReason::CredentialsInvalid)
            }
        }
    }

    /// Rotate the session id and store `identity`. Returns the new id.
    pub fn store(&self, session: &mut Session, identity: &Identity) -> String {
        let id = session.renew();
        session.insert(self.session_key.clone(), identity.clone().into_value());
        id
    }

    /// Drop the stored identity and rotate the session id. Returns the new id.
    pub fn forget(&self, session: &mut Session) -> String {
        session.remove(&self.session_key);
        session.renew()
    }

    /// `Set-Cookie` value announcing `session_id` to the client.
    #[must_use]
    pub fn cookie(&self, session_id: &str) -> String {
        format!(
            "{}={session_id}; Path={}; HttpOnly",
            self.cookie_name, self.cookie_path
        )
    }
}
