//! Configuration for the session identity provider.

use serde::Deserialize;

/// Plugin configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionPluginConfig {
    /// Provider name registered with the authentication service.
    pub name: String,

    /// Session key holding the identity.
    pub session_key: String,

    /// Name of the session cookie re-issued on rotation.
    pub cookie_name: String,

    /// `Path` attribute of the session cookie.
    pub cookie_path: String,
}

impl Default for SessionPluginConfig {
    fn default() -> Self {
        Self {
            name: "session".to_owned(),
            session_key: "Auth".to_owned(),
            cookie_name: "sid".to_owned(),
            cookie_path: "/".to_owned(),
        }
    }
}
