//! Configuration for the `AuthN` session module.

use std::path::Path;

use anyhow::Context;
use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use authn_session_sdk::DEFAULT_IDENTITY_ATTRIBUTE;

/// Prefix of environment variables overriding file configuration.
///
/// Nested keys are separated by `__`, e.g. `AUTHN_SESSION__GATE__REQUIRE_IDENTITY=false`.
pub const ENV_PREFIX: &str = "AUTHN_SESSION__";

/// Where to send the user after logout.
///
/// Deserializes from `false` (no redirect) or a route string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawLogoutRedirect")]
pub enum LogoutRedirect {
    #[default]
    Disabled,
    To(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLogoutRedirect {
    Flag(bool),
    Route(String),
}

impl TryFrom<RawLogoutRedirect> for LogoutRedirect {
    type Error = String;

    fn try_from(raw: RawLogoutRedirect) -> Result<Self, Self::Error> {
        match raw {
            RawLogoutRedirect::Flag(false) => Ok(Self::Disabled),
            RawLogoutRedirect::Flag(true) => {
                Err("`logout_redirect` must be `false` or a route, not `true`".to_owned())
            }
            RawLogoutRedirect::Route(route) if route.trim().is_empty() => {
                Err("`logout_redirect` route must not be empty".to_owned())
            }
            RawLogoutRedirect::Route(route) => Ok(Self::To(route)),
        }
    }
}

/// Session gate configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionGateConfig {
    /// Route returned by `terminate`, or disabled.
    pub logout_redirect: LogoutRedirect,

    /// Require an identity for every action not on the allowlist.
    pub require_identity: bool,

    /// Request attribute holding the current identity.
    pub identity_attribute: String,
}

impl Default for SessionGateConfig {
    fn default() -> Self {
        Self {
            logout_redirect: LogoutRedirect::Disabled,
            require_identity: true,
            identity_attribute: DEFAULT_IDENTITY_ATTRIBUTE.to_owned(),
        }
    }
}

/// Authentication service configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthenticationServiceConfig {
    /// Request attribute the service writes the identity to.
    pub identity_attribute: String,

    /// Query parameter carrying the pre-login target URL.
    pub query_param: Option<String>,
}

impl Default for AuthenticationServiceConfig {
    fn default() -> Self {
        Self {
            identity_attribute: DEFAULT_IDENTITY_ATTRIBUTE.to_owned(),
            query_param: None,
        }
    }
}

/// Load configuration from an optional YAML file overlaid with
/// [`ENV_PREFIX`] environment variables.
///
/// # Errors
///
/// Returns an error if the file does not exist or the merged
/// configuration does not deserialize into `T`.
pub fn load_config<T: DeserializeOwned>(path: Option<&Path>) -> anyhow::Result<T> {
    let mut figment = Figment::new();

    if let Some(path) = path {
        anyhow::ensure!(
            path.is_file(),
            "configuration file '{}' not found",
            path.display()
        );
        figment = figment.merge(Yaml::file(path));
    }

    figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .context("invalid authn session configuration")
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::io::Write;

    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default, deny_unknown_fields)]
    struct Sections {
        gate: SessionGateConfig,
        service: AuthenticationServiceConfig,
    }

    #[test]
    fn gate_defaults() {
        let cfg = SessionGateConfig::default();

        assert_eq!(cfg.logout_redirect, LogoutRedirect::Disabled);
        assert!(cfg.require_identity);
        assert_eq!(cfg.identity_attribute, "identity");
    }

    #[test]
    fn logout_redirect_accepts_false_or_route() {
        let disabled: SessionGateConfig =
            serde_json::from_value(json!({ "logout_redirect": false })).unwrap();
        assert_eq!(disabled.logout_redirect, LogoutRedirect::Disabled);

        let route: SessionGateConfig =
            serde_json::from_value(json!({ "logout_redirect": "/login" })).unwrap();
        assert_eq!(route.logout_redirect, LogoutRedirect::To("/login".to_owned()));
    }

    #[test]
    fn logout_redirect_rejects_true_and_empty() {
        assert!(serde_json::from_value::<SessionGateConfig>(json!({ "logout_redirect": true })).is_err());
        assert!(serde_json::from_value::<SessionGateConfig>(json!({ "logout_redirect": "  " })).is_err());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = serde_json::from_value::<SessionGateConfig>(json!({ "requireIdentity": false }));

        assert!(result.is_err());
    }

    #[test]
    fn load_config_reads_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "gate:\n  logout_redirect: /users/login\n  require_identity: false\nservice:\n  query_param: redirect"
        )
        .unwrap();

        let cfg: Sections = load_config(Some(file.path())).unwrap();

        assert_eq!(
            cfg.gate.logout_redirect,
            LogoutRedirect::To("/users/login".to_owned())
        );
        assert!(!cfg.gate.require_identity);
        assert_eq!(cfg.gate.identity_attribute, "identity");
        assert_eq!(cfg.service.query_param.as_deref(), Some("redirect"));
    }

    #[test]
    fn load_config_without_file_uses_defaults() {
        let cfg: Sections = load_config(None).unwrap();

        assert!(cfg.gate.require_identity);
        assert!(cfg.service.query_param.is_none());
    }

    #[test]
    fn load_config_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.yaml");

        let err = load_config::<Sections>(Some(&missing)).unwrap_err();

        assert!(err.to_string().contains("not found"));
    }
}
