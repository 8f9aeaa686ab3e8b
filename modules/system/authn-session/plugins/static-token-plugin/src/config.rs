//! Configuration for the static token identity provider.

use authn_session_sdk::Identity;
use secrecy::SecretString;
use serde::Deserialize;
use serde_json::json;

/// Plugin configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticTokenPluginConfig {
    /// Provider name registered with the authentication service.
    pub name: String,

    /// Authentication mode.
    pub mode: TokenMode,

    /// Identity returned in `accept_all` mode.
    pub default_identity: Identity,

    /// Static token-to-identity mappings for `static_tokens` mode.
    pub tokens: Vec<TokenMapping>,
}

impl Default for StaticTokenPluginConfig {
    fn default() -> Self {
        Self {
            name: "static_token".to_owned(),
            mode: TokenMode::AcceptAll,
            default_identity: default_identity(),
            tokens: Vec::new(),
        }
    }
}

fn default_identity() -> Identity {
    Identity::from_value(json!({ "id": "developer", "roles": ["*"] })).unwrap_or_default()
}

/// Authentication mode.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TokenMode {
    /// Accept any non-empty token and return the default identity.
    #[default]
    AcceptAll,
    /// Map specific tokens to specific identities.
    StaticTokens,
}

/// Maps a static token to a specific identity.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenMapping {
    /// The bearer token value to match.
    pub token: SecretString,
    /// The identity to return when this token is presented.
    pub identity: Identity,
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn defaults_accept_all_with_developer_identity() {
        let cfg = StaticTokenPluginConfig::default();

        assert_eq!(cfg.name, "static_token");
        assert_eq!(cfg.mode, TokenMode::AcceptAll);
        assert_eq!(cfg.default_identity.identifier(), Some(&json!("developer")));
        assert!(cfg.tokens.is_empty());
    }

    #[test]
    fn deserializes_token_mappings() {
        let cfg: StaticTokenPluginConfig = serde_json::from_value(json!({
            "mode": "static_tokens",
            "tokens": [{ "token": "token-ada", "identity": { "id": 1 } }]
        }))
        .unwrap();

        assert_eq!(cfg.mode, TokenMode::StaticTokens);
        assert_eq!(cfg.tokens[0].token.expose_secret(), "token-ada");
        assert_eq!(cfg.tokens[0].identity.identifier(), Some(&json!(1)));
    }

    #[test]
    fn debug_redacts_tokens() {
        let cfg: StaticTokenPluginConfig = serde_json::from_value(json!({
            "tokens": [{ "token": "super-secret", "identity": { "id": 1 } }]
        }))
        .unwrap();

        assert!(!format!("{cfg:?}").contains("super-secret"));
    }
}
