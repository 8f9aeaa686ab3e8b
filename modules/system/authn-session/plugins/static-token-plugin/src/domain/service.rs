//! Service implementation for the static token identity provider.

use authn_session_sdk::{AuthenticationResult, FailureReason, Identity};
use secrecy::ExposeSecret;
use tracing::{info, warn};

use crate::config::{StaticTokenPluginConfig, TokenMapping, TokenMode};

/// Static token identity service.
///
/// Maps bearer tokens to identities based on configuration mode:
/// - `accept_all`: Any non-empty token maps to the default identity
/// - `static_tokens`: Specific tokens map to specific identities
#[derive(Debug)]
pub struct Service {
    name: String,
    mode: TokenMode,
    default_identity: Identity,
    tokens: Vec<TokenMapping>,
}

impl Service {
    /// Create a service from plugin configuration.
    #[must_use]
    pub fn from_config(cfg: &StaticTokenPluginConfig) -> Self {
        if cfg.mode == TokenMode::AcceptAll {
            warn!(
                "Static token provider is running in `accept_all` mode: \
                 every bearer token is accepted with the default identity. \
                 Do NOT use this mode in production."
            );
        }

        info!(
            name = %cfg.name,
            mode = ?cfg.mode,
            token_count = cfg.tokens.len(),
            "Loaded static token provider configuration"
        );

        Self {
            name: cfg.name.clone(),
            mode: cfg.mode,
            default_identity: cfg.default_identity.clone(),
            tokens: cfg.tokens.clone(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Authenticate a bearer token.
    #[must_use]
    pub fn authenticate(&self, bearer_token: &str) -> AuthenticationResult {
        if bearer_token.is_empty() {
            return AuthenticationResult::failure(FailureReason::CredentialsMissing);
        }

        let identity = match self.mode {
            TokenMode::AcceptAll => Some(&self.default_identity),
            TokenMode::StaticTokens => self
                .tokens
                .iter()
                .find(|mapping| mapping.token.expose_secret() == bearer_token)
                .map(|mapping| &mapping.identity),
        };

        identity.map_or_else(
            || AuthenticationResult::failure(FailureReason::CredentialsInvalid),
            |identity| AuthenticationResult::success(identity.clone()),
        )
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use serde_json::json;
    use tracing_test::traced_test;

    use super::*;

    fn identity(value: serde_json::Value) -> Identity {
        Identity::from_value(value).unwrap()
    }

    fn static_tokens(tokens: Vec<TokenMapping>) -> StaticTokenPluginConfig {
        StaticTokenPluginConfig {
            mode: TokenMode::StaticTokens,
            tokens,
            ..StaticTokenPluginConfig::default()
        }
    }

    #[test]
    fn accept_all_mode_returns_default_identity() {
        let service = Service::from_config(&StaticTokenPluginConfig::default());

        let result = service.authenticate("any-token-value");

        assert_eq!(
            result.identity().and_then(Identity::identifier),
            Some(&json!("developer"))
        );
    }

    #[test]
    #[traced_test]
    fn accept_all_mode_warns_at_construction() {
        let _service = Service::from_config(&StaticTokenPluginConfig::default());

        assert!(logs_contain("accept_all"));
    }

    #[test]
    fn empty_token_is_missing_credentials() {
        let service = Service::from_config(&StaticTokenPluginConfig::default());

        assert_eq!(
            service.authenticate("").reason(),
            Some(FailureReason::CredentialsMissing)
        );
    }

    #[test]
    fn static_tokens_mode_returns_mapped_identity() {
        let service = Service::from_config(&static_tokens(vec![
            TokenMapping {
                token: "token-ada".into(),
                identity: identity(json!({ "id": 1, "username": "ada" })),
            },
            TokenMapping {
                token: "token-bob".into(),
                identity: identity(json!({ "id": 2, "username": "bob" })),
            },
        ]));

        let result = service.authenticate("token-bob");

        assert!(result.is_valid());
        assert_eq!(
            result.identity().and_then(|i| i.get("username")),
            Some(&json!("bob"))
        );
    }

    #[test]
    fn static_tokens_mode_rejects_unknown_token() {
        let service = Service::from_config(&static_tokens(vec![TokenMapping {
            token: "known-token".into(),
            identity: identity(json!({ "id": 1 })),
        }]));

        let result = service.authenticate("unknown-token");

        assert_eq!(result.reason(), Some(FailureReason::CredentialsInvalid));
    }
}
