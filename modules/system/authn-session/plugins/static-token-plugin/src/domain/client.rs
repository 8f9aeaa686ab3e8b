//! Identity provider implementation for the static token service.
//!
//! Implements `IdentityProvider` on top of the domain service.

use async_trait::async_trait;
use authn_session_sdk::{
    AuthenticationResult, FailureReason, IdentityProvider, ProviderCapabilities, ProviderError,
    RequestContext,
};
use http::header::AUTHORIZATION;
use tracing::debug;

use super::service::Service;

const BEARER_SCHEME: &str = "bearer";

#[async_trait]
impl IdentityProvider for Service {
    fn name(&self) -> &str {
        self.name()
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::STATELESS
    }

    async fn identify(&self, ctx: &RequestContext) -> Result<AuthenticationResult, ProviderError> {
        let Some(header) = ctx.headers().get(AUTHORIZATION) else {
            return Ok(AuthenticationResult::Pending);
        };

        let Ok(header) = header.to_str() else {
            debug!("Authorization header is not valid ASCII");
            return Ok(AuthenticationResult::failure(
                FailureReason::CredentialsInvalid,
            ));
        };

        let (scheme, token) = header.split_once(' ').unwrap_or((header, ""));
        if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
            // Another provider's credentials.
            return Ok(AuthenticationResult::Pending);
        }

        Ok(self.authenticate(token.trim()))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use authn_session_sdk::Identity;
    use http::{HeaderValue, Method};
    use serde_json::json;

    use super::*;
    use crate::config::{StaticTokenPluginConfig, TokenMapping, TokenMode};

    fn provider() -> Service {
        Service::from_config(&StaticTokenPluginConfig {
            mode: TokenMode::StaticTokens,
            tokens: vec![TokenMapping {
                token: "token-ada".into(),
                identity: Identity::from_value(json!({ "id": 1 })).unwrap(),
            }],
            ..StaticTokenPluginConfig::default()
        })
    }

    fn request(authorization: &'static str) -> RequestContext {
        RequestContext::new(Method::GET, "/")
            .with_header(AUTHORIZATION, HeaderValue::from_static(authorization))
    }

    #[tokio::test]
    async fn plugin_trait_is_stateless() {
        let service = provider();
        let plugin: &dyn IdentityProvider = &service;

        assert_eq!(plugin.name(), "static_token");
        assert_eq!(plugin.capabilities(), ProviderCapabilities::STATELESS);
    }

    #[tokio::test]
    async fn missing_header_is_pending() {
        let result = provider()
            .identify(&RequestContext::new(Method::GET, "/"))
            .await
            .unwrap();

        assert!(result.is_pending());
    }

    #[tokio::test]
    async fn other_scheme_is_pending() {
        let result = provider().identify(&request("Basic YWRhOnB3")).await.unwrap();

        assert!(result.is_pending());
    }

    #[tokio::test]
    async fn known_bearer_token_succeeds() {
        let result = provider().identify(&request("Bearer token-ada")).await.unwrap();

        assert_eq!(
            result.identity().and_then(Identity::identifier),
            Some(&json!(1))
        );
    }

    #[tokio::test]
    async fn scheme_is_case_insensitive() {
        let result = provider().identify(&request("bearer token-ada")).await.unwrap();

        assert!(result.is_valid());
    }

    #[tokio::test]
    async fn empty_bearer_token_is_missing_credentials() {
        let result = provider().identify(&request("Bearer")).await.unwrap();

        assert_eq!(result.reason(), Some(FailureReason::CredentialsMissing));
    }

    #[tokio::test]
    async fn unknown_bearer_token_is_invalid() {
        let result = provider().identify(&request("Bearer nope")).await.unwrap();

        assert_eq!(result.reason(), Some(FailureReason::CredentialsInvalid));
    }
}
