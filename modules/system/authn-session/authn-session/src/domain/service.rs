//! Request-scoped authentication service.

use std::sync::Arc;

use async_trait::async_trait;
use authn_session_sdk::{
    AuthNSessionError, AuthenticationResult, AuthenticationServiceApi, FailureReason, Identity,
    IdentityProvider, RequestContext,
};
use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use super::registry::ProviderRegistry;
use super::routing::sanitize_login_redirect;
use crate::config::AuthenticationServiceConfig;

#[derive(Default)]
struct ServiceState {
    active: Option<Arc<dyn IdentityProvider>>,
    last: Option<AuthenticationResult>,
}

/// Authentication service.
///
/// Holds the configured providers and the outcome of the last
/// identification. Built for one request and dropped with it.
pub struct AuthenticationService {
    registry: ProviderRegistry,
    config: AuthenticationServiceConfig,
    state: Mutex<ServiceState>,
}

impl AuthenticationService {
    #[must_use]
    pub fn new(registry: ProviderRegistry, config: AuthenticationServiceConfig) -> Self {
        Self {
            registry,
            config,
            state: Mutex::new(ServiceState::default()),
        }
    }

    fn record(&self, active: Option<Arc<dyn IdentityProvider>>, result: &AuthenticationResult) {
        let mut state = self.state.lock();
        state.active = active;
        state.last = Some(result.clone());
    }

    fn reset(&self) {
        let mut state = self.state.lock();
        state.active = None;
        state.last = None;
    }
}

#[async_trait]
impl AuthenticationServiceApi for AuthenticationService {
    #[tracing::instrument(skip_all)]
    async fn identify(
        &self,
        ctx: &RequestContext,
    ) -> Result<AuthenticationResult, AuthNSessionError> {
        if self.registry.is_empty() {
            return Err(AuthNSessionError::configuration(
                "no identity providers configured",
            ));
        }

        self.reset();
        let mut faults: Vec<String> = Vec::new();

        for provider in self.registry.iter() {
            match provider.identify(ctx).await {
                Ok(AuthenticationResult::Pending) => {
                    debug!(provider = provider.name(), "Provider has no credentials for request");
                }
                Ok(result) => {
                    debug!(
                        provider = provider.name(),
                        valid = result.is_valid(),
                        "Provider decided authentication"
                    );
                    let active = result.is_valid().then(|| Arc::clone(provider));
                    self.record(active, &result);
                    return Ok(result);
                }
                Err(e) if e.is_cancellation() => {
                    return Err(AuthNSessionError::provider(provider.name(), e));
                }
                Err(e) => {
                    warn!(
                        provider = provider.name(),
                        error = %e,
                        "Identity provider failed, trying next"
                    );
                    faults.push(format!("{}: {e}", provider.name()));
                }
            }
        }

        let result = if faults.is_empty() {
            AuthenticationResult::Pending
        } else {
            AuthenticationResult::failure_with_errors(FailureReason::ProviderException, faults)
        };
        self.record(None, &result);
        Ok(result)
    }

    #[tracing::instrument(skip_all)]
    async fn persist_identity(
        &self,
        mut ctx: RequestContext,
        identity: &Identity,
    ) -> Result<RequestContext, AuthNSessionError> {
        for provider in self.registry.persistent() {
            ctx = provider
                .persist_identity(ctx, identity)
                .await
                .map_err(|e| {
                    error!(provider = provider.name(), error = %e, "Failed to persist identity");
                    AuthNSessionError::provider(provider.name(), e)
                })?;
        }

        ctx.insert_attribute(self.config.identity_attribute.clone(), identity.clone());
        info!("Identity persisted");
        Ok(ctx)
    }

    #[tracing::instrument(skip_all)]
    async fn clear_identity(
        &self,
        mut ctx: RequestContext,
    ) -> Result<RequestContext, AuthNSessionError> {
        for provider in self.registry.persistent() {
            ctx = provider.clear_identity(ctx).await.map_err(|e| {
                error!(provider = provider.name(), error = %e, "Failed to clear identity");
                AuthNSessionError::provider(provider.name(), e)
            })?;
        }

        ctx.remove_attribute(&self.config.identity_attribute);
        info!("Identity cleared");
        Ok(ctx)
    }

    fn active_provider(&self) -> Option<Arc<dyn IdentityProvider>> {
        self.state.lock().active.clone()
    }

    fn last_result(&self) -> Option<AuthenticationResult> {
        self.state.lock().last.clone()
    }

    fn login_redirect(&self, ctx: &RequestContext) -> Option<String> {
        let param = self.config.query_param.as_deref()?;
        sanitize_login_redirect(ctx.query(param)?)
    }

    fn identity_attribute(&self) -> &str {
        &self.config.identity_attribute
    }
}
