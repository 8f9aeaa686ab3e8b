//! Per-request session gate.
//!
//! The gate wraps the authentication service attached to the request. It
//! decides whether the current action may run without an identity, exposes
//! the identity to handlers, and sequences identity replacement and logout.
//!
//! Phases move forward only:
//!
//! ```text
//! Unresolved -> Resolved -> Passed | Blocked -> IdentityReplaced -> Terminated
//! ```

use std::sync::Arc;

use authn_session_sdk::{
    AUTHENTICATION_ATTRIBUTE, AuthNSessionError, AuthenticationResult, AuthenticationServiceApi,
    Identity, RequestContext,
};
use serde_json::Value;
use tracing::{debug, info};

use super::events::{AuthEvent, AuthEvents};
use super::routing::normalize_route;
use crate::config::{LogoutRedirect, SessionGateConfig};

/// Where the gate is in the current request's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatePhase {
    /// The authentication service has not been looked up yet.
    Unresolved,
    /// The authentication service is cached for this request.
    Resolved,
    /// The identity check allowed the action to run.
    Passed,
    /// The identity check rejected the action.
    Blocked,
    /// The identity was replaced by the handler.
    IdentityReplaced,
    /// The identity was cleared by a logout. Final.
    Terminated,
}

/// Per-request authentication gate.
pub struct SessionGate {
    config: SessionGateConfig,
    unauthenticated_actions: Vec<String>,
    service: Option<Arc<dyn AuthenticationServiceApi>>,
    events: AuthEvents,
    phase: GatePhase,
}

impl SessionGate {
    #[must_use]
    pub fn new(config: SessionGateConfig, events: AuthEvents) -> Self {
        Self {
            config,
            unauthenticated_actions: Vec::new(),
            service: None,
            events,
            phase: GatePhase::Unresolved,
        }
    }

    #[must_use]
    pub fn phase(&self) -> GatePhase {
        self.phase
    }

    fn ensure_active(&self) -> Result<(), AuthNSessionError> {
        if self.phase == GatePhase::Terminated {
            return Err(AuthNSessionError::RequestTerminated);
        }
        Ok(())
    }

    /// Look up the authentication service attached to the request.
    ///
    /// The first successful lookup is cached for the rest of the request.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the `authentication` attribute is missing,
    /// holds something that is not an authentication service, or holds a
    /// service writing the identity under another attribute than the gate.
    pub fn resolve_service(
        &mut self,
        ctx: &RequestContext,
    ) -> Result<Arc<dyn AuthenticationServiceApi>, AuthNSessionError> {
        if let Some(service) = &self.service {
            return Ok(Arc::clone(service));
        }

        if ctx.attribute(AUTHENTICATION_ATTRIBUTE).is_none() {
            return Err(AuthNSessionError::configuration(
                "the request does not contain the required `authentication` attribute",
            ));
        }

        let service = ctx.authentication().ok_or_else(|| {
            AuthNSessionError::configuration(
                "the `authentication` attribute does not hold an authentication service",
            )
        })?;

        if service.identity_attribute() != self.config.identity_attribute {
            return Err(AuthNSessionError::configuration(format!(
                "the authentication service stores the identity under `{}` but the gate reads `{}`",
                service.identity_attribute(),
                self.config.identity_attribute
            )));
        }

        self.service = Some(Arc::clone(&service));
        if self.phase == GatePhase::Unresolved {
            self.phase = GatePhase::Resolved;
        }
        Ok(service)
    }

    /// Publish `AfterIdentify` when the request was identified by a provider
    /// that neither persists the identity nor re-derives it per request.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the service cannot be resolved.
    pub fn before_handler(&mut self, ctx: &RequestContext) -> Result<(), AuthNSessionError> {
        let service = self.resolve_service(ctx)?;
        let Some(provider) = service.active_provider() else {
            return Ok(());
        };

        let capabilities = provider.capabilities();
        if capabilities.persistent || capabilities.stateless {
            return Ok(());
        }

        self.events.emit(AuthEvent::AfterIdentify {
            provider: provider.name().to_owned(),
            identity: self.current_identity(ctx).cloned(),
        });
        Ok(())
    }

    /// Enforce the identity requirement for `action`.
    ///
    /// Must run before the protected handler executes.
    ///
    /// # Errors
    ///
    /// - `Unauthenticated` if an identity is required and absent
    /// - `RequestTerminated` after a logout
    pub fn check_required(
        &mut self,
        ctx: &RequestContext,
        action: &str,
    ) -> Result<(), AuthNSessionError> {
        self.ensure_active()?;

        if !self.config.require_identity {
            self.phase = GatePhase::Passed;
            return Ok(());
        }

        if self.unauthenticated_actions.iter().any(|allowed| allowed == action) {
            debug!(action, "Action allowed without identity");
            self.phase = GatePhase::Passed;
            return Ok(());
        }

        if self.present_identity(ctx).is_none() {
            debug!(action, "Blocked request without identity");
            self.phase = GatePhase::Blocked;
            return Err(AuthNSessionError::Unauthenticated(
                "no identity found; set `require_identity` to false to skip this check"
                    .to_owned(),
            ));
        }

        self.phase = GatePhase::Passed;
        Ok(())
    }

    /// Replace the list of actions that run without an identity.
    pub fn allow(&mut self, actions: impl IntoIterator<Item = impl Into<String>>) -> &mut Self {
        self.unauthenticated_actions = Vec::new();
        self.add_allowed(actions)
    }

    /// Append actions to the allowlist, skipping ones already present.
    pub fn add_allowed(
        &mut self,
        actions: impl IntoIterator<Item = impl Into<String>>,
    ) -> &mut Self {
        for action in actions {
            let action = action.into();
            if !self.unauthenticated_actions.contains(&action) {
                self.unauthenticated_actions.push(action);
            }
        }
        self
    }

    #[must_use]
    pub fn list_allowed(&self) -> &[String] {
        &self.unauthenticated_actions
    }

    /// The identity attached to the request, if any.
    #[must_use]
    pub fn current_identity<'a>(&self, ctx: &'a RequestContext) -> Option<&'a Identity> {
        ctx.attribute_as::<Identity>(&self.config.identity_attribute)
    }

    /// The attached identity unless it is empty. An empty identity counts as absent.
    fn present_identity<'a>(&self, ctx: &'a RequestContext) -> Option<&'a Identity> {
        self.current_identity(ctx).filter(|identity| !identity.is_empty())
    }

    /// Key-path lookup on the current identity.
    ///
    /// An unresolved path yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `IdentityNotFound` if no identity is attached or it is empty.
    pub fn current_identity_field<'a>(
        &self,
        ctx: &'a RequestContext,
        path: &str,
    ) -> Result<Option<&'a Value>, AuthNSessionError> {
        let identity = self
            .present_identity(ctx)
            .ok_or(AuthNSessionError::IdentityNotFound)?;
        Ok(identity.get(path))
    }

    /// Result of the last identification attempt.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the service cannot be resolved.
    pub fn result(
        &mut self,
        ctx: &RequestContext,
    ) -> Result<Option<AuthenticationResult>, AuthNSessionError> {
        Ok(self.resolve_service(ctx)?.last_result())
    }

    /// Swap the current identity for `identity`.
    ///
    /// The identity is always cleared first and then persisted, so that
    /// providers observe a logout followed by a login and rotate session
    /// identifiers accordingly. Returns the context the caller must adopt.
    ///
    /// # Errors
    ///
    /// - `Configuration` if the service cannot be resolved
    /// - `Provider` if clearing or persisting fails
    /// - `RequestTerminated` after a logout
    pub async fn replace_identity(
        &mut self,
        ctx: RequestContext,
        identity: Identity,
    ) -> Result<RequestContext, AuthNSessionError> {
        self.ensure_active()?;
        let service = self.resolve_service(&ctx)?;

        let ctx = service.clear_identity(ctx).await?;
        let ctx = service.persist_identity(ctx, &identity).await?;

        self.phase = GatePhase::IdentityReplaced;
        info!(identifier = ?identity.identifier(), "Identity replaced");
        Ok(ctx)
    }

    /// Log the user out.
    ///
    /// Clears the identity, publishes [`AuthEvent::Logout`] and returns the
    /// normalized logout redirect, or `None` when redirects are disabled.
    ///
    /// # Errors
    ///
    /// - `Configuration` if the service cannot be resolved
    /// - `Provider` if clearing fails
    /// - `RequestTerminated` if the request was already terminated
    pub async fn terminate(
        &mut self,
        ctx: RequestContext,
    ) -> Result<(RequestContext, Option<String>), AuthNSessionError> {
        self.ensure_active()?;
        let service = self.resolve_service(&ctx)?;

        let ctx = service.clear_identity(ctx).await?;
        self.phase = GatePhase::Terminated;
        self.events.emit(AuthEvent::Logout);

        let redirect = match &self.config.logout_redirect {
            LogoutRedirect::Disabled => None,
            LogoutRedirect::To(route) => Some(normalize_route(route, ctx.base())),
        };
        info!(redirect = ?redirect, "Logged out");
        Ok((ctx, redirect))
    }

    /// Where the user was headed before being sent to log in.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the service cannot be resolved.
    pub fn login_redirect_target(
        &mut self,
        ctx: &RequestContext,
    ) -> Result<Option<String>, AuthNSessionError> {
        Ok(self.resolve_service(ctx)?.login_redirect(ctx))
    }
}
