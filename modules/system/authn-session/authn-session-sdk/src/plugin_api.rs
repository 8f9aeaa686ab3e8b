//! Plugin API trait for identity providers.
//!
//! Providers implement a single identification strategy (session, bearer
//! token, ...). The authentication service holds them in precedence order
//! and delegates to them.

use async_trait::async_trait;

use crate::context::RequestContext;
use crate::error::ProviderError;
use crate::models::{AuthenticationResult, Identity};

/// Capability flags a provider is tagged with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProviderCapabilities {
    /// Stores the identity across requests (e.g. session based).
    pub persistent: bool,
    /// Re-derives the identity on every request from supplied credentials.
    pub stateless: bool,
}

impl ProviderCapabilities {
    pub const NONE: Self = Self {
        persistent: false,
        stateless: false,
    };

    pub const PERSISTENT: Self = Self {
        persistent: true,
        stateless: false,
    };

    pub const STATELESS: Self = Self {
        persistent: false,
        stateless: true,
    };
}

/// Plugin API trait for identity providers.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Stable provider name, unique within one service.
    fn name(&self) -> &str;

    fn capabilities(&self) -> ProviderCapabilities;

    /// Identify the caller of this request.
    ///
    /// Return `Pending` when the request carries none of this provider's
    /// credentials so that lower-precedence providers are consulted.
    ///
    /// # Errors
    ///
    /// - `Internal` / `Unavailable` for provider faults
    /// - `Cancelled` / `TimedOut` when the request lifecycle ends the call
    async fn identify(&self, ctx: &RequestContext) -> Result<AuthenticationResult, ProviderError>;

    /// Persist the identity into session or token state.
    ///
    /// # Errors
    ///
    /// Any provider fault; the caller propagates it.
    async fn persist_identity(
        &self,
        ctx: RequestContext,
        _identity: &Identity,
    ) -> Result<RequestContext, ProviderError> {
        Ok(ctx)
    }

    /// Remove the identity from session or token state.
    ///
    /// # Errors
    ///
    /// Any provider fault; the caller propagates it.
    async fn clear_identity(&self, ctx: RequestContext) -> Result<RequestContext, ProviderError> {
        Ok(ctx)
    }
}
