//! Public API trait for the authentication service.
//!
//! The session gate only talks to the service through this trait, so any
//! value attached under the `authentication` attribute must implement it.

use std::sync::Arc;

use async_trait::async_trait;

use crate::context::RequestContext;
use crate::error::AuthNSessionError;
use crate::models::{AuthenticationResult, Identity};
use crate::plugin_api::IdentityProvider;

/// Public API trait for the authentication service.
///
/// One instance lives for exactly one request:
///
/// ```ignore
/// let service = ctx.authentication().ok_or(...)?;
/// let result = service.identify(&ctx).await?;
/// let ctx = service.persist_identity(ctx, &identity).await?;
/// ```
#[async_trait]
pub trait AuthenticationServiceApi: Send + Sync {
    /// Ask the configured providers, in precedence order, who is calling.
    ///
    /// # Errors
    ///
    /// - `Configuration` if no provider is configured
    /// - `Provider` if a provider observed request cancellation or timeout
    async fn identify(&self, ctx: &RequestContext)
    -> Result<AuthenticationResult, AuthNSessionError>;

    /// Store `identity` in every persistent provider and attach it to the context.
    ///
    /// # Errors
    ///
    /// - `Provider` for the first provider fault; faults are never swallowed
    async fn persist_identity(
        &self,
        ctx: RequestContext,
        identity: &Identity,
    ) -> Result<RequestContext, AuthNSessionError>;

    /// Remove the identity from every persistent provider and from the context.
    ///
    /// # Errors
    ///
    /// - `Provider` for the first provider fault; faults are never swallowed
    async fn clear_identity(&self, ctx: RequestContext)
    -> Result<RequestContext, AuthNSessionError>;

    /// Provider that produced the last successful identification.
    fn active_provider(&self) -> Option<Arc<dyn IdentityProvider>>;

    /// Result of the last identification attempt.
    ///
    /// Cleared together with the active provider when an attempt starts, so
    /// an attempt aborted by cancellation leaves both empty.
    fn last_result(&self) -> Option<AuthenticationResult>;

    /// Where the user was headed before being sent to log in.
    fn login_redirect(&self, ctx: &RequestContext) -> Option<String>;

    /// Request attribute that `persist_identity` and `clear_identity` write to.
    fn identity_attribute(&self) -> &str;
}
