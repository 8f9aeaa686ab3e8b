//! Identity provider implementation for the session service.
//!
//! Implements `IdentityProvider` using the domain service.

use async_trait::async_trait;
use authn_session_sdk::{
    AuthenticationResult, Identity, IdentityProvider, ProviderCapabilities, ProviderError,
    RequestContext,
};
use http::HeaderValue;
use http::header::SET_COOKIE;
use tracing::debug;

use super::service::Service;

impl Service {
    fn issue_cookie(&self, ctx: &mut RequestContext, session_id: &str) -> Result<(), ProviderError> {
        let cookie = HeaderValue::from_str(&self.cookie(session_id))
            .map_err(|e| ProviderError::Internal(format!("invalid session cookie: {e}")))?;
        ctx.response_headers_mut().insert(SET_COOKIE, cookie);
        Ok(())
    }
}

#[async_trait]
impl IdentityProvider for Service {
    fn name(&self) -> &str {
        self.name()
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::PERSISTENT
    }

    async fn identify(&self, ctx: &RequestContext) -> Result<AuthenticationResult, ProviderError> {
        Ok(self.lookup(ctx.session()))
    }

    async fn persist_identity(
        &self,
        mut ctx: RequestContext,
        identity: &Identity,
    ) -> Result<RequestContext, ProviderError> {
        let session_id = self.store(ctx.session_mut(), identity);
        self.issue_cookie(&mut ctx, &session_id)?;
        debug!("Identity written to session");
        Ok(ctx)
    }

    async fn clear_identity(&self, mut ctx: RequestContext) -> Result<RequestContext, ProviderError> {
        let session_id = self.forget(ctx.session_mut());
        self.issue_cookie(&mut ctx, &session_id)?;
        debug!("Identity removed from session");
        Ok(ctx)
    }
}
