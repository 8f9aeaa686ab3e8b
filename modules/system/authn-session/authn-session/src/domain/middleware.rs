//! Upstream authentication step run before the session gate.

use std::sync::Arc;

use authn_session_sdk::{
    AuthNSessionError, AuthenticationResult, AuthenticationServiceApi, RequestContext,
};
use tracing::debug;

use super::service::AuthenticationService;

/// Attach `service` to the request and identify the caller.
///
/// On success the identity is written to the service's identity attribute,
/// where the gate and handlers read it.
///
/// # Errors
///
/// Propagates `Configuration` and unrecovered `Provider` errors from
/// [`AuthenticationServiceApi::identify`].
pub async fn authenticate_request(
    service: Arc<AuthenticationService>,
    ctx: RequestContext,
) -> Result<(RequestContext, AuthenticationResult), AuthNSessionError> {
    let mut ctx = ctx.attach_authentication(service.clone());
    let result = service.identify(&ctx).await?;

    if let Some(identity) = result.identity() {
        ctx.insert_attribute(service.identity_attribute().to_owned(), identity.clone());
    }

    debug!(
        method = %ctx.method(),
        path = ctx.path(),
        valid = result.is_valid(),
        "Request authenticated"
    );
    Ok((ctx, result))
}
