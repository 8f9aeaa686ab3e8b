//! Error types for the `AuthN` session module.

use thiserror::Error;

/// Faults raised by an [`IdentityProvider`](crate::IdentityProvider).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// The provider failed internally (bad backing data, bug, ...).
    #[error("internal provider error: {0}")]
    Internal(String),

    /// A backing store or remote dependency is not reachable.
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    /// The surrounding request was cancelled while the provider was running.
    #[error("request cancelled")]
    Cancelled,

    /// The surrounding request ran out of time while the provider was running.
    #[error("request timed out")]
    TimedOut,
}

impl ProviderError {
    /// Cancellation and timeout belong to the request lifecycle and must
    /// never be converted into an authentication failure.
    #[must_use]
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled | Self::TimedOut)
    }
}

/// Errors surfaced by the authentication service and the session gate.
#[derive(Debug, Error)]
pub enum AuthNSessionError {
    /// The request carries no usable authentication service, or the
    /// service itself is misconfigured. Not recoverable within the request.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// An identity is required for the current action but none is present.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    /// Identity data was requested while no identity is attached.
    #[error("the identity has not been found")]
    IdentityNotFound,

    /// A provider fault that is not recovered (persist/clear, cancellation).
    #[error("provider '{provider}' failed: {source}")]
    Provider {
        provider: String,
        #[source]
        source: ProviderError,
    },

    /// The request has already been terminated by a logout.
    #[error("request already terminated")]
    RequestTerminated,
}

impl AuthNSessionError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn provider(provider: impl Into<String>, source: ProviderError) -> Self {
        Self::Provider {
            provider: provider.into(),
            source,
        }
    }
}
