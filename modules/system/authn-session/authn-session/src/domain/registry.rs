//! Ordered set of configured identity providers.

use std::fmt;
use std::sync::Arc;

use authn_session_sdk::{AuthNSessionError, IdentityProvider};

/// Identity providers in precedence order (first registered is asked first).
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn IdentityProvider>>,
}

impl ProviderRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a provider with the lowest precedence so far.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if a provider with the same name is registered.
    pub fn register(&mut self, provider: Arc<dyn IdentityProvider>) -> Result<(), AuthNSessionError> {
        if self.get(provider.name()).is_some() {
            return Err(AuthNSessionError::configuration(format!(
                "identity provider '{}' is already registered",
                provider.name()
            )));
        }
        self.providers.push(provider);
        Ok(())
    }

    /// Builder-style [`register`](Self::register).
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if a provider with the same name is registered.
    pub fn with(mut self, provider: Arc<dyn IdentityProvider>) -> Result<Self, AuthNSessionError> {
        self.register(provider)?;
        Ok(self)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn IdentityProvider>> {
        self.providers.iter()
    }

    /// Providers tagged `persistent`, in precedence order.
    pub fn persistent(&self) -> impl Iterator<Item = &Arc<dyn IdentityProvider>> {
        self.providers
            .iter()
            .filter(|provider| provider.capabilities().persistent)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn IdentityProvider>> {
        self.providers.iter().find(|provider| provider.name() == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.providers.iter().map(|provider| provider.name()))
            .finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use async_trait::async_trait;
    use authn_session_sdk::{
        AuthenticationResult, ProviderCapabilities, ProviderError, RequestContext,
    };

    use super::*;

    struct Named(&'static str, ProviderCapabilities);

    #[async_trait]
    impl IdentityProvider for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn capabilities(&self) -> ProviderCapabilities {
            self.1
        }

        async fn identify(
            &self,
            _ctx: &RequestContext,
        ) -> Result<AuthenticationResult, ProviderError> {
            Ok(AuthenticationResult::Pending)
        }
    }

    #[test]
    fn keeps_registration_order() {
        let registry = ProviderRegistry::new()
            .with(Arc::new(Named("token", ProviderCapabilities::STATELESS)))
            .and_then(|r| r.with(Arc::new(Named("session", ProviderCapabilities::PERSISTENT))))
            .unwrap();

        let names: Vec<&str> = registry.iter().map(|p| p.name()).collect();
        assert_eq!(names, ["token", "session"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn persistent_filters_by_capability() {
        let registry = ProviderRegistry::new()
            .with(Arc::new(Named("token", ProviderCapabilities::STATELESS)))
            .and_then(|r| r.with(Arc::new(Named("session", ProviderCapabilities::PERSISTENT))))
            .and_then(|r| r.with(Arc::new(Named("cookie", ProviderCapabilities::PERSISTENT))))
            .unwrap();

        let names: Vec<&str> = registry.persistent().map(|p| p.name()).collect();
        assert_eq!(names, ["session", "cookie"]);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut registry = ProviderRegistry::new();
        registry
            .register(Arc::new(Named("session", ProviderCapabilities::PERSISTENT)))
            .unwrap();

        let err = registry
            .register(Arc::new(Named("session", ProviderCapabilities::NONE)))
            .unwrap_err();

        assert!(matches!(err, AuthNSessionError::Configuration(_)));
        assert_eq!(registry.len(), 1);
    }
}
