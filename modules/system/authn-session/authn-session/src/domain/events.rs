//! Authentication lifecycle notifications.

use authn_session_sdk::Identity;
use tokio::sync::broadcast;

/// Default buffer of the notification channel.
const DEFAULT_CAPACITY: usize = 64;

/// Lifecycle notification published by the session gate.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthEvent {
    /// A provider that neither persists nor is stateless identified the caller.
    AfterIdentify {
        provider: String,
        identity: Option<Identity>,
    },
    /// The identity was cleared by a logout.
    Logout,
}

/// Fire-and-forget publisher for [`AuthEvent`]s.
///
/// Created once at application level and cloned into every request's gate.
#[derive(Debug, Clone)]
pub struct AuthEvents {
    sender: broadcast::Sender<AuthEvent>,
}

impl Default for AuthEvents {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl AuthEvents {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.sender.subscribe()
    }

    /// Publish without waiting on subscribers.
    pub fn emit(&self, event: AuthEvent) {
        if let Err(broadcast::error::SendError(event)) = self.sender.send(event) {
            tracing::debug!(?event, "No subscribers for auth event");
        }
    }
}
