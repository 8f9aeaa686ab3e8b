//! Domain layer for the `AuthN` session module.

pub mod events;
pub mod gate;
pub mod middleware;
pub mod registry;
pub mod routing;
pub mod service;

pub use events::{AuthEvent, AuthEvents};
pub use gate::{GatePhase, SessionGate};
pub use middleware::authenticate_request;
pub use registry::ProviderRegistry;
pub use service::AuthenticationService;
