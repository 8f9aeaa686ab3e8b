//! `AuthN` Session Module
//!
//! Request-scoped orchestration of authentication state:
//!
//! - [`AuthenticationService`] walks the configured identity providers in
//!   precedence order and persists/clears identities through the
//!   persistent ones.
//! - [`SessionGate`] wraps the service attached to a request, enforces the
//!   unauthenticated-action allowlist and sequences identity replacement
//!   and logout.
//!
//! Both are built per request and never shared across requests.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod domain;

pub use config::{AuthenticationServiceConfig, LogoutRedirect, SessionGateConfig, load_config};
pub use domain::{
    AuthEvent, AuthEvents, AuthenticationService, GatePhase, ProviderRegistry, SessionGate,
    authenticate_request,
};
