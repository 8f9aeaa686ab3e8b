//! `AuthN` Session SDK
//!
//! This crate provides the public contracts for the `authn_session` module:
//!
//! - [`Identity`] - Authenticated subject data with key-path lookup
//! - [`AuthenticationResult`] - Outcome of one authentication attempt
//! - [`RequestContext`] - Request-scoped carrier for headers, session and attributes
//! - [`IdentityProvider`] - Plugin API trait for identification strategies
//! - [`AuthenticationServiceApi`] - Service API consumed by the session gate
//! - [`AuthNSessionError`] / [`ProviderError`] - Error types
//!
//! ## Usage
//!
//! Upstream middleware attaches the service to the request, handlers read
//! the identity back:
//!
//! ```ignore
//! use authn_session_sdk::{RequestContext, DEFAULT_IDENTITY_ATTRIBUTE};
//!
//! let ctx = RequestContext::new(Method::GET, "/dashboard")
//!     .attach_authentication(service);
//! let identity = ctx.attribute_as::<Identity>(DEFAULT_IDENTITY_ATTRIBUTE);
//! ```
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod api;
pub mod context;
pub mod error;
pub mod models;
pub mod plugin_api;

// Re-export main types at crate root
pub use api::AuthenticationServiceApi;
pub use context::{
    ACTION_PARAM, AUTHENTICATION_ATTRIBUTE, Attribute, DEFAULT_IDENTITY_ATTRIBUTE, RequestContext,
    Session,
};
pub use error::{AuthNSessionError, ProviderError};
pub use models::{AuthenticationResult, FailureReason, Identity};
pub use plugin_api::{IdentityProvider, ProviderCapabilities};
