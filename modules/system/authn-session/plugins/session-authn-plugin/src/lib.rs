#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Session Identity Provider
//!
//! Persistent provider keeping the identity in the server-side session.
//! Persisting or clearing the identity rotates the session identifier and
//! re-issues the session cookie.
//!
//! ## Configuration
//!
//! ```yaml
//! session:
//!   session_key: "Auth"
//!   cookie_name: "sid"
//!   cookie_path: "/"
//! ```

pub mod config;
pub mod domain;

pub use config::SessionPluginConfig;
pub use domain::Service as SessionProvider;
