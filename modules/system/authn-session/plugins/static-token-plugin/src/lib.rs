#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Static Token Identity Provider
//!
//! Stateless provider that reads `Authorization: Bearer <token>` on every
//! request and maps the token to an identity from configuration.
//!
//! ## Modes
//!
//! - **`accept_all`** (default): Accepts any non-empty token, returns the configured default identity.
//!
//! - **`static_tokens`**: Maps specific tokens to specific identities. Useful for E2E tests
//!   with distinct users.
//!
//! ## Configuration
//!
//! ```yaml
//! static_token:
//!   mode: static_tokens
//!   tokens:
//!     - token: "token-ada"
//!       identity: { id: 1, username: "ada" }
//! ```

pub mod config;
pub mod domain;

pub use config::{StaticTokenPluginConfig, TokenMapping, TokenMode};
pub use domain::Service as StaticTokenProvider;
