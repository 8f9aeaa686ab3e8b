//! Domain models for the `AuthN` session module.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Authenticated subject data.
///
/// Consumers treat an attached identity as read-only; replacing it means
/// swapping the whole value on the request context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity {
    data: Map<String, Value>,
}

impl Identity {
    #[must_use]
    pub fn new(data: Map<String, Value>) -> Self {
        Self { data }
    }

    /// Build an identity from arbitrary JSON. Only objects qualify.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(data) => Some(Self { data }),
            _ => None,
        }
    }

    /// Look up a dot-separated key path such as `profile.email` or `roles.0`.
    ///
    /// Object segments are matched by key, array segments by decimal index.
    /// Returns `None` when any segment does not resolve.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Value> {
        if path.is_empty() {
            return None;
        }

        let mut segments = path.split('.');
        let mut current = self.data.get(segments.next()?)?;

        for segment in segments {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }

        Some(current)
    }

    /// The primary identifier of the subject (the `id` field).
    #[must_use]
    pub fn identifier(&self) -> Option<&Value> {
        self.data.get("id")
    }

    /// An identity without any field is treated as absent by the gate.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.data)
    }
}

impl From<Map<String, Value>> for Identity {
    fn from(data: Map<String, Value>) -> Self {
        Self::new(data)
    }
}

/// Why an authentication attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// Credentials were supplied but rejected.
    CredentialsInvalid,
    /// The provider expected credentials and found none.
    CredentialsMissing,
    /// Credentials were accepted but no subject matches them.
    IdentityNotFound,
    /// The provider raised an internal fault.
    ProviderException,
}

impl FailureReason {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CredentialsInvalid => "credentials_invalid",
            Self::CredentialsMissing => "credentials_missing",
            Self::IdentityNotFound => "identity_not_found",
            Self::ProviderException => "provider_exception",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one authentication attempt. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthenticationResult {
    /// A subject was identified.
    Success(Identity),
    /// The attempt was decided negatively.
    Failure {
        reason: FailureReason,
        /// Provider-supplied diagnostics, possibly empty.
        errors: Vec<String>,
    },
    /// The provider had nothing to say about this request.
    Pending,
}

impl AuthenticationResult {
    #[must_use]
    pub fn success(identity: Identity) -> Self {
        Self::Success(identity)
    }

    #[must_use]
    pub fn failure(reason: FailureReason) -> Self {
        Self::Failure {
            reason,
            errors: Vec::new(),
        }
    }

    #[must_use]
    pub fn failure_with_errors(reason: FailureReason, errors: Vec<String>) -> Self {
        Self::Failure { reason, errors }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Success(identity) => Some(identity),
            _ => None,
        }
    }

    #[must_use]
    pub fn reason(&self) -> Option<FailureReason> {
        match self {
            Self::Failure { reason, .. } => Some(*reason),
            _ => None,
        }
    }

    #[must_use]
    pub fn errors(&self) -> &[String] {
        match self {
            Self::Failure { errors, .. } => errors,
            _ => &[],
        }
    }
}
