//! Request-scoped context shared between the gate, the service and providers.
//!
//! The surrounding framework owns every attribute except `authentication`
//! and the configured identity attribute.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::api::AuthenticationServiceApi;

/// Attribute under which upstream middleware attaches the authentication service.
pub const AUTHENTICATION_ATTRIBUTE: &str = "authentication";

/// Default attribute under which the current identity is stored.
pub const DEFAULT_IDENTITY_ATTRIBUTE: &str = "identity";

/// Routing parameter naming the action being dispatched.
pub const ACTION_PARAM: &str = "action";

/// Type-erased request attribute.
pub type Attribute = Arc<dyn Any + Send + Sync>;

/// Server-side session state loaded for the current request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    id: Option<String>,
    previous_id: Option<String>,
    data: Map<String, Value>,
}

impl Session {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_value(mut self, key: impl Into<String>, value: Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// The identifier this session carried before the last [`renew`](Self::renew).
    #[must_use]
    pub fn previous_id(&self) -> Option<&str> {
        self.previous_id.as_deref()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.data.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.data.remove(key)
    }

    /// Assign a fresh random identifier, keeping the data.
    ///
    /// Returns the new identifier.
    pub fn renew(&mut self) -> String {
        let next = Uuid::new_v4().to_string();
        self.previous_id = self.id.replace(next.clone());
        next
    }
}

/// Carrier for request/response state plus an attribute map.
#[derive(Clone, Default)]
pub struct RequestContext {
    method: Method,
    path: String,
    base: String,
    query: HashMap<String, String>,
    params: HashMap<String, String>,
    headers: HeaderMap,
    session: Session,
    response_headers: HeaderMap,
    attributes: HashMap<String, Attribute>,
}

impl RequestContext {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            ..Self::default()
        }
    }

    /// Mount prefix of the application (e.g. `/app`).
    #[must_use]
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = base.into();
        self
    }

    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_action(self, action: impl Into<String>) -> Self {
        self.with_param(ACTION_PARAM, action)
    }

    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    #[must_use]
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }

    #[must_use]
    pub fn with_attribute<T: Any + Send + Sync>(mut self, key: impl Into<String>, value: T) -> Self {
        self.insert_attribute(key, value);
        self
    }

    #[must_use]
    pub fn without_attribute(mut self, key: &str) -> Self {
        self.attributes.remove(key);
        self
    }

    /// Attach the authentication service the way upstream middleware does.
    #[must_use]
    pub fn attach_authentication(self, service: Arc<dyn AuthenticationServiceApi>) -> Self {
        self.with_attribute(AUTHENTICATION_ATTRIBUTE, service)
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    #[must_use]
    pub fn query(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn action(&self) -> Option<&str> {
        self.param(ACTION_PARAM)
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    #[must_use]
    pub fn response_headers(&self) -> &HeaderMap {
        &self.response_headers
    }

    pub fn response_headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.response_headers
    }

    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&Attribute> {
        self.attributes.get(key)
    }

    /// Typed view of an attribute. `None` if absent or of another type.
    #[must_use]
    pub fn attribute_as<T: Any>(&self, key: &str) -> Option<&T> {
        self.attributes.get(key)?.downcast_ref::<T>()
    }

    pub fn insert_attribute<T: Any + Send + Sync>(
        &mut self,
        key: impl Into<String>,
        value: T,
    ) -> Option<Attribute> {
        self.attributes.insert(key.into(), Arc::new(value))
    }

    pub fn remove_attribute(&mut self, key: &str) -> Option<Attribute> {
        self.attributes.remove(key)
    }

    /// The attached authentication service, if the attribute holds one.
    #[must_use]
    pub fn authentication(&self) -> Option<Arc<dyn AuthenticationServiceApi>> {
        self.attribute_as::<Arc<dyn AuthenticationServiceApi>>(AUTHENTICATION_ATTRIBUTE)
            .cloned()
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut attribute_keys: Vec<&str> = self.attributes.keys().map(String::as_str).collect();
        attribute_keys.sort_unstable();

        f.debug_struct("RequestContext")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("base", &self.base)
            .field("query", &self.query)
            .field("params", &self.params)
            .field("headers", &self.headers)
            .field("session", &self.session)
            .field("response_headers", &self.response_headers)
            .field("attributes", &attribute_keys)
            .finish()
    }
}
