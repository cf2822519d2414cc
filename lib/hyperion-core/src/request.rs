//! Transport input: a route plus headers, body and timeout.
//!
//! # Example
//!
//! ```
//! use hyperion_core::{Format, Method, PayloadDescriptor, Request, Route};
//!
//! let route = Route::new(Method::Post, "http://indigo.com/things")
//!     .expect("valid uri")
//!     .with_payload(PayloadDescriptor::new("thing", 2, Format::Json));
//!
//! let request = Request::builder(route)
//!     .negotiate("indigo")
//!     .payload(&serde_json::json!({"name": "x"}))
//!     .expect("serializable")
//!     .build();
//!
//! assert_eq!(
//!     request.header("Content-Type"),
//!     Some("application/vnd.indigo.thing-v2+json")
//! );
//! ```

use std::collections::HashMap;
use std::time::Duration;

use bytes::Bytes;
use serde::Serialize;

use crate::{Format, Result, Route, format};

/// One request handed to a [`Transport`](crate::Transport).
#[derive(Debug, Clone)]
pub struct Request {
    route: Route,
    headers: HashMap<String, String>,
    body: Option<Bytes>,
    timeout: Option<Duration>,
}

impl Request {
    /// Creates a new [`RequestBuilder`].
    #[must_use]
    pub fn builder(route: Route) -> RequestBuilder {
        RequestBuilder::new(route)
    }

    /// Route being requested.
    #[must_use]
    pub const fn route(&self) -> &Route {
        &self.route
    }

    /// Request headers.
    #[must_use]
    pub const fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Mutable access to headers.
    #[must_use]
    pub fn headers_mut(&mut self) -> &mut HashMap<String, String> {
        &mut self.headers
    }

    /// Single header value by name, ignoring case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Encoded body.
    #[must_use]
    pub const fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Transfer timeout, `None` when unbounded.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Consume into (route, headers, body).
    #[must_use]
    pub fn into_parts(self) -> (Route, HashMap<String, String>, Option<Bytes>) {
        (self.route, self.headers, self.body)
    }
}

/// Builder for [`Request`].
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    route: Route,
    headers: HashMap<String, String>,
    body: Option<Bytes>,
    timeout: Option<Duration>,
}

impl RequestBuilder {
    /// Creates a builder without headers, body or timeout.
    #[must_use]
    pub fn new(route: Route) -> Self {
        Self {
            route,
            headers: HashMap::new(),
            body: None,
            timeout: None,
        }
    }

    /// Sets the vendor `Accept` and `Content-Type` headers from the route descriptors.
    #[must_use]
    pub fn negotiate(mut self, vendor: &str) -> Self {
        if let Some(accept) = self.route.response_descriptor().map(|d| d.mimetype(vendor)) {
            self = self.header("Accept", accept);
        }
        if let Some(content_type) = self.route.payload_descriptor().map(|d| d.mimetype(vendor)) {
            self = self.header("Content-Type", content_type);
        }
        self
    }

    /// Sets a header, replacing any value under the same name regardless of case.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|key, _| !key.eq_ignore_ascii_case(&name));
        self.headers.insert(name, value.into());
        self
    }

    /// Sets multiple headers.
    #[must_use]
    pub fn headers<K, V>(self, headers: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        headers
            .into_iter()
            .fold(self, |builder, (name, value)| builder.header(name, value))
    }

    /// Sets an already encoded body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Encodes the body with the payload descriptor's format, JSON by default.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn payload<T: Serialize + ?Sized>(self, value: &T) -> Result<Self> {
        let fmt = self
            .route
            .payload_descriptor()
            .map_or(Format::Json, |descriptor| descriptor.format());
        let body = format::write(value, fmt)?;
        Ok(self.body(body))
    }

    /// Sets the transfer timeout; zero means no timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }

    /// Builds the [`Request`].
    #[must_use]
    pub fn build(self) -> Request {
        Request {
            route: self.route,
            headers: self.headers,
            body: self.body,
            timeout: self.timeout,
        }
    }
}
