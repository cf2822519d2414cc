//! Routes: what is requested and what is expected back.

use serde::ser::{Serialize, SerializeStruct, Serializer};
use url::Url;

use crate::{Error, Method, PayloadDescriptor, ResponseDescriptor, Result};

/// An immutable route: method, absolute URI and expected shapes.
///
/// # Example
///
/// ```
/// use hyperion_core::{Format, Method, ResponseDescriptor, Route};
///
/// let route = Route::new(Method::Get, "http://indigo.com/things")
///     .expect("valid uri")
///     .with_response(ResponseDescriptor::new("thing", 1, Format::Json));
/// assert_eq!(route.to_string(), "GET http://indigo.com/things");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    method: Method,
    uri: Url,
    base: Base,
    response_descriptor: Option<ResponseDescriptor>,
    payload_descriptor: Option<PayloadDescriptor>,
}

impl Route {
    /// Creates a route without descriptors.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BadArgument`] if `uri` is not an absolute URI with a host.
    pub fn new(method: Method, uri: impl AsRef<str>) -> Result<Self> {
        let raw = uri.as_ref();
        let invalid = || Error::bad_argument(format!("{raw:?}"), "a URI");
        let uri = Url::parse(raw).map_err(|_| invalid())?;
        let base = Base::of(&uri).ok_or_else(invalid)?;

        Ok(Self {
            method,
            uri,
            base,
            response_descriptor: None,
            payload_descriptor: None,
        })
    }

    /// Sets the expected response descriptor.
    #[must_use]
    pub fn with_response(mut self, descriptor: ResponseDescriptor) -> Self {
        self.response_descriptor = Some(descriptor);
        self
    }

    /// Sets the payload descriptor.
    #[must_use]
    pub fn with_payload(mut self, descriptor: PayloadDescriptor) -> Self {
        self.payload_descriptor = Some(descriptor);
        self
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Normalized URI.
    #[must_use]
    pub const fn uri(&self) -> &Url {
        &self.uri
    }

    /// Expected response descriptor.
    #[must_use]
    pub const fn response_descriptor(&self) -> Option<&ResponseDescriptor> {
        self.response_descriptor.as_ref()
    }

    /// Payload descriptor.
    #[must_use]
    pub const fn payload_descriptor(&self) -> Option<&PayloadDescriptor> {
        self.payload_descriptor.as_ref()
    }

    /// Normalized base (scheme, host, port) of the URI.
    #[must_use]
    pub const fn base(&self) -> &Base {
        &self.base
    }

    /// Key identifying this route for matching: method, path and `Accept` value.
    #[must_use]
    pub fn key(&self, vendor: &str) -> RouteKey {
        RouteKey::new(
            self.method,
            self.uri.path(),
            self.response_descriptor
                .as_ref()
                .map(|descriptor| descriptor.mimetype(vendor)),
        )
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.method, self.uri)
    }
}

impl Serialize for Route {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Route", 4)?;
        state.serialize_field("method", &self.method)?;
        state.serialize_field("uri", self.uri.as_str())?;
        state.serialize_field("response_descriptor", &self.response_descriptor)?;
        state.serialize_field("payload_descriptor", &self.payload_descriptor)?;
        state.end()
    }
}

/// Scheme, host and port of a URI, with the port always explicit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Base {
    scheme: String,
    host: String,
    port: u16,
}

impl Base {
    /// Parses the base of a URI. A missing port defaults to the scheme's
    /// well-known port (80 for `http`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::BadArgument`] if `uri` is not an absolute URI with a host.
    pub fn parse(uri: impl AsRef<str>) -> Result<Self> {
        let raw = uri.as_ref();
        Url::parse(raw)
            .ok()
            .as_ref()
            .and_then(Self::of)
            .ok_or_else(|| Error::bad_argument(format!("{raw:?}"), "a base URI"))
    }

    fn of(uri: &Url) -> Option<Self> {
        Some(Self {
            scheme: uri.scheme().to_string(),
            host: uri.host_str()?.to_ascii_lowercase(),
            port: uri.port_or_known_default()?,
        })
    }

    /// URI scheme.
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Host name.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Port, defaulted when the URI had none.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }
}

impl std::fmt::Display for Base {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}://{}:{}", self.scheme, self.host, self.port)
    }
}

/// Matching key of a route: two routes match iff their keys are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteKey {
    method: Method,
    path: String,
    accept: Option<String>,
}

impl RouteKey {
    /// Creates a key. A path without a leading slash gets one.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>, accept: Option<String>) -> Self {
        let mut path = path.into();
        if !path.starts_with('/') {
            path.insert(0, '/');
        }
        Self {
            method,
            path,
            accept,
        }
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Request path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// `Accept` header discriminator, if any.
    #[must_use]
    pub fn accept(&self) -> Option<&str> {
        self.accept.as_deref()
    }
}
