//! Classified outcome of one request attempt.

use std::collections::HashMap;

use derive_more::Display;
use serde_json::Value;

use crate::{Format, Result, Route, format};

/// Closed classification of a [`HyperionResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Status {
    /// 2xx response.
    #[display("Success")]
    Success,
    /// The transfer exceeded the caller's timeout.
    #[display("Timed out")]
    TimedOut,
    /// No HTTP response was received.
    #[display("No response")]
    NoResponse,
    /// HTTP 404.
    #[display("Bad route")]
    BadRoute,
    /// 4xx response other than 404.
    #[display("Client error")]
    ClientError,
    /// 5xx response.
    #[display("Server error")]
    ServerError,
    /// Any other HTTP code (1xx, 3xx, ...).
    #[display("Check code")]
    CheckCode,
}

impl Status {
    /// Classify an attempt from its HTTP code (if any) and whether it timed out.
    #[must_use]
    pub const fn classify(code: Option<u16>, timed_out: bool) -> Self {
        if timed_out {
            return Self::TimedOut;
        }
        match code {
            None => Self::NoResponse,
            Some(200..=299) => Self::Success,
            Some(404) => Self::BadRoute,
            Some(400..=499) => Self::ClientError,
            Some(500..=599) => Self::ServerError,
            Some(_) => Self::CheckCode,
        }
    }
}

/// The classified outcome of one request attempt.
///
/// The status is always derived from how the attempt ended; it cannot be set
/// independently of the code.
#[derive(Debug, Clone, PartialEq)]
pub struct HyperionResult {
    route: Route,
    status: Status,
    code: Option<u16>,
    body: Option<Value>,
}

impl HyperionResult {
    /// A result for an HTTP response with an already deserialized body.
    #[must_use]
    pub fn http(route: Route, code: u16, body: Option<Value>) -> Self {
        Self {
            route,
            status: Status::classify(Some(code), false),
            code: Some(code),
            body,
        }
    }

    /// A result for an attempt that exceeded its timeout.
    #[must_use]
    pub const fn timed_out(route: Route) -> Self {
        Self {
            route,
            status: Status::TimedOut,
            code: None,
            body: None,
        }
    }

    /// A result for an attempt that got no HTTP response.
    #[must_use]
    pub const fn no_response(route: Route) -> Self {
        Self {
            route,
            status: Status::NoResponse,
            code: None,
            body: None,
        }
    }

    /// A result for a raw HTTP response, decoding its body.
    ///
    /// An empty body is absent. A JSON content type, or a response descriptor
    /// on the route, decodes the body with the matching codec; other bodies
    /// are kept as text. Decoding failures are errors for successful
    /// responses only, other responses keep the undecodable body as text.
    pub fn from_response(
        route: Route,
        code: u16,
        headers: &HashMap<String, String>,
        body: &[u8],
    ) -> Result<Self> {
        let status = Status::classify(Some(code), false);
        let body = if body.is_empty() {
            None
        } else {
            match Self::body_format(&route, headers) {
                Some(fmt) => match format::read(body, fmt) {
                    Ok(value) => Some(value),
                    Err(err) if status == Status::Success => return Err(err),
                    Err(err) => {
                        tracing::debug!(%route, code, error = %err, "keeping undecodable body as text");
                        Some(Value::String(String::from_utf8_lossy(body).into_owned()))
                    }
                },
                None => Some(Value::String(String::from_utf8_lossy(body).into_owned())),
            }
        };

        Ok(Self {
            route,
            status,
            code: Some(code),
            body,
        })
    }

    fn body_format(route: &Route, headers: &HashMap<String, String>) -> Option<Format> {
        if let Some(descriptor) = route.response_descriptor() {
            return Some(descriptor.format());
        }
        headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("content-type"))
            .filter(|(_, value)| value.contains("json"))
            .map(|_| Format::Json)
    }

    /// The route that produced this result.
    #[must_use]
    pub const fn route(&self) -> &Route {
        &self.route
    }

    /// Classification.
    #[must_use]
    pub const fn status(&self) -> Status {
        self.status
    }

    /// HTTP status code, absent on timeout or no response.
    #[must_use]
    pub const fn code(&self) -> Option<u16> {
        self.code
    }

    /// Deserialized body.
    #[must_use]
    pub const fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Consume into the deserialized body.
    #[must_use]
    pub fn into_body(self) -> Option<Value> {
        self.body
    }
}

impl std::fmt::Display for HyperionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.status, self.code) {
            (Status::Success | Status::TimedOut | Status::NoResponse, _) | (_, None) => {
                write!(f, "{}: {}", self.status, self.route)
            }
            (_, Some(code)) => write!(f, "HTTP {code}: {}", self.route),
        }
    }
}

/// Structural rendering of a body, as embedded in error messages.
///
/// Maps render as `{"k"=>v}`, arrays as `[a, b]`, null as `nil`. Strings
/// are quoted when nested and raw at the top level.
#[derive(Debug, Clone, Copy)]
pub struct Inspect<'a>(pub &'a Value);

impl std::fmt::Display for Inspect<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Value::String(text) => f.write_str(text),
            other => write_nested(f, other),
        }
    }
}

fn write_nested(f: &mut std::fmt::Formatter<'_>, value: &Value) -> std::fmt::Result {
    match value {
        Value::Null => f.write_str("nil"),
        Value::Bool(flag) => write!(f, "{flag}"),
        Value::Number(number) => write!(f, "{number}"),
        Value::String(text) => write!(f, "{text:?}"),
        Value::Array(items) => {
            f.write_str("[")?;
            for (index, item) in items.iter().enumerate() {
                if index > 0 {
                    f.write_str(", ")?;
                }
                write_nested(f, item)?;
            }
            f.write_str("]")
        }
        Value::Object(entries) => {
            f.write_str("{")?;
            for (index, (key, item)) in entries.iter().enumerate() {
                if index > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{key:?}=>")?;
                write_nested(f, item)?;
            }
            f.write_str("}")
        }
    }
}
