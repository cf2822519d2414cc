//! What a fake server sees and what it answers.

use std::collections::HashMap;
use std::time::Duration;

use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;

use hyperion_core::{Format, Method, Request, Result, write};

/// A request as seen by a fake server.
#[derive(Debug, Clone, PartialEq)]
pub struct FakeRequest {
    method: Method,
    path: String,
    headers: HashMap<String, String>,
    body: Option<Value>,
}

impl FakeRequest {
    pub(crate) fn from_request(request: &Request) -> Self {
        let body = request
            .body()
            .filter(|body| !body.is_empty())
            .map(|body| {
                serde_json::from_slice(body)
                    .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
            });

        Self {
            method: request.route().method(),
            path: request.route().uri().path().to_string(),
            headers: request.headers().clone(),
            body,
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

    /// Request headers.
    #[must_use]
    pub const fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Single header value by name, ignoring case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Body decoded as JSON, or kept as text when it is not JSON.
    #[must_use]
    pub const fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }
}

/// A canned response.
///
/// Any JSON value converts into a `200` response with that value as JSON body.
/// A string body is sent raw, any other body as JSON.
///
/// # Example
///
/// ```
/// use hyperion_test::FakeResponse;
/// use serde_json::json;
///
/// let ok: FakeResponse = json!({"name": "freddy"}).into();
/// assert_eq!(ok.code(), 200);
///
/// let gone = FakeResponse::new(410).with_body(json!(r#"{"message":"gone"}"#));
/// assert_eq!(gone.code(), 410);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FakeResponse {
    code: u16,
    headers: HashMap<String, String>,
    body: Option<Value>,
    delay: Option<Duration>,
}

impl FakeResponse {
    /// A response without headers or body.
    #[must_use]
    pub fn new(code: u16) -> Self {
        Self {
            code,
            headers: HashMap::new(),
            body: None,
            delay: None,
        }
    }

    /// A `200` response with the value as JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be represented as JSON.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        let body = serde_json::to_value(value)?;
        Ok(Self::new(200).with_body(body))
    }

    /// Sets a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Delays the response, as a slow server would.
    #[must_use]
    pub const fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// HTTP status code.
    #[must_use]
    pub const fn code(&self) -> u16 {
        self.code
    }

    /// Response delay, if any.
    #[must_use]
    pub const fn delay(&self) -> Option<Duration> {
        self.delay
    }

    /// Encode into (code, headers, body bytes) as a server would send them.
    ///
    /// Structured bodies are serialized as JSON, with a JSON content type
    /// unless one was given.
    pub(crate) fn encode(self) -> Result<(u16, HashMap<String, String>, Bytes)> {
        let Self {
            code,
            mut headers,
            body,
            ..
        } = self;

        let body = match body {
            None | Some(Value::Null) => Bytes::new(),
            Some(Value::String(text)) => Bytes::from(text),
            Some(value) => {
                if !headers.keys().any(|key| key.eq_ignore_ascii_case("content-type")) {
                    headers.insert("Content-Type".to_string(), "application/json".to_string());
                }
                write(&value, Format::Json)?
            }
        };

        Ok((code, headers, body))
    }
}

impl From<Value> for FakeResponse {
    fn from(body: Value) -> Self {
        Self::new(200).with_body(body)
    }
}

impl From<(u16, HashMap<String, String>, Option<Value>)> for FakeResponse {
    fn from((code, headers, body): (u16, HashMap<String, String>, Option<Value>)) -> Self {
        Self {
            code,
            headers,
            body,
            delay: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use hyperion_core::Route;

    #[test]
    fn values_are_json_successes() {
        let (code, headers, body) = FakeResponse::from(json!({"foo": "bar"})).encode().expect("encode");
        assert_eq!(code, 200);
        assert_eq!(headers.get("Content-Type").map(String::as_str), Some("application/json"));
        assert_eq!(body.as_ref(), br#"{"foo":"bar"}"#);
    }

    #[test]
    fn strings_are_sent_raw() {
        let response = FakeResponse::new(400).with_body(json!(r#"{"message":"oops"}"#));
        let (code, headers, body) = response.encode().expect("encode");
        assert_eq!(code, 400);
        assert!(headers.is_empty());
        assert_eq!(body.as_ref(), br#"{"message":"oops"}"#);
    }

    #[test]
    fn explicit_content_type_is_kept() {
        let response = FakeResponse::from((
            201,
            HashMap::from([("content-type".to_string(), "application/vnd.x+json".to_string())]),
            Some(json!([1])),
        ));
        let (_, headers, _) = response.encode().expect("encode");
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("content-type").map(String::as_str), Some("application/vnd.x+json"));
    }

    #[test]
    fn no_body_is_empty() {
        let (_, _, body) = FakeResponse::new(204).encode().expect("encode");
        assert!(body.is_empty());
    }

    #[test]
    fn fake_requests_decode_json_bodies() {
        let route = Route::new(Method::Put, "http://indigo.com/things").expect("route");
        let request = Request::builder(route.clone())
            .header("X-My-Header", "value")
            .body(r#"{"the":"body"}"#)
            .build();
        let fake = FakeRequest::from_request(&request);
        assert_eq!(fake.method(), Method::Put);
        assert_eq!(fake.path(), "/things");
        assert_eq!(fake.header("x-my-header"), Some("value"));
        assert_eq!(fake.body(), Some(&json!({"the": "body"})));

        let text = Request::builder(route).body("plain").build();
        assert_eq!(FakeRequest::from_request(&text).body(), Some(&json!("plain")));
    }
}
