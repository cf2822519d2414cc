//! Structured client error payloads.

use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;

/// Machine-readable category of a client error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientErrorCode {
    /// Unknown or unspecified.
    #[default]
    Unknown,
    /// A required resource or field is missing.
    Missing,
    /// A value is invalid.
    Invalid,
    /// The request could not be parsed.
    Malformed,
    /// The resource already exists.
    Duplicate,
    /// The resource is no longer valid.
    Expired,
}

impl FromStr for ClientErrorCode {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unknown" => Ok(Self::Unknown),
            "missing" => Ok(Self::Missing),
            "invalid" => Ok(Self::Invalid),
            "malformed" => Ok(Self::Malformed),
            "duplicate" => Ok(Self::Duplicate),
            "expired" => Ok(Self::Expired),
            _ => Err(crate::Error::bad_argument(format!("{s:?}"), "a client error code")),
        }
    }
}

/// An error payload returned by a REST API for a 4xx response.
///
/// Recognized from any object body carrying a string `message`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientErrorResponse {
    /// Human-readable message.
    pub message: String,
    /// Detailed errors, as sent by the server.
    pub errors: Vec<Value>,
    /// Error category.
    pub code: ClientErrorCode,
}

impl ClientErrorResponse {
    /// Creates a new payload.
    #[must_use]
    pub fn new(message: impl Into<String>, errors: Vec<Value>, code: ClientErrorCode) -> Self {
        Self {
            message: message.into(),
            errors,
            code,
        }
    }

    /// Recognize a payload in a response body.
    ///
    /// Unknown codes degrade to [`ClientErrorCode::Unknown`], a missing
    /// `errors` list to an empty one.
    #[must_use]
    pub fn from_body(body: &Value) -> Option<Self> {
        let object = body.as_object()?;
        let message = object.get("message")?.as_str()?;
        let errors = object
            .get("errors")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let code = object
            .get("code")
            .and_then(Value::as_str)
            .and_then(|code| code.parse().ok())
            .unwrap_or_default();

        Some(Self::new(message, errors, code))
    }
}
