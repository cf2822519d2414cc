//! Error types for hyperion.

use derive_more::{Display, Error, From};

use crate::ClientErrorResponse;

/// Main error type for hyperion operations.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// Unknown codec format tag.
    #[display("Unsupported format: {_0}")]
    #[from(skip)]
    UnsupportedFormat(#[error(not(source))] String),

    /// Payload parse failure, annotated with the offending source line.
    #[display("{message}")]
    #[from(skip)]
    MalformedPayload {
        /// Parser diagnostic followed by the offending line.
        message: String,
    },

    /// JSON error surfaced as reported by the parser.
    #[display("{_0}")]
    #[from]
    Json(serde_json::Error),

    /// JSON deserialization error with path context.
    #[display("JSON deserialization error at '{path}': {message}")]
    #[from(skip)]
    JsonDeserialization {
        /// JSON path to the error (e.g., "user.address.city").
        path: String,
        /// Error message.
        message: String,
    },

    /// A value of the wrong shape was passed to a public entry point.
    #[display("You passed me {received}, which is not {expected}")]
    #[from(skip)]
    BadArgument {
        /// Rendering of the received value.
        received: String,
        /// Description of the expected shape.
        expected: String,
    },

    /// Raised by the built-in handlers for 4xx responses.
    #[display("{message}")]
    #[from(skip)]
    ClientRequest {
        /// Error message.
        message: String,
        /// HTTP status code.
        status: Option<u16>,
        /// Structured error payload, when the response carried one.
        payload: Option<ClientErrorResponse>,
    },

    /// Raised by the built-in handlers for 5xx responses.
    #[display("{message}")]
    #[from(skip)]
    ServerRequest {
        /// Error message.
        message: String,
        /// HTTP status code.
        status: Option<u16>,
    },

    /// No handler group matched the result.
    #[display("Hyperion error: the response did not match any conditions: {result}")]
    #[from(skip)]
    Fallthrough {
        /// Rendering of the unmatched result.
        result: String,
    },

    /// The transport could not build the request.
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),

    /// Error raised by a caller-supplied handler or transform.
    #[display("{_0}")]
    #[from(skip)]
    Custom(#[error(not(source))] Box<dyn std::error::Error + Send + Sync>),
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an unsupported format error.
    #[must_use]
    pub fn unsupported_format(tag: impl Into<String>) -> Self {
        Self::UnsupportedFormat(tag.into())
    }

    /// Create a malformed payload error.
    #[must_use]
    pub fn malformed_payload(message: impl Into<String>) -> Self {
        Self::MalformedPayload {
            message: message.into(),
        }
    }

    /// Create a JSON deserialization error with path context.
    #[must_use]
    pub fn json_deserialization(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::JsonDeserialization {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a bad argument error.
    #[must_use]
    pub fn bad_argument(received: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::BadArgument {
            received: received.into(),
            expected: expected.into(),
        }
    }

    /// Create a client request error.
    #[must_use]
    pub fn client_request(
        message: impl Into<String>,
        status: Option<u16>,
        payload: Option<ClientErrorResponse>,
    ) -> Self {
        Self::ClientRequest {
            message: message.into(),
            status,
            payload,
        }
    }

    /// Create a server request error.
    #[must_use]
    pub fn server_request(message: impl Into<String>, status: Option<u16>) -> Self {
        Self::ServerRequest {
            message: message.into(),
            status,
        }
    }

    /// Create a fallthrough error from the rendering of the unmatched result.
    #[must_use]
    pub fn fallthrough(result: impl ToString) -> Self {
        Self::Fallthrough {
            result: result.to_string(),
        }
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Wrap a caller-raised error.
    #[must_use]
    pub fn custom(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Custom(error.into())
    }

    /// Returns the HTTP status code carried by client and server errors.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::ClientRequest { status, .. } | Self::ServerRequest { status, .. } => *status,
            _ => None,
        }
    }

    /// Returns `true` if this was raised for a 4xx response.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::ClientRequest { .. })
    }

    /// Returns `true` if this was raised for a 5xx response.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(self, Self::ServerRequest { .. })
    }

    /// Returns `true` if no handler matched the result.
    #[must_use]
    pub const fn is_fallthrough(&self) -> bool {
        matches!(self, Self::Fallthrough { .. })
    }

    /// Returns the structured client error payload, if any.
    #[must_use]
    pub const fn payload(&self) -> Option<&ClientErrorResponse> {
        match self {
            Self::ClientRequest { payload, .. } => payload.as_ref(),
            _ => None,
        }
    }

    /// Downcast a caller-raised error.
    #[must_use]
    pub fn downcast_ref<E: std::error::Error + 'static>(&self) -> Option<&E> {
        match self {
            Self::Custom(inner) => inner.downcast_ref(),
            _ => None,
        }
    }
}
