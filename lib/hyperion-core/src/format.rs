//! Payload formats and the codec used to read and write bodies.

use std::str::FromStr;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result};

/// Wire format of a request or response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Format {
    /// JSON (`json`).
    #[default]
    Json,
}

impl Format {
    /// The format tag, as used in mimetypes.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(tag: &str) -> Result<Self> {
        match tag {
            "json" => Ok(Self::Json),
            other => Err(Error::unsupported_format(other)),
        }
    }
}

impl TryFrom<String> for Format {
    type Error = Error;

    fn try_from(tag: String) -> Result<Self> {
        tag.parse()
    }
}

impl From<Format> for &'static str {
    fn from(format: Format) -> Self {
        format.as_str()
    }
}

/// Serialize a value in the given format.
///
/// JSON output is compact, with no added whitespace.
///
/// # Example
///
/// ```
/// use hyperion_core::{Format, write};
///
/// let bytes = write(&serde_json::json!({"a": 1}), Format::Json).expect("serialize");
/// assert_eq!(bytes.as_ref(), br#"{"a":1}"#);
/// ```
pub fn write<T: Serialize + ?Sized>(value: &T, format: Format) -> Result<Bytes> {
    match format {
        Format::Json => serde_json::to_vec(value)
            .map(Bytes::from)
            .map_err(Into::into),
    }
}

/// Deserialize bytes in the given format into a structural value.
///
/// A JSON syntax error that reports a position is re-raised as
/// [`Error::MalformedPayload`], its message followed by the offending line.
/// Otherwise the parser error is surfaced as is.
///
/// # Example
///
/// ```
/// use hyperion_core::{Format, read};
///
/// let value = read(br#"{"a":1}"#, Format::Json).expect("deserialize");
/// assert_eq!(value, serde_json::json!({"a": 1}));
///
/// let err = read(br#"{"a":1"#, Format::Json).expect_err("missing brace");
/// assert!(err.to_string().ends_with(r#" : {"a":1"#));
/// ```
pub fn read(bytes: &[u8], format: Format) -> Result<Value> {
    match format {
        Format::Json => read_json(bytes),
    }
}

/// Serialize a value in the format named by `tag`.
pub fn write_tagged<T: Serialize + ?Sized>(value: &T, tag: &str) -> Result<Bytes> {
    write(value, tag.parse()?)
}

/// Deserialize bytes in the format named by `tag`.
pub fn read_tagged(bytes: &[u8], tag: &str) -> Result<Value> {
    read(bytes, tag.parse()?)
}

/// Convert a structural value into a typed one, with path-aware errors.
pub fn from_value<T: serde::de::DeserializeOwned>(value: Value) -> Result<T> {
    serde_path_to_error::deserialize(value)
        .map_err(|e| Error::json_deserialization(e.path().to_string(), e.inner().to_string()))
}

fn read_json(bytes: &[u8]) -> Result<Value> {
    serde_json::from_slice(bytes).map_err(|err| annotate(err, bytes))
}

fn annotate(err: serde_json::Error, bytes: &[u8]) -> Error {
    let Some((line, _column)) = line_and_column(&err) else {
        return Error::Json(err);
    };

    // EOF after a trailing newline points past the last line: no text to quote.
    let source = String::from_utf8_lossy(bytes);
    let text = source.lines().nth(line - 1).unwrap_or_default();
    Error::malformed_payload(format!("{err} : {text}"))
}

// serde_json reports line 0 when the error has no source position.
fn line_and_column(err: &serde_json::Error) -> Option<(usize, usize)> {
    (err.line() > 0).then(|| (err.line(), err.column()))
}
