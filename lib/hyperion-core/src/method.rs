//! HTTP method types.

use std::str::FromStr;

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// GET method - retrieve a resource.
    #[display("GET")]
    Get,
    /// POST method - create a resource.
    #[display("POST")]
    Post,
    /// PUT method - replace a resource.
    #[display("PUT")]
    Put,
    /// DELETE method - remove a resource.
    #[display("DELETE")]
    Delete,
    /// PATCH method - partially update a resource.
    #[display("PATCH")]
    Patch,
    /// HEAD method - retrieve headers only.
    #[display("HEAD")]
    Head,
    /// OPTIONS method - retrieve allowed methods.
    #[display("OPTIONS")]
    Options,
}

impl Method {
    /// Returns `true` if requests with this method usually carry a payload.
    #[must_use]
    pub const fn has_payload(&self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }
}

impl FromStr for Method {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            "PATCH" => Ok(Self::Patch),
            "HEAD" => Ok(Self::Head),
            "OPTIONS" => Ok(Self::Options),
            _ => Err(crate::Error::bad_argument(format!("{s:?}"), "an HTTP method")),
        }
    }
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => Self::GET,
            Method::Post => Self::POST,
            Method::Put => Self::PUT,
            Method::Delete => Self::DELETE,
            Method::Patch => Self::PATCH,
            Method::Head => Self::HEAD,
            Method::Options => Self::OPTIONS,
        }
    }
}

impl TryFrom<http::Method> for Method {
    type Error = crate::Error;

    fn try_from(method: http::Method) -> Result<Self, Self::Error> {
        method.as_str().parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_display() {
        assert_eq!(Method::Get.to_string(), "GET");
        assert_eq!(Method::Post.to_string(), "POST");
        assert_eq!(Method::Delete.to_string(), "DELETE");
        assert_eq!(Method::Options.to_string(), "OPTIONS");
    }

    #[test]
    fn method_parse_is_case_insensitive() {
        assert_eq!("get".parse::<Method>().expect("get"), Method::Get);
        assert_eq!("Put".parse::<Method>().expect("put"), Method::Put);
        assert_eq!("PATCH".parse::<Method>().expect("patch"), Method::Patch);
    }

    #[test]
    fn method_parse_rejects_unknown_verbs() {
        let err = "fetch".parse::<Method>().expect_err("unknown verb");
        assert_eq!(
            err.to_string(),
            r#"You passed me "fetch", which is not an HTTP method"#
        );
    }

    #[test]
    fn method_serializes_lowercase() {
        let json = serde_json::to_string(&Method::Post).expect("serialize");
        assert_eq!(json, r#""post""#);
    }

    #[test]
    fn method_has_payload() {
        assert!(Method::Post.has_payload());
        assert!(Method::Put.has_payload());
        assert!(!Method::Get.has_payload());
        assert!(!Method::Delete.has_payload());
    }

    #[test]
    fn method_http_conversions() {
        assert_eq!(http::Method::from(Method::Get), http::Method::GET);
        assert_eq!(
            Method::try_from(http::Method::POST).expect("POST"),
            Method::Post
        );
        assert!(Method::try_from(http::Method::TRACE).is_err());
    }
}
