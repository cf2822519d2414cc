//! Transport trait.
//!
//! A [`Transport`] performs one [`Request`] and reports exactly one classified
//! [`HyperionResult`]. Timeouts and missing responses are results, not errors.
//! Implement it for the real network client, a fake registry, or a wrapper
//! adding headers.

use std::future::Future;

use crate::{DEFAULT_VENDOR, HyperionResult, Request, Result};

/// Performs requests.
///
/// # Example
///
/// ```
/// use hyperion_core::{HyperionResult, Request, Result, Transport};
///
/// /// Answers 204 to everything.
/// #[derive(Clone)]
/// struct NoContent;
///
/// impl Transport for NoContent {
///     async fn perform(&self, request: Request) -> Result<HyperionResult> {
///         Ok(HyperionResult::http(request.route().clone(), 204, None))
///     }
/// }
/// ```
pub trait Transport: Send + Sync {
    /// Perform the request and classify its outcome.
    ///
    /// # Errors
    ///
    /// Returns an error only when the request could not be attempted, or when
    /// a successful response body cannot be decoded.
    fn perform(&self, request: Request) -> impl Future<Output = Result<HyperionResult>> + Send;

    /// Vendor segment used when negotiating mimetypes for this transport.
    fn vendor(&self) -> &str {
        DEFAULT_VENDOR
    }
}

impl<T: Transport> Transport for &T {
    fn perform(&self, request: Request) -> impl Future<Output = Result<HyperionResult>> + Send {
        (**self).perform(request)
    }

    fn vendor(&self) -> &str {
        (**self).vendor()
    }
}

impl<T: Transport> Transport for std::sync::Arc<T> {
    fn perform(&self, request: Request) -> impl Future<Output = Result<HyperionResult>> + Send {
        (**self).perform(request)
    }

    fn vendor(&self) -> &str {
        (**self).vendor()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    struct Silent;

    impl Transport for Silent {
        async fn perform(&self, request: Request) -> Result<HyperionResult> {
            Ok(HyperionResult::no_response(request.route().clone()))
        }
    }

    struct Branded;

    impl Transport for Branded {
        async fn perform(&self, request: Request) -> Result<HyperionResult> {
            Ok(HyperionResult::no_response(request.route().clone()))
        }

        fn vendor(&self) -> &str {
            "indigo"
        }
    }

    fn vendor_of(transport: impl Transport) -> String {
        transport.vendor().to_string()
    }

    #[test]
    fn vendor_defaults_and_forwards() {
        assert_eq!(vendor_of(Silent), DEFAULT_VENDOR);
        assert_eq!(vendor_of(&Branded), "indigo");
        assert_eq!(vendor_of(Arc::new(Branded)), "indigo");
    }
}
