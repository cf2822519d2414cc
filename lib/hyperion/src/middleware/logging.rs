//! Request/result logging middleware.
//!
//! This middleware logs requests and their classified results using the `tracing` crate.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use tower::{Layer, Service};
use tracing::{Instrument, Level, debug, info, span, warn};

use crate::{Error, HyperionResult, Request, Result, Status};

/// Layer that adds request/result logging.
///
/// # Example
///
/// ```
/// use hyperion::middleware::LoggingLayer;
/// use hyperion::HyperTransport;
///
/// let transport = HyperTransport::builder()
///     .layer(LoggingLayer::debug())
///     .build();
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingLayer {
    level: LogLevel,
}

/// Log level for the logging middleware.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Log at debug level (with request headers).
    Debug,
    /// Log at info level (summary only).
    #[default]
    Info,
}

impl LoggingLayer {
    /// Create a new logging layer with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a logging layer that logs at debug level.
    #[must_use]
    pub fn debug() -> Self {
        Self {
            level: LogLevel::Debug,
        }
    }
}

impl<S> Layer<S> for LoggingLayer {
    type Service = Logging<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Logging {
            inner,
            level: self.level,
        }
    }
}

/// Service that logs requests and results.
#[derive(Debug, Clone)]
pub struct Logging<S> {
    inner: S,
    level: LogLevel,
}

impl<S> Logging<S> {
    /// Create a new logging service wrapping the given service.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            level: LogLevel::Info,
        }
    }
}

impl<S> Service<Request> for Logging<S>
where
    S: Service<Request, Response = HyperionResult, Error = Error> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = HyperionResult;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<()>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let route = request.route().to_string();
        let level = self.level;

        let span = span!(Level::INFO, "http_request", %route);

        let mut inner = self.inner.clone();
        Box::pin(
            async move {
                let start = Instant::now();

                match level {
                    LogLevel::Debug => {
                        debug!(headers = ?request.headers(), timeout = ?request.timeout(), "sending request");
                    }
                    LogLevel::Info => info!("sending request"),
                }

                let outcome = inner.call(request).await;

                // Saturating conversion to u64 (truncates after ~584 million years)
                let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

                match &outcome {
                    Ok(result) if result.status() == Status::Success => {
                        info!(status = %result.status(), code = result.code(), elapsed_ms, "request completed");
                    }
                    Ok(result) => {
                        warn!(status = %result.status(), code = result.code(), elapsed_ms, "request did not succeed");
                    }
                    Err(err) => warn!(error = %err, elapsed_ms, "request failed"),
                }

                outcome
            }
            .instrument(span),
        )
    }
}

#[cfg(test)]
mod tests {
    use tower::{ServiceExt, service_fn};

    use super::*;
    use crate::{Method, Route};

    #[test]
    fn logging_layer_default() {
        assert_eq!(LoggingLayer::new().level, LogLevel::Info);
        assert_eq!(LoggingLayer::debug().level, LogLevel::Debug);
    }

    #[tokio::test]
    async fn passes_results_through() {
        let inner = service_fn(|request: Request| async move {
            Ok::<_, Error>(HyperionResult::http(request.route().clone(), 418, None))
        });
        let service = LoggingLayer::debug().layer(inner);

        let route = Route::new(Method::Get, "http://indigo.com/teapot").expect("route");
        let result = service
            .oneshot(Request::builder(route).build())
            .await
            .expect("result");

        assert_eq!(result.code(), Some(418));
        assert_eq!(result.status(), Status::ClientError);
    }
}
