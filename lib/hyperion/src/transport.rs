//! HTTP transport implementation using hyper-util.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper_rustls::HttpsConnector;
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::TokioExecutor,
};
use tower::Layer;
use tower::util::BoxCloneService;
use tower_service::Service;
use tracing::debug;

use crate::{
    Error, HyperionResult, Request, Result, Route, Transport,
    config::{ClientConfig, ClientConfigBuilder},
    connector::https_connector,
    middleware::LoggingLayer,
};

// ============================================================================
// Type-Erased Service for Middleware Composition
// ============================================================================

/// Type-erased transport service, the unit of middleware composition.
pub type BoxedService = BoxCloneService<Request, HyperionResult, Error>;

/// Future type for Tower Service implementation.
pub type ServiceFuture = Pin<Box<dyn Future<Output = Result<HyperionResult>> + Send + 'static>>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Thread-safe wrapper for `BoxedService`, required by the [`Transport`] trait.
#[derive(Clone)]
struct SyncService {
    inner: Arc<Mutex<BoxedService>>,
}

impl SyncService {
    fn new(service: BoxedService) -> Self {
        Self {
            inner: Arc::new(Mutex::new(service)),
        }
    }

    fn call(&self, request: Request) -> ServiceFuture {
        // Lock, clone the service, and release the lock immediately
        let mut service = self
            .inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone();

        Box::pin(async move { service.call(request).await })
    }
}

// ============================================================================
// Raw Transport
// ============================================================================

/// Raw HTTP transport using hyper-util.
#[derive(Clone)]
struct RawHyperTransport {
    inner: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
}

impl RawHyperTransport {
    fn new(config: &ClientConfig) -> Self {
        let connector = https_connector(config.connect_timeout);

        let inner = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_idle_per_host)
            .build(connector);

        Self { inner }
    }

    fn build_hyper_request(
        route: &Route,
        headers: &HashMap<String, String>,
        body: Option<Bytes>,
    ) -> Result<http::Request<Full<Bytes>>> {
        let mut builder = http::Request::builder()
            .method(http::Method::from(route.method()))
            .uri(route.uri().as_str());

        for (name, value) in headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let body = body.map_or_else(Full::default, Full::new);
        builder
            .body(body)
            .map_err(|e| Error::invalid_request(e.to_string()))
    }

    fn extract_headers(headers: &http::HeaderMap) -> HashMap<String, String> {
        headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.to_string(), v.to_string()))
            })
            .collect()
    }

    async fn exchange(
        &self,
        request: http::Request<Full<Bytes>>,
    ) -> std::result::Result<(u16, HashMap<String, String>, Bytes), BoxError> {
        let response = self.inner.request(request).await?;

        let code = response.status().as_u16();
        let headers = Self::extract_headers(response.headers());
        let body = response.into_body().collect().await?.to_bytes();

        Ok((code, headers, body))
    }

    async fn perform(&self, request: Request) -> Result<HyperionResult> {
        let timeout = request.timeout();
        let (route, headers, body) = request.into_parts();
        let hyper_request = Self::build_hyper_request(&route, &headers, body)?;

        let exchange = self.exchange(hyper_request);
        let outcome = match timeout {
            Some(limit) => match tokio::time::timeout(limit, exchange).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    debug!(%route, ?limit, "request timed out");
                    return Ok(HyperionResult::timed_out(route));
                }
            },
            None => exchange.await,
        };

        match outcome {
            Ok((code, headers, body)) => HyperionResult::from_response(route, code, &headers, &body),
            Err(err) => {
                debug!(%route, error = %err, "no response");
                Ok(HyperionResult::no_response(route))
            }
        }
    }
}

impl Service<Request> for RawHyperTransport {
    type Response = HyperionResult;
    type Error = Error;
    type Future = ServiceFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let transport = self.clone();
        Box::pin(async move { transport.perform(request).await })
    }
}

// ============================================================================
// Public Transport
// ============================================================================

/// HTTP transport using hyper-util with connection pooling, TLS, and middleware support.
///
/// Every attempt yields one classified [`HyperionResult`]: a response of any
/// code, [`Status::TimedOut`](crate::Status::TimedOut) when the request
/// timeout elapsed, or [`Status::NoResponse`](crate::Status::NoResponse)
/// when the connection or the transfer failed.
///
/// # Example
///
/// ```
/// use hyperion::HyperTransport;
///
/// let transport = HyperTransport::builder()
///     .vendor_string("indigo")
///     .with_logging()
///     .build();
/// assert_eq!(transport.config().vendor_string, "indigo");
/// ```
#[derive(Clone)]
pub struct HyperTransport {
    service: SyncService,
    config: ClientConfig,
}

impl std::fmt::Debug for HyperTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperTransport")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HyperTransport {
    /// Create a new transport with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new transport with custom configuration (no middleware).
    #[must_use]
    pub fn with_config(config: ClientConfig) -> Self {
        let raw = RawHyperTransport::new(&config);
        Self {
            service: SyncService::new(BoxCloneService::new(raw)),
            config,
        }
    }

    /// Create a new transport builder.
    #[must_use]
    pub fn builder() -> HyperTransportBuilder {
        HyperTransportBuilder::default()
    }

    /// Get the transport configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl Default for HyperTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HyperTransport {
    fn perform(&self, request: Request) -> impl Future<Output = Result<HyperionResult>> + Send {
        self.service.call(request)
    }

    fn vendor(&self) -> &str {
        &self.config.vendor_string
    }
}

impl Service<Request> for HyperTransport {
    type Response = HyperionResult;
    type Error = Error;
    type Future = ServiceFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request) -> Self::Future {
        self.service.call(request)
    }
}

/// Builder for [`HyperTransport`].
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use hyperion::{HyperTransport, middleware::LoggingLayer};
///
/// let transport = HyperTransport::builder()
///     .connect_timeout(Duration::from_secs(2))
///     .layer(LoggingLayer::debug())
///     .build();
/// ```
#[derive(Default)]
pub struct HyperTransportBuilder {
    config: ClientConfigBuilder,
    layers: Vec<Arc<dyn Fn(BoxedService) -> BoxedService + Send + Sync>>,
}

impl std::fmt::Debug for HyperTransportBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperTransportBuilder")
            .field("config", &self.config)
            .field("layers_count", &self.layers.len())
            .finish()
    }
}

impl HyperTransportBuilder {
    /// Set the vendor string used in negotiated mimetypes.
    #[must_use]
    pub fn vendor_string(mut self, vendor: impl Into<String>) -> Self {
        self.config = self.config.vendor_string(vendor);
        self
    }

    /// Set the connection timeout.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.connect_timeout(timeout);
        self
    }

    /// Set the maximum idle connections per host.
    #[must_use]
    pub fn pool_idle_per_host(mut self, count: usize) -> Self {
        self.config = self.config.pool_idle_per_host(count);
        self
    }

    /// Set the idle connection timeout.
    #[must_use]
    pub fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.pool_idle_timeout(timeout);
        self
    }

    /// Add a Tower layer to the transport.
    ///
    /// Layers are applied in order: first added = outermost.
    #[must_use]
    pub fn layer<L>(mut self, layer: L) -> Self
    where
        L: Layer<BoxedService> + Send + Sync + 'static,
        L::Service: Service<Request, Response = HyperionResult, Error = Error> + Clone + Send + 'static,
        <L::Service as Service<Request>>::Future: Send,
    {
        self.layers.push(Arc::new(move |service| {
            BoxCloneService::new(layer.layer(service))
        }));
        self
    }

    /// Add request/result logging.
    #[must_use]
    pub fn with_logging(self) -> Self {
        self.layer(LoggingLayer::new())
    }

    /// Add debug-level logging (includes headers).
    #[must_use]
    pub fn with_debug_logging(self) -> Self {
        self.layer(LoggingLayer::debug())
    }

    /// Build the transport with all configured middleware.
    #[must_use]
    pub fn build(self) -> HyperTransport {
        let config = self.config.build();
        let mut service: BoxedService = BoxCloneService::new(RawHyperTransport::new(&config));

        // Wrap in reverse so that the first added layer is the outermost
        for layer_fn in self.layers.into_iter().rev() {
            service = layer_fn(service);
        }

        HyperTransport {
            service: SyncService::new(service),
            config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_default() {
        let transport = HyperTransport::new();
        assert_eq!(transport.config().vendor_string, "hyperion");
        assert_eq!(transport.config().pool_idle_per_host, 32);
    }

    #[test]
    fn transport_builder() {
        let transport = HyperTransport::builder()
            .vendor_string("indigo")
            .pool_idle_per_host(16)
            .with_logging()
            .build();

        assert_eq!(transport.config().vendor_string, "indigo");
        assert_eq!(transport.config().pool_idle_per_host, 16);
    }

    #[test]
    fn transport_is_clone() {
        let transport = HyperTransport::new();
        let _cloned = transport.clone();
    }
}
