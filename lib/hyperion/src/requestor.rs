//! Request entry point: perform a route, dispatch its result.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::{
    ClientConfig, HandlerChain, HandlerGroup, HyperTransport, HyperionResult, Pipeline, Predicate,
    Request, Result, ResultHandler, Route, Transport,
};

/// Per-request options: body, headers, timeout, extra handlers, success pipeline.
///
/// `T` is the value returned by the request, produced either by the success
/// [`Pipeline`] or by one of the handlers.
///
/// # Example
///
/// ```
/// use hyperion::{Pipeline, RequestOptions, Status, as_type};
///
/// #[derive(serde::Deserialize)]
/// struct Thing {
///     name: String,
/// }
///
/// let options = RequestOptions::with_pipeline(
///     Pipeline::new()
///         .render(as_type::<Thing>())
///         .project(|thing| Ok(Some(thing.name))),
/// )
/// .header("X-Trace", "1")
/// .also_handle_value(Status::BadRoute, None);
/// ```
pub struct RequestOptions<T> {
    body: Option<Value>,
    headers: Vec<(String, String)>,
    timeout: Duration,
    also_handle: HandlerGroup<T>,
    pipeline: Pipeline<T>,
}

impl RequestOptions<Value> {
    /// Options returning the response body unchanged.
    #[must_use]
    pub fn new() -> Self {
        Self::with_pipeline(Pipeline::new())
    }
}

impl Default for RequestOptions<Value> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> RequestOptions<T> {
    /// Options returning the output of the success pipeline.
    #[must_use]
    pub fn with_pipeline(pipeline: Pipeline<T>) -> Self {
        Self {
            body: None,
            headers: Vec::new(),
            timeout: Duration::ZERO,
            also_handle: HandlerGroup::new(),
            pipeline,
        }
    }

    /// Sets the payload.
    #[must_use]
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets the payload from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be represented as JSON.
    pub fn payload<B: Serialize + ?Sized>(self, body: &B) -> Result<Self> {
        let body = serde_json::to_value(body)?;
        Ok(self.body(body))
    }

    /// Adds a header, sent after the negotiated ones.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Adds multiple headers.
    #[must_use]
    pub fn headers<K, V>(mut self, headers: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Sets the transfer timeout. Zero, the default, means no timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Adds a handler evaluated before every other one.
    #[must_use]
    pub fn also_handle<F>(mut self, predicate: impl Into<Predicate>, consequent: F) -> Self
    where
        F: FnOnce(&HyperionResult) -> Result<T> + Send + 'static,
    {
        self.also_handle = self.also_handle.when(predicate, consequent);
        self
    }

    /// Adds a handler returning a fixed value.
    #[must_use]
    pub fn also_handle_value(mut self, predicate: impl Into<Predicate>, value: T) -> Self
    where
        T: Send,
    {
        self.also_handle = self.also_handle.when_value(predicate, value);
        self
    }
}

impl<T> std::fmt::Debug for RequestOptions<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestOptions")
            .field("body", &self.body)
            .field("headers", &self.headers)
            .field("timeout", &self.timeout)
            .field("also_handle", &self.also_handle)
            .finish_non_exhaustive()
    }
}

/// Performs routes through a [`Transport`] and dispatches their results.
///
/// Precedence, first match wins: the request's `also_handle` handlers, then
/// the optional [`ResultHandler`] given to [`Requestor::request_with`], then
/// the built-in handlers. An unmatched result is an
/// [`Error::Fallthrough`](crate::Error::Fallthrough).
///
/// # Example
///
/// ```no_run
/// use hyperion::{Method, RequestOptions, Requestor, ResponseDescriptor, Route, Format};
///
/// # async fn run() -> hyperion::Result<()> {
/// let requestor = Requestor::hyper(hyperion::ClientConfig::default());
/// let route = Route::new(Method::Get, "https://indigo.com/things")?
///     .with_response(ResponseDescriptor::new("thing", 1, Format::Json));
///
/// let things = requestor.request(&route, RequestOptions::new()).await?;
/// println!("{things}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Requestor<C> {
    transport: C,
    vendor: String,
}

impl Requestor<HyperTransport> {
    /// Requestor over a network transport built from the configuration.
    #[must_use]
    pub fn hyper(config: ClientConfig) -> Self {
        Self::new(HyperTransport::with_config(config))
    }
}

impl<C: Transport> Requestor<C> {
    /// Requestor over the given transport, negotiating with its vendor.
    #[must_use]
    pub fn new(transport: C) -> Self {
        let vendor = transport.vendor().to_string();
        Self { transport, vendor }
    }

    /// Sets the vendor used in negotiated mimetypes.
    #[must_use]
    pub fn with_vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = vendor.into();
        self
    }

    /// The transport.
    #[must_use]
    pub const fn transport(&self) -> &C {
        &self.transport
    }

    /// The vendor used in negotiated mimetypes.
    #[must_use]
    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    /// Perform the route and dispatch the result.
    ///
    /// # Errors
    ///
    /// Returns the error raised by the matched handler, or
    /// [`Error::Fallthrough`](crate::Error::Fallthrough) if none matched.
    pub async fn request<T: 'static>(&self, route: &Route, options: RequestOptions<T>) -> Result<T> {
        self.perform(route, options, None).await
    }

    /// Same as [`Requestor::request`], consulting `handler` after the
    /// request's own handlers and before the built-in ones.
    ///
    /// # Errors
    ///
    /// Returns the error raised by the matched handler, or
    /// [`Error::Fallthrough`](crate::Error::Fallthrough) if none matched.
    pub async fn request_with<T: 'static>(
        &self,
        route: &Route,
        options: RequestOptions<T>,
        handler: &dyn ResultHandler<T>,
    ) -> Result<T> {
        self.perform(route, options, Some(handler)).await
    }

    async fn perform<T: 'static>(
        &self,
        route: &Route,
        options: RequestOptions<T>,
        handler: Option<&dyn ResultHandler<T>>,
    ) -> Result<T> {
        let RequestOptions {
            body,
            headers,
            timeout,
            also_handle,
            pipeline,
        } = options;

        let mut builder = Request::builder(route.clone())
            .negotiate(&self.vendor)
            .headers(headers)
            .timeout(timeout);
        if let Some(body) = &body {
            builder = builder.payload(body)?;
        }

        debug!(%route, "performing request");
        let result = self.transport.perform(builder.build()).await?;
        debug!(%result, "request performed");

        let mut chain = HandlerChain::new(also_handle, pipeline);
        if let Some(handler) = handler {
            chain = chain.with_handler(handler);
        }
        chain.dispatch(&result)
    }
}
