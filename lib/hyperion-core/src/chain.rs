//! The handler chain: caller handlers, override handler, built-ins, fallthrough.

use serde_json::Value;
use tracing::debug;

use crate::{
    ClientErrorCode, ClientErrorResponse, Error, HandlerGroup, HyperionResult, Inspect, Pipeline,
    Result, ResultHandler, Route, Status,
};

/// Dispatches one result through every handler group, in precedence order.
///
/// 1. the caller's `also_handle` group;
/// 2. the optional override [`ResultHandler`];
/// 3. the built-in handlers (success pipeline, 404, 4xx, 5xx).
///
/// The first group that matches decides. If none does, dispatch fails with
/// [`Error::Fallthrough`].
pub struct HandlerChain<'h, T> {
    also_handle: HandlerGroup<T>,
    handler: Option<&'h dyn ResultHandler<T>>,
    pipeline: Pipeline<T>,
}

impl<'h, T: 'static> HandlerChain<'h, T> {
    /// Creates a chain from the caller's handlers and success pipeline.
    #[must_use]
    pub const fn new(also_handle: HandlerGroup<T>, pipeline: Pipeline<T>) -> Self {
        Self {
            also_handle,
            handler: None,
            pipeline,
        }
    }

    /// Sets the override handler.
    #[must_use]
    pub fn with_handler(mut self, handler: &'h dyn ResultHandler<T>) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Dispatch the result.
    pub fn dispatch(self, result: &HyperionResult) -> Result<T> {
        if let Some(outcome) = self.also_handle.dispatch(result) {
            debug!(%result, group = "also_handle", "result handled");
            return outcome;
        }

        if let Some(outcome) = self.handler.and_then(|handler| handler.handle(result)) {
            debug!(%result, group = "handler", "result handled");
            return outcome;
        }

        if let Some(outcome) = built_in(self.pipeline).dispatch(result) {
            debug!(%result, group = "built_in", "result handled");
            return outcome;
        }

        debug!(%result, "result did not match any handler");
        Err(Error::fallthrough(result))
    }
}

impl<T> std::fmt::Debug for HandlerChain<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerChain")
            .field("also_handle", &self.also_handle)
            .field("handler", &self.handler.is_some())
            .finish_non_exhaustive()
    }
}

fn built_in<T: 'static>(pipeline: Pipeline<T>) -> HandlerGroup<T> {
    HandlerGroup::new()
        .when(Status::Success, move |result| {
            pipeline.run(result.body().cloned().unwrap_or(Value::Null))
        })
        .when(Status::BadRoute, |result| Err(on_bad_route(result)))
        .when(Status::ClientError, |result| Err(on_client_error(result)))
        .when(Status::ServerError, |result| Err(on_server_error(result)))
}

fn on_bad_route(result: &HyperionResult) -> Error {
    let payload = ClientErrorResponse::new(
        format!("Got HTTP 404 for {}. Is the route implemented?", result.route()),
        Vec::new(),
        ClientErrorCode::Unknown,
    );
    report_client_error(result.code(), payload)
}

fn on_client_error(result: &HyperionResult) -> Error {
    let body = result.body().filter(|body| !body.is_null());
    match body.and_then(ClientErrorResponse::from_body) {
        Some(payload) => report_client_error(result.code(), payload),
        None => report_unstructured_client_error(result.route(), result.code(), body),
    }
}

fn report_client_error(status: Option<u16>, payload: ClientErrorResponse) -> Error {
    Error::client_request(payload.message.clone(), status, Some(payload))
}

fn report_unstructured_client_error(route: &Route, status: Option<u16>, body: Option<&Value>) -> Error {
    let generic = format!("The request failed: {route}");
    match body {
        Some(body) => Error::client_request(format!("{generic}: {}", Inspect(body)), status, None),
        None => Error::client_request(generic, status, None),
    }
}

fn on_server_error(result: &HyperionResult) -> Error {
    let body = result
        .body()
        .filter(|body| !body.is_null())
        .map(|body| Inspect(body).to_string())
        .unwrap_or_default();
    Error::server_request(format!("{}\n{body}", result.route()), result.code())
}
