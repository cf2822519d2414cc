//! REST client that classifies every response and dispatches it to handlers.
//!
//! A request names a [`Route`]; its outcome is classified into a [`Status`],
//! then handled by the first matching handler: the request's own
//! `also_handle` handlers, an optional [`ResultHandler`], and finally the
//! built-in ones (render successes, raise on 404, 4xx and 5xx). Nothing
//! matching is an error, never a silent default.
//!
//! # Example
//!
//! ```no_run
//! use hyperion::prelude::*;
//!
//! #[derive(Debug, Deserialize)]
//! pub struct Thing {
//!     id: u64,
//!     name: String,
//! }
//!
//! # async fn run() -> hyperion::Result<()> {
//! let requestor = Requestor::hyper(ClientConfig::default());
//! let route = Route::new(Method::Get, "https://indigo.com/things/42")?
//!     .with_response(ResponseDescriptor::new("thing", 1, Format::Json));
//!
//! let options = RequestOptions::with_pipeline(Pipeline::new().render(as_type::<Thing>()))
//!     .timeout(std::time::Duration::from_secs(5));
//! let thing = requestor.request(&route, options).await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod connector;
pub mod middleware;
pub mod prelude;
mod requestor;
pub mod transport;

pub use config::{ClientConfig, ClientConfigBuilder};
pub use requestor::{RequestOptions, Requestor};
pub use transport::{HyperTransport, HyperTransportBuilder, ServiceFuture};

// Re-export tower for middleware composition
pub use tower;

// Re-export core types
pub use hyperion_core::{
    Base, ClientErrorCode, ClientErrorResponse, Consequent, DEFAULT_VENDOR, Error, Format,
    HandlerChain, HandlerGroup, HyperionResult, Inspect, Method, PayloadDescriptor, Pipeline, Predicate,
    Request, RequestBuilder, ResponseDescriptor, Result, ResultHandler, Route, RouteKey, Status,
    Transport, as_many, as_type, from_value, read, read_tagged, write, write_tagged,
};

pub use url;
