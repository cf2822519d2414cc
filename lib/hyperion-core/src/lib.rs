//! Core types and traits for hyperion, a response-classification and
//! handler-dispatch engine over HTTP.
//!
//! This crate provides the transport-agnostic pieces:
//! - [`Route`], [`ResponseDescriptor`] and [`PayloadDescriptor`] - what is requested
//! - [`HyperionResult`] and [`Status`] - the classified outcome of one attempt
//! - [`Format`], [`read`] and [`write`] - payload codec with line-annotated parse errors
//! - [`Predicate`] and [`HandlerGroup`] - first-match predicate dispatch
//! - [`ResultHandler`] - optional override consulted for every request
//! - [`Pipeline`] - render, project and final callback on success
//! - [`HandlerChain`] - handler precedence and fallthrough
//! - [`Request`] and [`Transport`] - the boundary with the network
//! - [`Error`] and [`Result`] - error handling

mod chain;
mod client_error;
mod descriptor;
mod dispatch;
mod error;
mod format;
mod method;
mod pipeline;
pub mod prelude;
mod request;
mod result;
mod route;
mod transport;

pub use chain::HandlerChain;
pub use client_error::{ClientErrorCode, ClientErrorResponse};
pub use descriptor::{DEFAULT_VENDOR, PayloadDescriptor, ResponseDescriptor};
pub use dispatch::{Consequent, HandlerGroup, Predicate, ResultHandler};
pub use error::{Error, Result};
pub use format::{Format, from_value, read, read_tagged, write, write_tagged};
pub use method::Method;
pub use pipeline::{Pipeline, as_many, as_type};
pub use request::{Request, RequestBuilder};
pub use result::{HyperionResult, Inspect, Status};
pub use route::{Base, Route, RouteKey};
pub use transport::Transport;
