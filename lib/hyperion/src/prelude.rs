//! Prelude module for convenient imports.
//!
//! ```
//! use hyperion::prelude::*;
//! ```

pub use crate::{
    ClientConfig, Error, Format, HandlerGroup, HyperTransport, HyperionResult, Method,
    PayloadDescriptor, Pipeline, Predicate, RequestOptions, Requestor, ResponseDescriptor, Result,
    ResultHandler, Route, Status, Transport, as_many, as_type,
};
pub use serde::{Deserialize, Serialize};
