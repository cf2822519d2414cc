//! Prelude module for convenient imports.
//!
//! ```
//! use hyperion_core::prelude::*;
//! ```

pub use crate::{
    Error, Format, HandlerGroup, HyperionResult, Method, PayloadDescriptor, Pipeline, Predicate,
    ResponseDescriptor, Result, ResultHandler, Route, Status, Transport, as_many, as_type,
};
