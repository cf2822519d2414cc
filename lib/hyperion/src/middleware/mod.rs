//! Tower middleware layers for the hyperion transport.
//!
//! Layers wrap the type-erased transport service
//! ([`BoxedService`](crate::transport::BoxedService)), whose response is an
//! already classified [`HyperionResult`](crate::HyperionResult).
//!
//! # Example
//!
//! ```
//! use hyperion::{HyperTransport, middleware::LoggingLayer};
//!
//! let transport = HyperTransport::builder()
//!     .layer(LoggingLayer::new())
//!     .build();
//! ```

mod logging;

pub use logging::{LogLevel, Logging, LoggingLayer};
pub use tower::{Layer, Service, ServiceBuilder};
