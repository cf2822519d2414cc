//! Fake servers for testing hyperion clients without a network.
//!
//! A [`FakeRegistry`] is a [`Transport`](hyperion_core::Transport): register
//! canned responses per base URI, then hand it to the code under test.
//!
//! - [`FakeRegistry`] - the registry, shared by its clones
//! - [`FakeServer`] - the rules registered for one base URI
//! - [`FakeRequest`] - the request as seen by a response producer
//! - [`FakeResponse`] - a canned response

mod exchange;
mod registry;

pub use exchange::{FakeRequest, FakeResponse};
pub use registry::{FakeRegistry, FakeServer};
