//! Predicate dispatch over a [`HyperionResult`].
//!
//! A [`HandlerGroup`] is an ordered list of `(predicate, consequent)` pairs.
//! Dispatching a result invokes the consequent of the first matching
//! predicate and nothing else; a group where nothing matches does nothing.
//!
//! # Example
//!
//! ```
//! use hyperion_core::{HandlerGroup, HyperionResult, Method, Predicate, Route};
//!
//! let route = Route::new(Method::Get, "http://indigo.com/things").expect("route");
//! let result = HyperionResult::http(route, 333, None);
//!
//! let group = HandlerGroup::new()
//!     .when(Predicate::test(|r| r.code().is_some_and(|c| c % 2 == 1)), |_| Ok("odd"))
//!     .when_value(333, "got 333");
//!
//! assert_eq!(group.dispatch(&result).expect("matched").expect("ok"), "odd");
//! ```

use std::ops::RangeInclusive;
use std::sync::Arc;

use crate::{HyperionResult, Result, Status};

/// A matcher over a [`HyperionResult`].
#[derive(Clone)]
pub enum Predicate {
    /// Exact HTTP code.
    Code(u16),
    /// Inclusive range of HTTP codes.
    Codes(RangeInclusive<u16>),
    /// Classification.
    Status(Status),
    /// Arbitrary test.
    Test(Arc<dyn Fn(&HyperionResult) -> bool + Send + Sync>),
}

impl Predicate {
    /// Predicate from an arbitrary test.
    pub fn test<F>(f: F) -> Self
    where
        F: Fn(&HyperionResult) -> bool + Send + Sync + 'static,
    {
        Self::Test(Arc::new(f))
    }

    /// Returns `true` if the predicate matches the result.
    ///
    /// Code predicates never match a result without an HTTP code.
    #[must_use]
    pub fn matches(&self, result: &HyperionResult) -> bool {
        match self {
            Self::Code(code) => result.code() == Some(*code),
            Self::Codes(codes) => result.code().is_some_and(|code| codes.contains(&code)),
            Self::Status(status) => result.status() == *status,
            Self::Test(test) => test(result),
        }
    }
}

impl std::fmt::Debug for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Code(code) => f.debug_tuple("Code").field(code).finish(),
            Self::Codes(codes) => f.debug_tuple("Codes").field(codes).finish(),
            Self::Status(status) => f.debug_tuple("Status").field(status).finish(),
            Self::Test(_) => f.write_str("Test(..)"),
        }
    }
}

impl From<u16> for Predicate {
    fn from(code: u16) -> Self {
        Self::Code(code)
    }
}

impl From<RangeInclusive<u16>> for Predicate {
    fn from(codes: RangeInclusive<u16>) -> Self {
        Self::Codes(codes)
    }
}

impl From<Status> for Predicate {
    fn from(status: Status) -> Self {
        Self::Status(status)
    }
}

/// Consequent invoked with the matched result.
pub type Consequent<T> = Box<dyn FnOnce(&HyperionResult) -> Result<T> + Send>;

/// An ordered list of `(predicate, consequent)` pairs evaluated as a unit.
pub struct HandlerGroup<T> {
    handlers: Vec<(Predicate, Consequent<T>)>,
}

impl<T> HandlerGroup<T> {
    /// Creates an empty group.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Appends a handler.
    #[must_use]
    pub fn when<F>(mut self, predicate: impl Into<Predicate>, consequent: F) -> Self
    where
        F: FnOnce(&HyperionResult) -> Result<T> + Send + 'static,
    {
        self.handlers.push((predicate.into(), Box::new(consequent)));
        self
    }

    /// Appends a handler returning a fixed value.
    #[must_use]
    pub fn when_value(self, predicate: impl Into<Predicate>, value: T) -> Self
    where
        T: Send + 'static,
    {
        self.when(predicate, move |_| Ok(value))
    }

    /// Number of handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns `true` if the group has no handlers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Invoke the consequent of the first matching predicate.
    ///
    /// Returns `None` when no predicate matched.
    pub fn dispatch(self, result: &HyperionResult) -> Option<Result<T>> {
        self.handlers
            .into_iter()
            .find(|(predicate, _)| predicate.matches(result))
            .map(|(_, consequent)| consequent(result))
    }
}

impl<T> Default for HandlerGroup<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for HandlerGroup<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.handlers.iter().map(|(predicate, _)| predicate))
            .finish()
    }
}

/// Handler consulted for every request of a context, after the caller's
/// own handlers and before the built-in ones.
///
/// Returning `None` lets later handlers act.
///
/// # Example
///
/// ```
/// use hyperion_core::{HyperionResult, Result, ResultHandler};
///
/// struct Canned(&'static str);
///
/// impl ResultHandler<&'static str> for Canned {
///     fn handle(&self, _result: &HyperionResult) -> Option<Result<&'static str>> {
///         Some(Ok(self.0))
///     }
/// }
/// ```
pub trait ResultHandler<T>: Send + Sync {
    /// Handle the result, or return `None` if it does not apply.
    fn handle(&self, result: &HyperionResult) -> Option<Result<T>>;
}

impl<T, F> ResultHandler<T> for F
where
    F: Fn(&HyperionResult) -> Option<Result<T>> + Send + Sync,
{
    fn handle(&self, result: &HyperionResult) -> Option<Result<T>> {
        self(result)
    }
}
