//! Registry of fake servers, indexed by base URI.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, warn};

use hyperion_core::{
    Base, DEFAULT_VENDOR, HyperionResult, Method, Request, Result, Route, RouteKey, Transport,
};

use crate::{FakeRequest, FakeResponse};

type Producer = Arc<dyn Fn(&FakeRequest) -> FakeResponse + Send + Sync>;

struct Rule {
    key: RouteKey,
    producer: Producer,
}

/// Rules being registered for one base URI, see [`FakeRegistry::fake`].
pub struct FakeServer {
    vendor: String,
    rules: Vec<Rule>,
}

impl FakeServer {
    /// Answers `method path` whatever the `Accept` header.
    pub fn allow<R, F>(&mut self, method: Method, path: &str, producer: F) -> &mut Self
    where
        R: Into<FakeResponse>,
        F: Fn(&FakeRequest) -> R + Send + Sync + 'static,
    {
        self.allow_key(RouteKey::new(method, path, None), producer)
    }

    /// Answers `method path` only for the given `Accept` header.
    pub fn allow_accepting<R, F>(
        &mut self,
        method: Method,
        path: &str,
        accept: impl Into<String>,
        producer: F,
    ) -> &mut Self
    where
        R: Into<FakeResponse>,
        F: Fn(&FakeRequest) -> R + Send + Sync + 'static,
    {
        self.allow_key(RouteKey::new(method, path, Some(accept.into())), producer)
    }

    /// Answers the route: its method, path and negotiated `Accept` header.
    pub fn allow_route<R, F>(&mut self, route: &Route, producer: F) -> &mut Self
    where
        R: Into<FakeResponse>,
        F: Fn(&FakeRequest) -> R + Send + Sync + 'static,
    {
        let key = route.key(&self.vendor);
        self.allow_key(key, producer)
    }

    fn allow_key<R, F>(&mut self, key: RouteKey, producer: F) -> &mut Self
    where
        R: Into<FakeResponse>,
        F: Fn(&FakeRequest) -> R + Send + Sync + 'static,
    {
        let producer: Producer = Arc::new(move |request| producer(request).into());
        merge(&mut self.rules, Rule { key, producer });
        self
    }
}

impl std::fmt::Debug for FakeServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.rules.iter().map(|rule| &rule.key))
            .finish()
    }
}

fn merge(rules: &mut Vec<Rule>, rule: Rule) {
    match rules.iter_mut().find(|existing| existing.key == rule.key) {
        Some(existing) => existing.producer = rule.producer,
        None => rules.push(rule),
    }
}

/// In-process fake servers answering requests with canned responses.
///
/// Clones share the same registrations. A request to a registered base with
/// no matching rule gets a `404`; a request to an unregistered base gets no
/// response at all.
///
/// # Example
///
/// ```
/// use hyperion_core::{Method, Request, Route, Status, Transport};
/// use hyperion_test::FakeRegistry;
/// use serde_json::json;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let registry = FakeRegistry::new();
/// registry
///     .fake("http://somesite.org", |server| {
///         server.allow(Method::Get, "/users/0", |_| json!({"name": "freddy"}));
///     })
///     .expect("valid base");
///
/// let route = Route::new(Method::Get, "http://somesite.org:80/users/0").expect("route");
/// let result = registry.perform(Request::builder(route).build()).await.expect("result");
/// assert_eq!(result.status(), Status::Success);
/// # }
/// ```
#[derive(Clone)]
pub struct FakeRegistry {
    servers: Arc<Mutex<HashMap<Base, Vec<Rule>>>>,
    vendor: String,
}

impl FakeRegistry {
    /// An empty registry, with the default vendor.
    #[must_use]
    pub fn new() -> Self {
        Self {
            servers: Arc::default(),
            vendor: DEFAULT_VENDOR.to_string(),
        }
    }

    /// Sets the vendor used to derive `Accept` headers from routes.
    #[must_use]
    pub fn with_vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = vendor.into();
        self
    }

    /// The vendor used to derive `Accept` headers from routes.
    #[must_use]
    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    /// Registers rules for a base URI.
    ///
    /// Rules are merged into the ones already registered for the same base:
    /// a rule for the same method, path and `Accept` header replaces the
    /// previous one, others are added.
    ///
    /// # Errors
    ///
    /// Returns an error if `base` is not an absolute URI.
    pub fn fake(&self, base: impl AsRef<str>, configure: impl FnOnce(&mut FakeServer)) -> Result<()> {
        let base = Base::parse(base)?;
        self.register(base, configure);
        Ok(())
    }

    /// Registers a single route at its own base.
    pub fn fake_route<R, F>(&self, route: &Route, producer: F)
    where
        R: Into<FakeResponse>,
        F: Fn(&FakeRequest) -> R + Send + Sync + 'static,
    {
        self.register(route.base().clone(), |server| {
            server.allow_route(route, producer);
        });
    }

    /// Forgets every registration.
    pub fn reset(&self) {
        self.lock().clear();
    }

    fn register(&self, base: Base, configure: impl FnOnce(&mut FakeServer)) {
        let mut server = FakeServer {
            vendor: self.vendor.clone(),
            rules: Vec::new(),
        };
        configure(&mut server);
        debug!(%base, rules = ?server, "registering fake server");

        let mut servers = self.lock();
        let rules = servers.entry(base).or_default();
        for rule in server.rules {
            merge(rules, rule);
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Base, Vec<Rule>>> {
        self.servers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The producer answering the request, `None` when its base is unknown.
    fn find(&self, request: &Request) -> Option<Option<Producer>> {
        let route = request.route();
        let servers = self.lock();
        let rules = servers.get(route.base())?;

        let path = route.uri().path();
        let accept = request.header("Accept");
        let candidates = rules
            .iter()
            .filter(|rule| rule.key.method() == route.method() && rule.key.path() == path);

        let mut fallback = None;
        for rule in candidates {
            match rule.key.accept() {
                Some(expected) if Some(expected) == accept => return Some(Some(Arc::clone(&rule.producer))),
                Some(_) => {}
                None => fallback = fallback.or_else(|| Some(Arc::clone(&rule.producer))),
            }
        }
        Some(fallback)
    }

    fn respond(&self, request: &Request) -> Option<FakeResponse> {
        match self.find(request)? {
            Some(producer) => Some(producer(&FakeRequest::from_request(request))),
            None => {
                warn!(
                    route = %request.route(),
                    accept = request.header("Accept"),
                    "no fake route matched, answering 404"
                );
                Some(FakeResponse::new(404))
            }
        }
    }
}

impl Default for FakeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FakeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let servers = self.lock();
        f.debug_struct("FakeRegistry")
            .field("vendor", &self.vendor)
            .field("bases", &servers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Transport for FakeRegistry {
    fn vendor(&self) -> &str {
        &self.vendor
    }

    async fn perform(&self, request: Request) -> Result<HyperionResult> {
        let route = request.route().clone();
        let Some(response) = self.respond(&request) else {
            debug!(%route, "no fake server for this base");
            return Ok(HyperionResult::no_response(route));
        };

        if let Some(delay) = response.delay() {
            match request.timeout() {
                Some(limit) if limit < delay => {
                    tokio::time::sleep(limit).await;
                    return Ok(HyperionResult::timed_out(route));
                }
                _ => tokio::time::sleep(delay).await,
            }
        }

        let (code, headers, body) = response.encode()?;
        HyperionResult::from_response(route, code, &headers, &body)
    }
}
