//! Integration tests for middleware composition.

use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use hyperion::{
    Error, HyperTransport, HyperionResult, Method, Request, Result, Route, Status, Transport,
    middleware::{Layer, Service},
    transport::ServiceFuture,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

/// Adds a header to every request and records the order layers ran in.
#[derive(Clone)]
struct TagLayer {
    tag: &'static str,
    seen: Arc<Mutex<Vec<&'static str>>>,
}

impl<S> Layer<S> for TagLayer {
    type Service = Tag<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Tag {
            inner,
            tag: self.tag,
            seen: Arc::clone(&self.seen),
        }
    }
}

#[derive(Clone)]
struct Tag<S> {
    inner: S,
    tag: &'static str,
    seen: Arc<Mutex<Vec<&'static str>>>,
}

impl<S> Service<Request> for Tag<S>
where
    S: Service<Request, Response = HyperionResult, Error = Error, Future = ServiceFuture>,
{
    type Response = HyperionResult;
    type Error = Error;
    type Future = ServiceFuture;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<()>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request) -> Self::Future {
        self.seen.lock().expect("lock").push(self.tag);
        request
            .headers_mut()
            .insert(format!("X-Tag-{}", self.tag), "1".to_string());
        self.inner.call(request)
    }
}

#[tokio::test]
async fn test_logging_middleware() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/logged"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"logged": true})))
        .mount(&mock_server)
        .await;

    let transport = HyperTransport::builder().with_logging().build();

    let route = Route::new(Method::Get, format!("{}/logged", mock_server.uri())).expect("uri");
    let result = transport.perform(Request::builder(route).build()).await.expect("result");

    assert_eq!(result.status(), Status::Success);
}

#[tokio::test]
async fn test_debug_logging_keeps_failures_as_results() {
    let transport = HyperTransport::builder().with_debug_logging().build();

    let route = Route::new(Method::Get, "http://127.0.0.1:1/").expect("uri");
    let result = transport.perform(Request::builder(route).build()).await.expect("result");

    assert_eq!(result.status(), Status::NoResponse);
}

#[tokio::test]
async fn test_layers_apply_in_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tagged"))
        .and(header("X-Tag-outer", "1"))
        .and(header("X-Tag-inner", "1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let seen = Arc::new(Mutex::new(Vec::new()));
    let transport = HyperTransport::builder()
        .layer(TagLayer {
            tag: "outer",
            seen: Arc::clone(&seen),
        })
        .with_logging()
        .layer(TagLayer {
            tag: "inner",
            seen: Arc::clone(&seen),
        })
        .build();

    let route = Route::new(Method::Get, format!("{}/tagged", mock_server.uri())).expect("uri");
    let result = transport.perform(Request::builder(route).build()).await.expect("result");

    assert_eq!(result.code(), Some(204));
    assert_eq!(*seen.lock().expect("lock"), vec!["outer", "inner"]);
}
