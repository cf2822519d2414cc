//! Integration tests for the fake server registry.

use std::time::Duration;

use assert2::{check, let_assert};
use serde_json::{Value, json};

use hyperion_core::{
    Format, HyperionResult, Method, PayloadDescriptor, Request, ResponseDescriptor, Route, Status,
    Transport,
};
use hyperion_test::{FakeRegistry, FakeResponse};

const VENDOR: &str = "indigobio-ascent";

fn registry() -> FakeRegistry {
    FakeRegistry::new().with_vendor(VENDOR)
}

fn user() -> ResponseDescriptor {
    ResponseDescriptor::new("user", 1, Format::Json)
}

fn route(method: Method, uri: &str) -> Route {
    Route::new(method, uri).expect("valid uri").with_response(user())
}

async fn request(registry: &FakeRegistry, route: &Route) -> HyperionResult {
    request_with_body(registry, route, None).await
}

async fn request_with_body(registry: &FakeRegistry, route: &Route, body: Option<Value>) -> HyperionResult {
    let mut builder = Request::builder(route.clone()).negotiate(VENDOR);
    if let Some(body) = body {
        builder = builder.payload(&body).expect("payload");
    }
    registry.perform(builder.build()).await.expect("result")
}

fn expect_success(result: &HyperionResult, body: &Value) {
    check!(result.status() == Status::Success);
    check!(result.code() == Some(200));
    check!(result.body() == Some(body));
}

#[tokio::test]
async fn implements_specific_routes() {
    let registry = registry();
    let get_user = route(Method::Get, "http://somesite.org/users/0");
    let post_greeting = Route::new(Method::Post, "http://somesite.org/say_hello")
        .expect("valid uri")
        .with_response(ResponseDescriptor::new("greeting", 1, Format::Json))
        .with_payload(PayloadDescriptor::new("greeting", 1, Format::Json));

    let (get, post) = (get_user.clone(), post_greeting.clone());
    registry
        .fake("http://somesite.org", move |server| {
            server
                .allow_route(&get, |_| json!({"name": "freddy"}))
                .allow_route(&post, |request| {
                    let name = request
                        .body()
                        .and_then(|body| body["name"].as_str())
                        .unwrap_or_default();
                    json!({"greeting": format!("hello, {name}")})
                });
        })
        .expect("valid base");

    let result = request(&registry, &get_user).await;
    expect_success(&result, &json!({"name": "freddy"}));

    let result = request_with_body(&registry, &post_greeting, Some(json!({"name": "freddy"}))).await;
    expect_success(&result, &json!({"greeting": "hello, freddy"}));
}

#[tokio::test]
async fn returns_404_for_unstubbed_routes() {
    let registry = registry();
    let get_user = route(Method::Get, "http://somesite.org/users/0");
    registry.fake_route(&get_user, |_| json!({"name": "freddy"}));

    let bad_path = route(Method::Get, "http://somesite.org/abc");
    let result = request(&registry, &bad_path).await;
    check!(result.code() == Some(404));
    check!(result.status() == Status::BadRoute);

    let bad_headers = Route::new(Method::Get, "http://somesite.org/users/0")
        .expect("valid uri")
        .with_response(ResponseDescriptor::new("abc", 1, Format::Json));
    let result = request(&registry, &bad_headers).await;
    check!(result.code() == Some(404));
}

#[tokio::test]
async fn unregistered_bases_get_no_response() {
    let registry = registry();
    let result = request(&registry, &route(Method::Get, "http://elsewhere.org/users/0")).await;
    check!(result.status() == Status::NoResponse);
    check!(result.code() == None);
}

#[tokio::test]
async fn explicit_responses() {
    let registry = registry();
    let get_user = route(Method::Get, "http://somesite.org/users/0");

    registry.fake_route(&get_user, |_| FakeResponse::new(400));
    let result = request(&registry, &get_user).await;
    check!(result.code() == Some(400));
    check!(result.body() == None);

    registry.fake_route(&get_user, |_| FakeResponse::new(200).with_body(json!({"foo": "bar"})));
    let result = request(&registry, &get_user).await;
    check!(result.body() == Some(&json!({"foo": "bar"})));
}

#[tokio::test]
async fn method_is_part_of_the_route() {
    let registry = registry();
    registry
        .fake("http://somesite.org", |server| {
            server
                .allow(Method::Get, "/users/0", |_| json!({"name": "freddy"}))
                .allow(Method::Post, "/users/0", |request| {
                    json!({"updated": {"name": request.body().map(|body| body["name"].clone())}})
                });
        })
        .expect("valid base");

    let result = request(&registry, &route(Method::Get, "http://somesite.org/users/0")).await;
    check!(result.body() == Some(&json!({"name": "freddy"})));

    let post = route(Method::Post, "http://somesite.org/users/0")
        .with_payload(PayloadDescriptor::new("user", 1, Format::Json));
    let result = request_with_body(&registry, &post, Some(json!({"name": "annie"}))).await;
    check!(result.body() == Some(&json!({"updated": {"name": "annie"}})));
}

#[tokio::test]
async fn path_is_part_of_the_route() {
    let registry = registry();
    registry
        .fake("http://somesite.org", |server| {
            server
                .allow(Method::Get, "/users/0", |_| json!({"name": "freddy"}))
                .allow(Method::Get, "/users/1", |_| json!({"name": "annie"}));
        })
        .expect("valid base");

    let result = request(&registry, &route(Method::Get, "http://somesite.org/users/0")).await;
    check!(result.body() == Some(&json!({"name": "freddy"})));

    let result = request(&registry, &route(Method::Get, "http://somesite.org/users/1")).await;
    check!(result.body() == Some(&json!({"name": "annie"})));
}

#[tokio::test]
async fn accept_header_is_part_of_the_route() {
    let registry = registry();
    registry
        .fake("http://somesite.org", |server| {
            server
                .allow_accepting(
                    Method::Get,
                    "/users/0",
                    "application/vnd.indigobio-ascent.user-v1+json",
                    |_| json!({"name": "freddy"}),
                )
                .allow_accepting(
                    Method::Get,
                    "/users/0",
                    "application/vnd.indigobio-ascent.full_user-v1+json",
                    |_| json!({"first_name": "freddy", "last_name": "kruger", "address": "Elm Street"}),
                );
        })
        .expect("valid base");

    let result = request(&registry, &route(Method::Get, "http://somesite.org/users/0")).await;
    check!(result.body() == Some(&json!({"name": "freddy"})));

    let full_user = Route::new(Method::Get, "http://somesite.org/users/0")
        .expect("valid uri")
        .with_response(ResponseDescriptor::new("full_user", 1, Format::Json));
    let result = request(&registry, &full_user).await;
    check!(
        result.body()
            == Some(&json!({"first_name": "freddy", "last_name": "kruger", "address": "Elm Street"}))
    );
}

#[tokio::test]
async fn multiple_fake_servers() {
    let registry = registry();
    for (base, text) in [
        ("http://somesite.org", "hello from somesite"),
        ("http://indigo.com:80", "hello from indigo@80"),
        ("http://indigo.com:4000", "hello from indigo@4000"),
    ] {
        registry
            .fake(base, move |server| {
                server.allow(Method::Get, "/welcome", move |_| json!({"text": text}));
            })
            .expect("valid base");
    }

    let result = request(&registry, &route(Method::Get, "http://somesite.org/welcome")).await;
    check!(result.body() == Some(&json!({"text": "hello from somesite"})));

    let result = request(&registry, &route(Method::Get, "http://indigo.com:80/welcome")).await;
    check!(result.body() == Some(&json!({"text": "hello from indigo@80"})));

    let result = request(&registry, &route(Method::Get, "http://indigo.com:4000/welcome")).await;
    check!(result.body() == Some(&json!({"text": "hello from indigo@4000"})));
}

#[tokio::test]
async fn base_port_defaults_to_80() {
    let registry = registry();
    registry
        .fake("http://indigo.com", |server| {
            server.allow(Method::Get, "/welcome", |_| json!({"text": "old handler"}));
        })
        .expect("valid base");
    registry
        .fake("http://indigo.com:80", |server| {
            server.allow(Method::Get, "/welcome", |_| json!({"text": "new handler"}));
        })
        .expect("valid base");

    let result = request(&registry, &route(Method::Get, "http://indigo.com/welcome")).await;
    check!(result.body() == Some(&json!({"text": "new handler"})));

    let result = request(&registry, &route(Method::Get, "http://indigo.com:80/welcome")).await;
    check!(result.body() == Some(&json!({"text": "new handler"})));
}

#[tokio::test]
async fn routes_can_be_augmented() {
    let registry = registry();
    let get_user = route(Method::Get, "http://somesite.org/users/0");

    let user_route = get_user.clone();
    registry
        .fake("http://somesite.org", move |server| {
            server
                .allow(Method::Get, "/old", |_| json!({"text": "old"}))
                .allow(Method::Get, "/hello", |_| json!({"text": "hello"}))
                .allow_route(&user_route, |_| json!({"user": "old user"}));
        })
        .expect("valid base");

    let result = request(&registry, &route(Method::Get, "http://somesite.org/hello")).await;
    check!(result.body() == Some(&json!({"text": "hello"})));

    let user_route = get_user.clone();
    registry
        .fake("http://somesite.org", move |server| {
            server
                .allow(Method::Get, "/hello", |_| json!({"text": "aloha"}))
                .allow(Method::Get, "/goodbye", |_| json!({"text": "goodbye"}))
                .allow_route(&user_route, |_| json!({"user": "new user"}));
        })
        .expect("valid base");

    let result = request(&registry, &route(Method::Get, "http://somesite.org/old")).await;
    check!(result.body() == Some(&json!({"text": "old"})));

    let result = request(&registry, &route(Method::Get, "http://somesite.org/hello")).await;
    check!(result.body() == Some(&json!({"text": "aloha"})));

    let result = request(&registry, &route(Method::Get, "http://somesite.org/goodbye")).await;
    check!(result.body() == Some(&json!({"text": "goodbye"})));

    let result = request(&registry, &get_user).await;
    check!(result.body() == Some(&json!({"user": "new user"})));
}

#[tokio::test]
async fn forgets_routes_after_reset() {
    let registry = registry();
    let shared = registry.clone();
    registry
        .fake("https://www.google.com", |server| {
            server.allow(Method::Get, "/webhp", |_| json!("fake google"));
        })
        .expect("valid base");

    let webhp = Route::new(Method::Get, "https://www.google.com/webhp").expect("valid uri");
    let result = request(&shared, &webhp).await;
    check!(result.body() == Some(&json!("fake google")));

    registry.reset();
    let result = request(&shared, &webhp).await;
    check!(result.status() == Status::NoResponse);
}

#[tokio::test(start_paused = true)]
async fn slow_responses_time_out() {
    let registry = registry();
    let get_user = route(Method::Get, "http://somesite.org/users/0");
    registry.fake_route(&get_user, |_| {
        FakeResponse::from(json!({"a": "b"})).delayed(Duration::from_secs(2))
    });

    let request = Request::builder(get_user.clone())
        .negotiate(VENDOR)
        .timeout(Duration::from_secs(1))
        .build();
    let result = registry.perform(request).await.expect("result");
    check!(result.status() == Status::TimedOut);

    let request = Request::builder(get_user).negotiate(VENDOR).build();
    let result = registry.perform(request).await.expect("result");
    check!(result.status() == Status::Success);
}

#[tokio::test]
async fn invalid_bases_are_rejected() {
    let err = registry().fake("somesite", |_| {}).expect_err("relative base");
    let_assert!(hyperion_core::Error::BadArgument { expected, .. } = err);
    check!(expected == "a base URI");
}
