//! Integration tests for the `HyperClient` transport using wiremock.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use clasp::middleware::Layer;
use clasp::tower::Service;
use clasp::{
    Client, Error, HttpClient, HyperClient, Method, Params, Payload, Request, Response, Result,
    TransportConfig, Uri,
};
use serde::{Deserialize, Serialize};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_string, header, method, path},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct User {
    id: u64,
    name: String,
}

fn uri(server: &MockServer, route: &str) -> Uri {
    format!("{}{route}", server.uri()).parse().expect("uri")
}

#[tokio::test]
async fn test_get_request() {
    let mock_server = MockServer::start().await;

    let user = User {
        id: 1,
        name: "Alice".to_string(),
    };

    Mock::given(method("GET"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&user))
        .mount(&mock_server)
        .await;

    let client = HyperClient::new();
    let request = Request::builder(Method::Get, uri(&mock_server, "/users/1"))
        .header("Accept", "application/json")
        .expect("header")
        .build();

    let response = client.execute(request).await.expect("response");

    assert!(response.is_success());
    assert_eq!(response.status(), 200);
    assert!(response.content_length().is_some_and(|len| len > 0));

    let body: User = response.json().expect("json");
    assert_eq!(body, user);
}

#[tokio::test]
async fn test_post_request_with_text_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/echo"))
        .and(header("content-length", "5"))
        .and(body_string("hello"))
        .respond_with(ResponseTemplate::new(201).set_body_string("world"))
        .mount(&mock_server)
        .await;

    let client = HyperClient::new();
    let request = Request::builder(Method::Post, uri(&mock_server, "/echo"))
        .payload(Payload::from_text("hello"))
        .build();

    let response = client.execute(request).await.expect("response");

    assert_eq!(response.status(), 201);
    assert_eq!(response.text().expect("text"), "world");
    assert_eq!(response.content_length(), Some(5));
}

#[tokio::test]
async fn test_http_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/not-found"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&mock_server)
        .await;

    let client = HyperClient::new();
    let request = Request::builder(Method::Get, uri(&mock_server, "/not-found")).build();

    let response = client.execute(request).await.expect("response");

    assert!(response.is_client_error());
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_multi_value_headers_are_kept() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).append_header("x-multi", "b"))
        .mount(&mock_server)
        .await;

    let client = HyperClient::new();
    let request = Request::builder(Method::Get, uri(&mock_server, "/multi"))
        .header("x-multi", "a")
        .expect("header")
        .header("x-multi", "b")
        .expect("header")
        .build();

    client.execute(request).await.expect("response");

    let requests = mock_server.received_requests().await.expect("recording");
    let received = requests.first().expect("one request");
    assert_eq!(received.headers.get_all("x-multi").iter().count(), 2);
}

#[tokio::test]
async fn test_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let client = HyperClient::builder()
        .timeout(Duration::from_millis(100))
        .build();

    let request = Request::builder(Method::Get, uri(&mock_server, "/slow")).build();

    let err = client.execute(request).await.expect_err("expected timeout error");
    assert!(err.is_timeout(), "Expected timeout error, got: {err}");
}

#[tokio::test]
async fn test_connection_error() {
    let client = HyperClient::new();

    let request = Request::builder(Method::Get, Uri::from_static("http://127.0.0.1:1/")).build();

    let err = client.execute(request).await.expect_err("expected connection error");
    assert!(err.is_connection(), "Expected connection error, got: {err}");
}

#[tokio::test]
async fn test_no_content_has_zero_length() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let client = HyperClient::new();
    let request = Request::builder(Method::Delete, uri(&mock_server, "/users/1")).build();

    let response = client.execute(request).await.expect("response");

    assert_eq!(response.status(), 204);
    assert_eq!(response.content_length(), Some(0));
}

#[tokio::test]
async fn test_logging_middleware() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/logged"))
        .respond_with(ResponseTemplate::new(200).set_body_string("logged"))
        .mount(&mock_server)
        .await;

    let client = HyperClient::builder()
        .with_logging()
        .with_debug_logging()
        .build();

    let request = Request::builder(Method::Get, uri(&mock_server, "/logged")).build();
    let response = client.execute(request).await.expect("response");

    assert!(response.is_success());
}

#[tokio::test]
async fn test_builder_with_full_config() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&mock_server)
        .await;

    let config = TransportConfig::default()
        .with_timeout(Duration::from_secs(2))
        .with_pool_idle_per_host(1);
    let client = HyperClient::builder().config(config.clone()).with_logging().build();
    assert_eq!(client.config(), &config);

    let request = Request::builder(Method::Get, uri(&mock_server, "/")).build();
    let response = client.execute(request).await.expect("response");
    assert!(response.is_success());
    assert_eq!(response.content_length(), Some(2));
}

/// Stamps every request with a fixed header.
#[derive(Clone)]
struct StampLayer;

impl<S> Layer<S> for StampLayer {
    type Service = Stamp<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Stamp { inner }
    }
}

#[derive(Clone)]
struct Stamp<S> {
    inner: S,
}

impl<S> Service<Request> for Stamp<S>
where
    S: Service<Request, Response = Response, Error = Error>,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Response>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<()>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request) -> Self::Future {
        request
            .headers_mut()
            .insert("x-stamp", "stamped".parse().expect("header"));
        Box::pin(self.inner.call(request))
    }
}

#[tokio::test]
async fn test_generic_layer_api() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header("x-stamp", "stamped"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let transport = HyperClient::builder().with_logging().layer(StampLayer).build();

    let mut client = Client::new(mock_server.uri()).expect("client");
    client.set_transport(transport);

    let response = client.get(Params::new("/layered")).await.expect("response");
    assert!(response.is_success());
}
