//! Injected transports and middleware.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use kraken::{
    HttpClient, HyperClient, KrakenClient, Request, Response, Result, TopClipsParams,
    middleware::LoggingLayer, tower::util::MapRequestLayer,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

const CLIP: &str = include_str!("fixtures/clip.json");

/// Answers every request with a canned response and keeps what it was sent.
struct Canned {
    status: u16,
    body: &'static str,
    sent: Mutex<Vec<Request>>,
}

impl Canned {
    fn new(status: u16, body: &'static str) -> Self {
        Self {
            status,
            body,
            sent: Mutex::new(Vec::new()),
        }
    }
}

impl HttpClient for Canned {
    async fn execute(&self, request: Request) -> Result<Response> {
        self.sent.lock().expect("lock").push(request);
        Ok(Response::new(
            self.status,
            HashMap::new(),
            Bytes::from_static(self.body.as_bytes()),
        ))
    }
}

#[tokio::test]
async fn requests_go_through_the_injected_transport() {
    let transport = Arc::new(Canned::new(200, CLIP));
    let mut client = KrakenClient::new("cid", Arc::clone(&transport)).expect("client");
    client.set_access_token("token");

    let response = client
        .get_clip("AwkwardHelplessSalamanderSwiftRage")
        .await
        .expect("response");
    assert_eq!(
        response.data.map(|clip| clip.slug).as_deref(),
        Some("AwkwardHelplessSalamanderSwiftRage")
    );

    let sent = transport.sent.lock().expect("lock");
    assert_eq!(sent.len(), 1);
    let request = &sent[0];
    assert_eq!(request.method(), &http::Method::GET);
    assert_eq!(
        request.url().as_str(),
        "https://api.twitch.tv/kraken/clips/AwkwardHelplessSalamanderSwiftRage"
    );
    assert_eq!(request.header("accept"), Some(kraken::ACCEPT_HEADER));
    assert_eq!(request.header("client-id"), Some("cid"));
    assert_eq!(request.header("authorization"), Some("OAuth token"));
}

#[tokio::test]
async fn redirect_status_is_decoded_as_data() {
    let transport = Canned::new(302, CLIP);
    let client = KrakenClient::new("cid", &transport).expect("client");

    let response = client.get_clip("x").await.expect("response");
    assert_eq!(response.status_code, 302);
    assert!(!response.is_error());
    assert!(response.data.is_some());
}

#[tokio::test]
async fn unparsed_server_error_body() {
    let transport = Canned::new(500, "Internal Server Error");
    let client = KrakenClient::new("cid", &transport).expect("client");

    let response = client
        .get_top_clips(&TopClipsParams::default())
        .await
        .expect("response");
    assert_eq!(response.status_code, 500);
    assert!(response.data.is_none());
    assert!(response.error.is_none());
}

#[tokio::test]
async fn logging_layer_keeps_the_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/clips/AwkwardHelplessSalamanderSwiftRage"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(CLIP, "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let http = HyperClient::builder()
        .with_logging()
        .layer(LoggingLayer::debug())
        .build();
    let client = KrakenClient::builder("cid")
        .base_url(server.uri())
        .build(http)
        .expect("client");

    let response = client
        .get_clip("AwkwardHelplessSalamanderSwiftRage")
        .await
        .expect("response");
    assert_eq!(response.status_code, 200);
}

#[tokio::test]
async fn custom_layer_sees_the_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header("X-Request-Source", "clip-bot"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(CLIP, "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let http = HyperClient::builder()
        .layer(MapRequestLayer::new(|mut request: Request| {
            request
                .headers_mut()
                .insert("X-Request-Source".to_string(), "clip-bot".to_string());
            request
        }))
        .build();
    let client = KrakenClient::builder("cid")
        .base_url(server.uri())
        .build(http)
        .expect("client");

    client
        .get_clip("AwkwardHelplessSalamanderSwiftRage")
        .await
        .expect("response");
}

#[tokio::test]
async fn failed_handshake_is_a_tls_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(CLIP, "application/json"))
        .mount(&server)
        .await;

    // the mock server only speaks plain HTTP
    let https_uri = server.uri().replacen("http://", "https://", 1);
    let client = KrakenClient::builder("cid")
        .base_url(https_uri)
        .build_default()
        .expect("client");

    let err = client
        .get_clip("AwkwardHelplessSalamanderSwiftRage")
        .await
        .expect_err("handshake failure");
    assert!(matches!(err, kraken::Error::Tls(_)), "{err}");
    assert!(err.is_transport());
}
