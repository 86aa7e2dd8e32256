//! The client against a mock server.

use std::time::Duration;

use horizon_tabular_net::http::{DEFAULT_BODY_LIMIT, DEFAULT_REQUEST_TIMEOUT};
use horizon_tabular_net::{HttpClient, HttpClientBuilder, HttpClientConfig, NetworkError};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn serve(status: u16, body: Vec<u8>) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(status).set_body_bytes(body))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_default_limits() {
    let client = HttpClient::builder().build().unwrap();
    assert_eq!(client.config().request_timeout, DEFAULT_REQUEST_TIMEOUT);
    assert_eq!(client.config().body_limit, Some(DEFAULT_BODY_LIMIT));
}

#[tokio::test]
async fn test_from_config() {
    let config = HttpClientConfig {
        user_agent: "LedgerConsole/2.1".to_string(),
        redirect_limit: 2,
        ..HttpClientConfig::default()
    };
    let client = HttpClientBuilder::from_config(config.clone()).build().unwrap();
    assert_eq!(client.config(), &config);
}

#[tokio::test]
async fn test_fetch_sends_accept_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/logo.png"))
        .and(header("accept", "image/*"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/png")
                .set_body_bytes(vec![137u8, 80, 78, 71]),
        )
        .mount(&server)
        .await;

    let client = HttpClient::builder().build().unwrap();
    let body = client
        .fetch(format!("{}/logo.png", server.uri()), "image/*")
        .await
        .unwrap();
    assert_eq!(body.as_ref(), &[137, 80, 78, 71]);
}

#[tokio::test]
async fn test_response_accessors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/jpeg")
                .set_body_bytes(vec![0xFFu8, 0xD8]),
        )
        .mount(&server)
        .await;

    let client = HttpClient::builder().build().unwrap();
    let response = client.get(server.uri()).send().await.unwrap();
    assert_eq!(response.status(), 200);
    assert!(response.is_success());
    assert_eq!(response.content_type(), Some("image/jpeg"));
    assert_eq!(response.bytes().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_fetch_reports_status() {
    let server = serve(404, Vec::new()).await;
    let client = HttpClient::builder().build().unwrap();
    let err = client.fetch(server.uri(), "*/*").await.unwrap_err();
    assert_eq!(err, NetworkError::Status(404));
    assert_eq!(err.to_string(), "HTTP 404");
}

#[tokio::test]
async fn test_per_request_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let client = HttpClient::builder().build().unwrap();
    let err = client
        .get(server.uri())
        .timeout(Duration::from_millis(100))
        .send()
        .await
        .unwrap_err();
    assert_eq!(err, NetworkError::Timeout);
}

#[tokio::test]
async fn test_body_limit() {
    let server = serve(200, vec![0u8; 4096]).await;
    let client = HttpClient::builder().body_limit(Some(1024)).build().unwrap();
    let err = client.fetch(server.uri(), "*/*").await.unwrap_err();
    assert_eq!(err, NetworkError::BodyTooLarge { limit: 1024 });

    let client = HttpClient::builder().body_limit(None).build().unwrap();
    assert_eq!(client.fetch(server.uri(), "*/*").await.unwrap().len(), 4096);
}

#[tokio::test]
async fn test_invalid_url() {
    let client = HttpClient::builder().build().unwrap();
    let err = client.get("logo.png").send().await.unwrap_err();
    assert!(matches!(err, NetworkError::InvalidUrl(_)));
}

#[tokio::test]
async fn test_invalid_header_is_reported_on_send() {
    let client = HttpClient::builder().build().unwrap();
    let err = client
        .get("http://localhost/")
        .header("bad header", "x")
        .header("accept", "image/*")
        .send()
        .await
        .unwrap_err();
    assert!(matches!(err, NetworkError::InvalidHeader(_)));
}

#[tokio::test]
async fn test_unreachable_host_is_transient() {
    let client = HttpClient::builder()
        .connect_timeout(Duration::from_secs(2))
        .build()
        .unwrap();
    // Nothing listens on the discard port.
    let err = client.get("http://127.0.0.1:9/").send().await.unwrap_err();
    assert!(err.is_transient(), "unexpected error: {err}");
}
