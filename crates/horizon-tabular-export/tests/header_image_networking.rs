//! Header images fetched over HTTP.

#![cfg(feature = "networking")]

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use horizon_tabular_export::{
    HeaderImageOutcome, ImageLoadError, UrlImageSource, load_header_image,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn logo_png() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(6, 3, image::Rgb([0, 90, 160]));
    let mut cursor = Cursor::new(Vec::new());
    img.write_to(&mut cursor, image::ImageFormat::Png).unwrap();
    cursor.into_inner()
}

async fn load(url: String, timeout: Duration) -> HeaderImageOutcome {
    tokio::task::spawn_blocking(move || {
        load_header_image(Arc::new(UrlImageSource::new(url)), timeout)
    })
    .await
    .unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fetches_and_decodes_logo() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/logo.png"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/png")
                .set_body_bytes(logo_png()),
        )
        .mount(&server)
        .await;

    let outcome = load(format!("{}/logo.png", server.uri()), Duration::from_secs(5)).await;
    let image = outcome.image().expect("logo should load");
    assert_eq!((image.width, image.height), (6, 3));
    assert_eq!(&image.rgb[..3], &[0, 90, 160]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_http_error_is_skipped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let outcome = load(format!("{}/missing.png", server.uri()), Duration::from_secs(5)).await;
    assert_eq!(
        outcome,
        HeaderImageOutcome::Skipped(ImageLoadError::Fetch("HTTP 404".to_string()))
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(logo_png())
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let timeout = Duration::from_millis(100);
    let outcome = load(format!("{}/slow.png", server.uri()), timeout).await;
    assert_eq!(
        outcome,
        HeaderImageOutcome::Skipped(ImageLoadError::TimedOut(timeout))
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_non_image_body_is_skipped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not a logo</html>"))
        .mount(&server)
        .await;

    let outcome = load(format!("{}/page", server.uri()), Duration::from_secs(5)).await;
    assert!(matches!(
        outcome,
        HeaderImageOutcome::Skipped(ImageLoadError::Decode(_))
    ));
}
