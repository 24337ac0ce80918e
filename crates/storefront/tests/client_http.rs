//! HTTP-level tests for `BookstoreClient`.
//!
//! Each test binds a loopback port, serves exactly one request with a canned
//! response, and hands back what the client actually sent.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use bookstore_core::{BookId, ImageId, SliderId};
use bookstore_storefront::api::{ApiError, BookstoreClient, CatalogApi, SliderApi};
use bookstore_storefront::config::ApiConfig;
use secrecy::SecretString;
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// A request as seen by the server.
#[derive(Debug)]
struct Received {
    method: String,
    path: String,
    authorization: Option<String>,
    body: String,
}

impl Received {
    fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

async fn serve_once(status: u16, body: &'static str) -> (BookstoreClient, JoinHandle<Received>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let received = read_request(&mut stream).await;

        let length = if status == 204 {
            String::new()
        } else {
            format!("Content-Length: {}\r\n", body.len())
        };
        let response = format!(
            "HTTP/1.1 {status} Stub\r\nContent-Type: application/json\r\n{length}Connection: close\r\n\r\n{body}"
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.unwrap();
        received
    });

    let mut config = ApiConfig::new(&format!("http://{addr}/api")).unwrap();
    config.token = Some(SecretString::from("test-token"));
    (BookstoreClient::new(&config).unwrap(), handle)
}

async fn read_request(stream: &mut TcpStream) -> Received {
    let mut buf = Vec::new();
    let mut chunk = [0_u8; 1024];

    let head_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        let n = stream.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed before headers");
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8(buf[..head_end].to_vec()).unwrap();
    let mut lines = head.lines();
    let mut request_line = lines.next().unwrap().split_whitespace();
    let method = request_line.next().unwrap().to_string();
    let path = request_line.next().unwrap().to_string();

    let mut content_length = 0;
    let mut authorization = None;
    for (name, value) in lines.filter_map(|line| line.split_once(':')) {
        if name.eq_ignore_ascii_case("content-length") {
            content_length = value.trim().parse().unwrap();
        } else if name.eq_ignore_ascii_case("authorization") {
            authorization = Some(value.trim().to_string());
        }
    }

    while buf.len() < head_end + content_length {
        let n = stream.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed before body");
        buf.extend_from_slice(&chunk[..n]);
    }
    let body = String::from_utf8(buf[head_end..head_end + content_length].to_vec()).unwrap();

    Received {
        method,
        path,
        authorization,
        body,
    }
}

// =============================================================================
// Slider Wire Format
// =============================================================================

#[tokio::test]
async fn test_add_image_posts_image_id() {
    let (client, server) = serve_once(200, r#"{"message": "Image added."}"#).await;

    client
        .add_slider_image(SliderId::new(1), ImageId::new(4))
        .await
        .unwrap();

    let received = server.await.unwrap();
    assert_eq!(received.method, "POST");
    assert_eq!(received.path, "/api/sliders/1/add_image/");
    assert_eq!(received.json(), json!({ "image_id": 4 }));
    assert_eq!(received.authorization.as_deref(), Some("Bearer test-token"));
}

#[tokio::test]
async fn test_remove_image_posts_to_slider() {
    let (client, server) = serve_once(200, "{}").await;

    client
        .remove_slider_image(SliderId::new(1), ImageId::new(4))
        .await
        .unwrap();

    let received = server.await.unwrap();
    assert_eq!(received.method, "POST");
    assert_eq!(received.path, "/api/sliders/1/");
    assert_eq!(received.json(), json!({ "image_id": 4 }));
}

#[tokio::test]
async fn test_position_is_patched() {
    let (client, server) = serve_once(200, "{}").await;

    client
        .update_image_position(SliderId::new(1), ImageId::new(2), -1)
        .await
        .unwrap();

    let received = server.await.unwrap();
    assert_eq!(received.method, "PATCH");
    assert_eq!(received.path, "/api/sliders/1/update_order/");
    assert_eq!(received.json(), json!({ "image_id": 2, "new_order": -1 }));
}

#[tokio::test]
async fn test_set_default_has_no_body() {
    let (client, server) = serve_once(200, "{}").await;

    client.set_default_slider(SliderId::new(2)).await.unwrap();

    let received = server.await.unwrap();
    assert_eq!(received.method, "POST");
    assert_eq!(received.path, "/api/sliders/2/set_default/");
    assert!(received.body.is_empty());
}

#[tokio::test]
async fn test_delete_accepts_no_content() {
    let (client, server) = serve_once(204, "").await;

    client.delete_slider(SliderId::new(3)).await.unwrap();

    let received = server.await.unwrap();
    assert_eq!(received.method, "DELETE");
    assert_eq!(received.path, "/api/sliders/3/");
}

#[tokio::test]
async fn test_get_slider_parses_images() {
    let (client, server) = serve_once(
        200,
        r#"{"id": 1, "title": "Homepage", "is_default": true,
            "images": [{"id": 4, "title": "Cover", "image": "/media/4.jpg", "slider_order": 2}]}"#,
    )
    .await;

    let slider = client.get_slider(SliderId::new(1)).await.unwrap();

    assert!(slider.is_default);
    assert!(slider.is_member(ImageId::new(4)));
    assert_eq!(slider.images[0].position, Some(2));
    assert_eq!(server.await.unwrap().method, "GET");
}

// =============================================================================
// Catalog
// =============================================================================

#[tokio::test]
async fn test_books_by_ids_filters_response() {
    let (client, server) = serve_once(
        200,
        r#"[{"id": 1, "title": "A", "price": "10.00"},
            {"id": 2, "title": "B", "price": "5.50"},
            {"id": 3, "title": "C"}]"#,
    )
    .await;

    let books = client
        .books_by_ids(&[BookId::new(1), BookId::new(3)])
        .await
        .unwrap();

    let ids: Vec<_> = books.iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![BookId::new(1), BookId::new(3)]);
    assert_eq!(books[1].price, None);

    let received = server.await.unwrap();
    assert_eq!(received.path, "/api/books/?ids=1%2C3");
}

#[tokio::test]
async fn test_book_moderation_posts_without_body() {
    let (client, server) = serve_once(200, "{}").await;

    client.reject_book(BookId::new(12)).await.unwrap();

    let received = server.await.unwrap();
    assert_eq!(received.method, "POST");
    assert_eq!(received.path, "/api/books/12/reject/");
    assert!(received.body.is_empty());
}

// =============================================================================
// Error Mapping
// =============================================================================

#[tokio::test]
async fn test_wrong_shape_is_malformed() {
    let (client, _server) = serve_once(200, r#"{"id": "x"}"#).await;

    let err = client.get_slider(SliderId::new(1)).await.unwrap_err();

    match err {
        ApiError::Malformed { endpoint, .. } => assert_eq!(endpoint, "sliders/1/"),
        other => panic!("expected Malformed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_forbidden_is_unauthorized() {
    let (client, _server) = serve_once(
        403,
        r#"{"detail": "You do not have permission to perform this action."}"#,
    )
    .await;

    let err = client
        .add_slider_image(SliderId::new(1), ImageId::new(4))
        .await
        .unwrap_err();

    match err {
        ApiError::Unauthorized(message) => {
            assert_eq!(message, "You do not have permission to perform this action.");
        }
        other => panic!("expected Unauthorized, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unauthenticated_is_unauthorized() {
    let (client, _server) = serve_once(401, "").await;

    let err = client.list_sliders().await.unwrap_err();

    match err {
        ApiError::Unauthorized(message) => assert_eq!(message, "sliders/"),
        other => panic!("expected Unauthorized, got {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_slider_is_not_found() {
    let (client, _server) = serve_once(404, r#"{"error": "Slider not found."}"#).await;

    let err = client.get_slider(SliderId::new(9)).await.unwrap_err();

    match err {
        ApiError::NotFound(message) => assert_eq!(message, "Slider not found."),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_validation_error_keeps_status_and_field() {
    let (client, _server) = serve_once(400, r#"{"image_id": ["This field is required."]}"#).await;

    let err = client
        .update_image_position(SliderId::new(1), ImageId::new(2), 0)
        .await
        .unwrap_err();

    match err {
        ApiError::Status { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "image_id: This field is required.");
        }
        other => panic!("expected Status, got {other:?}"),
    }
}
