//! Pipeline behavior through deterministic transports.

use std::collections::{HashMap, HashSet};

use assert2::{check, let_assert};
use courier_core::{
    DecodeErrorKind, Decoder, Error, HttpRequestClient, HttpResponse, JsonDecoder, Method,
    NoContent, Request, StubTransport, Transport, TransportError,
};
use futures_util::future::join_all;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct Widget {
    id: i64,
    name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct ApiError {
    message: String,
}

fn request() -> Request {
    let url = url::Url::parse("https://api.example.com/widgets/1").expect("url");
    Request::builder(Method::Get, url).build()
}

fn client(status: u16, body: &'static str) -> HttpRequestClient<StubTransport> {
    HttpRequestClient::new(StubTransport::new(status, body))
}

/// Answers with the correlation id it received, as the body text.
struct IdEcho;

impl Transport for IdEcho {
    async fn perform(&self, request: Request) -> Result<HttpResponse, TransportError> {
        tokio::task::yield_now().await;
        let id = request
            .request_id()
            .ok_or_else(|| TransportError::invalid_request("no correlation id"))?;
        Ok(HttpResponse::new(200, HashMap::new(), id.to_string()))
    }
}

#[tokio::test]
async fn test_success_decodes_widget() {
    let widget: Widget = client(200, r#"{"id":1,"name":"a"}"#)
        .send_value(request())
        .await
        .expect("widget");

    check!(
        widget
            == Widget {
                id: 1,
                name: "a".to_string()
            }
    );
}

#[tokio::test]
async fn test_success_keeps_metadata() {
    let transport = StubTransport::from_response(HttpResponse::new(
        201,
        HashMap::from([("ETag".to_string(), "\"v1\"".to_string())]),
        r#"{"id":2,"name":"b"}"#,
    ));
    let response = HttpRequestClient::new(transport)
        .send::<Widget>(request())
        .await
        .expect("response");

    check!(response.head().status() == 201);
    check!(response.head().header("etag") == Some("\"v1\""));
    check!(response.value().id == 2);
}

#[tokio::test]
async fn test_not_found_is_bad_response() {
    let result = client(404, r#"{"message":"not found"}"#)
        .send::<Widget>(request())
        .await;

    let_assert!(Err(Error::BadResponse { status, body, .. }) = result);
    check!(status == 404);
    check!(body == r#"{"message":"not found"}"#);
}

#[tokio::test]
async fn test_bad_status_is_not_decoded_even_for_union() {
    let client = client(500, r#"{"message":"boom"}"#);

    let err = client
        .send_union::<Widget, ApiError>(request())
        .await
        .expect_err("500");

    check!(err.status() == Some(500));
    check!(err.body() == Some(r#"{"message":"boom"}"#));
    let api_error = err
        .decode_body::<ApiError>()
        .expect("bad response body")
        .expect("api error");
    check!(api_error.message == "boom");
}

#[tokio::test]
async fn test_bad_status_below_success_range() {
    let err = client(199, "early")
        .send::<NoContent>(request())
        .await
        .expect_err("199");
    check!(err.status() == Some(199));
}

#[tokio::test]
async fn test_invalid_utf8_error_body_is_empty() {
    let transport = StubTransport::new(502, vec![0xc3, 0x28]);
    let err = HttpRequestClient::new(transport)
        .send::<Widget>(request())
        .await
        .expect_err("502");

    check!(err.body() == Some(""));
}

#[tokio::test]
async fn test_union_success_side() {
    let response = client(200, r#"{"id":1,"name":"a"}"#)
        .send_union::<Widget, ApiError>(request())
        .await
        .expect("union");

    check!(response.is_success());
    check!(response.error().is_none());
    check!(response.value().map(|w| w.id) == Some(1));
}

#[tokio::test]
async fn test_union_error_side() {
    let response = client(200, r#"{"message":"quota exceeded"}"#)
        .send_union::<Widget, ApiError>(request())
        .await
        .expect("union");

    check!(response.value().is_none());
    check!(
        response.error()
            == Some(&ApiError {
                message: "quota exceeded".to_string()
            })
    );
}

#[tokio::test]
async fn test_union_matching_neither_shape_is_decoding_error() {
    let result = client(200, r#"{"unexpected":true}"#)
        .send_union::<Widget, ApiError>(request())
        .await;

    let_assert!(Err(Error::Decoding { source, .. }) = result);
    check!(
        source.kind()
            == &DecodeErrorKind::KeyNotFound {
                key: "id".to_string()
            }
    );
}

#[tokio::test]
async fn test_type_mismatch_reports_path() {
    let result = client(200, r#"{"id":"one","name":"a"}"#)
        .send::<Widget>(request())
        .await;

    let_assert!(Err(Error::Decoding { source, .. }) = result);
    check!(source.coding_path() == "id");
    check!(
        source.debug_description::<Widget>() == "Type mismatch: i64 required for key [id]."
    );
}

#[tokio::test]
async fn test_no_content_with_empty_body() {
    for status in [200, 204] {
        let response = client(status, "")
            .send::<NoContent>(request())
            .await
            .expect("no content");
        check!(response.value() == &NoContent);
    }
}

#[tokio::test]
async fn test_empty_body_for_typed_value_is_corrupted() {
    let result = client(200, "").send::<Widget>(request()).await;

    let_assert!(Err(Error::Decoding { source, .. }) = result);
    check!(source.kind() == &DecodeErrorKind::DataCorrupted);
}

#[tokio::test]
async fn test_decoding_is_idempotent() {
    let bytes = br#"{"id":3,"name":"c"}"#;
    let first = JsonDecoder.decode::<Widget>(bytes).expect("first");
    let second = JsonDecoder.decode::<Widget>(bytes).expect("second");
    check!(first == second);

    let client = client(200, r#"{"id":3}"#);
    let first = client.send::<Widget>(request()).await.expect_err("first");
    let second = client.send::<Widget>(request()).await.expect_err("second");
    let_assert!(Error::Decoding { source: first, .. } = first);
    let_assert!(Error::Decoding { source: second, .. } = second);
    check!(first == second);
}

#[tokio::test]
async fn test_concurrent_dispatches_get_distinct_ids() {
    const CALLS: usize = 64;

    let client = HttpRequestClient::new(IdEcho);
    let exchanges = join_all((0..CALLS).map(|_| client.send_raw(request()))).await;

    let mut ids = HashSet::new();
    for exchange in exchanges {
        let exchange = exchange.expect("exchange");
        check!(exchange.body().as_ref() == exchange.request_id().to_string().as_bytes());
        ids.insert(exchange.request_id());
    }
    check!(ids.len() == CALLS);
}

#[tokio::test]
async fn test_concurrent_failures_keep_their_ids() {
    let stub = StubTransport::preview().with_error(|| TransportError::connection("refused"));
    let client = HttpRequestClient::new(stub);

    let errors = join_all((0..8).map(|_| client.send::<NoContent>(request()))).await;

    let ids: HashSet<_> = errors
        .into_iter()
        .map(|result| {
            let err = result.expect_err("refused");
            assert!(err.is_connection());
            err.request_id()
        })
        .collect();
    check!(ids.len() == 8);
}

#[tokio::test]
async fn test_shared_client_across_tasks() {
    let client = std::sync::Arc::new(client(200, r#"{"id":4,"name":"d"}"#));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let client = client.clone();
            tokio::spawn(async move { client.send_value::<Widget>(request()).await })
        })
        .collect();

    for handle in handles {
        let widget = handle.await.expect("join").expect("widget");
        check!(widget.id == 4);
    }
}
