//! Client facade over the pipeline.
//!
//! [`HttpRequestClient`] bundles a [`Transport`] and a [`Decoder`] and exposes
//! the caller operations. Each call is independent: one dispatch, one
//! classification, at most two decodes.

use serde::de::DeserializeOwned;
use url::Url;

use crate::pipeline::{decode_success, decode_union, dispatch};
use crate::response::{Exchange, Response, SuccessResponse};
use crate::{
    BuildRequest, Endpoint, Error, JsonDecoder, Middleware, Request, RequestId, RequestOptions,
    ResponseBody, Result, Transport,
};

/// Dispatches requests and decodes their responses.
///
/// Both collaborators are plain constructor arguments.
///
/// # Example
///
/// ```
/// use courier_core::{HttpRequestClient, Method, NoContent, Request, StubTransport};
///
/// # tokio_test_block(async {
/// let client = HttpRequestClient::new(StubTransport::preview());
/// let request = Request::builder(Method::Get, "https://h.example/ping".parse().unwrap()).build();
///
/// let response = client.send::<NoContent>(request).await.unwrap();
/// assert_eq!(response.head().status(), 200);
/// # });
/// # fn tokio_test_block(f: impl std::future::Future<Output = ()>) {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct HttpRequestClient<T, D = JsonDecoder> {
    transport: T,
    decoder: D,
}

impl<T: Transport> HttpRequestClient<T> {
    /// Client decoding JSON bodies.
    #[must_use]
    pub const fn new(transport: T) -> Self {
        Self {
            transport,
            decoder: JsonDecoder,
        }
    }
}

impl<T, D> HttpRequestClient<T, D>
where
    T: Transport,
    D: crate::Decoder,
{
    /// Client with a custom decoder.
    #[must_use]
    pub const fn with_decoder(transport: T, decoder: D) -> Self {
        Self { transport, decoder }
    }

    /// The underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// The body decoder.
    #[must_use]
    pub const fn decoder(&self) -> &D {
        &self.decoder
    }

    /// Dispatch without decoding: raw body, status and headers.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidResponse`] or [`Error::Other`] when the
    /// transport gives up. Statuses are not classified.
    pub async fn send_raw(&self, request: Request) -> Result<Exchange> {
        dispatch(&self.transport, request).await
    }

    /// Dispatch and decode the body as `V`, keeping response metadata.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::BadResponse`] on a non-2xx status, with
    /// [`Error::Decoding`] when the body does not match `V`.
    pub async fn send<V: ResponseBody>(&self, request: Request) -> Result<SuccessResponse<V>> {
        let exchange = self.send_raw(request).await?;
        decode_success(&self.decoder, exchange)
    }

    /// Like [`send`](Self::send), returning only the value.
    ///
    /// # Errors
    ///
    /// Same as [`send`](Self::send).
    pub async fn send_value<V: ResponseBody>(&self, request: Request) -> Result<V> {
        self.send(request).await.map(SuccessResponse::into_value)
    }

    /// Dispatch and decode as `V`, falling back to the server-error shape `E`.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::BadResponse`] on a non-2xx status, with
    /// [`Error::Decoding`] when neither shape matches.
    pub async fn send_union<V, E>(&self, request: Request) -> Result<Response<V, E>>
    where
        V: ResponseBody,
        E: DeserializeOwned,
    {
        let exchange = self.send_raw(request).await?;
        decode_union(&self.decoder, exchange)
    }

    /// [`send_raw`](Self::send_raw) for a logical request.
    ///
    /// The middleware chain runs before the request is built.
    ///
    /// # Errors
    ///
    /// A build failure is reported as [`Error::Other`] under a fresh id.
    pub async fn send_raw_endpoint(
        &self,
        endpoint: Endpoint,
        base_url: &Url,
        options: &RequestOptions,
        middleware: &Middleware<Endpoint>,
    ) -> Result<Exchange> {
        let request = build(&middleware.apply(endpoint), base_url, options)?;
        self.send_raw(request).await
    }

    /// [`send`](Self::send) for a logical request.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send) and [`send_raw_endpoint`](Self::send_raw_endpoint).
    pub async fn send_endpoint<V: ResponseBody>(
        &self,
        endpoint: Endpoint,
        base_url: &Url,
        options: &RequestOptions,
        middleware: &Middleware<Endpoint>,
    ) -> Result<SuccessResponse<V>> {
        let exchange = self
            .send_raw_endpoint(endpoint, base_url, options, middleware)
            .await?;
        decode_success(&self.decoder, exchange)
    }

    /// [`send_union`](Self::send_union) for a logical request.
    ///
    /// # Errors
    ///
    /// See [`send_union`](Self::send_union) and
    /// [`send_raw_endpoint`](Self::send_raw_endpoint).
    pub async fn send_union_endpoint<V, E>(
        &self,
        endpoint: Endpoint,
        base_url: &Url,
        options: &RequestOptions,
        middleware: &Middleware<Endpoint>,
    ) -> Result<Response<V, E>>
    where
        V: ResponseBody,
        E: DeserializeOwned,
    {
        let exchange = self
            .send_raw_endpoint(endpoint, base_url, options, middleware)
            .await?;
        decode_union(&self.decoder, exchange)
    }
}

fn build(request: &impl BuildRequest, base_url: &Url, options: &RequestOptions) -> Result<Request> {
    request
        .build_request(base_url, options)
        .map_err(|err| Error::other(RequestId::new(), err))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde::Deserialize;

    use super::*;
    use crate::{Decoder, HttpResponse, Method, StubTransport, TransportError};

    #[derive(Debug, PartialEq, Deserialize)]
    struct Widget {
        id: u64,
    }

    fn base() -> Url {
        Url::parse("https://h.example/api").expect("valid URL")
    }

    fn get(path: &str) -> Request {
        Request::builder(Method::Get, base().join(path).expect("join")).build()
    }

    #[tokio::test]
    async fn send_value_decodes_body() {
        let client = HttpRequestClient::new(StubTransport::new(200, r#"{"id":9}"#));
        let widget: Widget = client.send_value(get("w")).await.expect("decode");
        assert_eq!(widget, Widget { id: 9 });
    }

    #[tokio::test]
    async fn send_raw_does_not_classify() {
        let client = HttpRequestClient::new(StubTransport::new(503, "down"));
        let exchange = client.send_raw(get("w")).await.expect("raw");
        assert_eq!(exchange.status(), 503);
        assert_eq!(exchange.body().as_ref(), b"down");
    }

    #[tokio::test]
    async fn endpoint_variants_apply_middleware_before_building() {
        let stub = StubTransport::new(200, r#"{"id":1}"#);
        let client = HttpRequestClient::new(stub.clone());
        let middleware = Middleware::identity().then(|e: Endpoint| e.header("X-Trace", "on"));

        let response = client
            .send_endpoint::<Widget>(
                Endpoint::get("/widgets/1"),
                &base(),
                &RequestOptions::default(),
                &middleware,
            )
            .await
            .expect("send");

        assert_eq!(response.value(), &Widget { id: 1 });
        let seen = stub.last_request().expect("recorded");
        assert_eq!(seen.url().as_str(), "https://h.example/api/widgets/1");
        assert_eq!(seen.header("X-Trace"), Some("on"));
    }

    #[tokio::test]
    async fn build_failure_is_other_without_dispatch() {
        let stub = StubTransport::preview();
        let client = HttpRequestClient::new(stub.clone());
        let base = Url::parse("mailto:nobody@h.example").expect("valid URL");

        let err = client
            .send_raw_endpoint(
                Endpoint::get("x"),
                &base,
                &RequestOptions::default(),
                &Middleware::identity(),
            )
            .await
            .expect_err("cannot build");

        assert!(matches!(err, Error::Other { .. }));
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn transport_failure_keeps_minted_id() {
        let stub = StubTransport::preview().with_error(|| TransportError::Timeout);
        let client = HttpRequestClient::new(stub.clone());

        let err = client.send::<Widget>(get("w")).await.expect_err("timeout");

        assert!(err.is_timeout());
        assert_eq!(stub.last_request().and_then(|r| r.request_id()), Some(err.request_id()));
    }

    #[tokio::test]
    async fn invalid_response_from_transport() {
        let stub = StubTransport::preview()
            .with_error(|| TransportError::invalid_response("garbage"));
        let err = HttpRequestClient::new(stub)
            .send_raw(get("w"))
            .await
            .expect_err("invalid");
        assert!(matches!(err, Error::InvalidResponse { .. }));
    }

    #[tokio::test]
    async fn custom_decoder_is_used() {
        struct Fixed;

        impl Decoder for Fixed {
            fn decode<T: DeserializeOwned>(
                &self,
                _bytes: &[u8],
            ) -> std::result::Result<T, crate::DecodeFailure> {
                JsonDecoder.decode(br#"{"id":42}"#)
            }
        }

        let transport = StubTransport::from_response(HttpResponse::new(200, HashMap::new(), "?"));
        let client = HttpRequestClient::with_decoder(transport, Fixed);
        let widget: Widget = client.send_value(get("w")).await.expect("fixed");
        assert_eq!(widget, Widget { id: 42 });
    }
}
