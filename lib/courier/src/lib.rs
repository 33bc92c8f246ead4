//! Typed HTTP requests over a pluggable transport.
//!
//! courier dispatches requests through a [`Transport`], tags every call with
//! a correlation id, classifies the status, and decodes the body into a typed
//! value or into a success/server-error union.
//!
//! # Example
//!
//! ```no_run
//! use courier::prelude::*;
//!
//! #[derive(Debug, Deserialize)]
//! struct Widget {
//!     id: u64,
//!     name: String,
//! }
//!
//! #[derive(Debug, Deserialize)]
//! struct ApiError {
//!     message: String,
//! }
//!
//! # async fn demo() -> courier::Result<()> {
//! let api = ApiClient::new(courier::live(), "https://api.example.com").expect("valid URL");
//!
//! let widget: Widget = api.send_value(Endpoint::get("/widgets/1")).await?;
//!
//! match api.send_union::<Widget, ApiError>(Endpoint::get("/widgets/2")).await?.into_result() {
//!     Ok(widget) => println!("{}", widget.name),
//!     Err(error) => println!("server said: {}", error.message),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! The transport is always a constructor argument: [`live`] wires the
//! [`HyperTransport`], [`preview`] a [`StubTransport`] answering an empty
//! `200` for every request.

mod api_client;
mod client;
mod config;
mod connector;
pub mod middleware;
pub mod prelude;

pub use api_client::ApiClient;
pub use client::{BoxedService, HyperTransport, HyperTransportBuilder, ServiceFuture};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use connector::https_connector;

// Re-export tower for middleware composition
pub use tower;

// Re-export core types
pub use courier_core::{
    BoxError, BuildError, BuildRequest, CachePolicy, ContentType, DEFAULT_TIMEOUT, DecodeError,
    DecodeErrorKind, DecodeFailure, Decoder, Endpoint, Error, Exchange, HttpRequestClient,
    HttpResponse, JsonDecoder, Method, Middleware, NoContent, PathSegment, Request,
    RequestBuilder, RequestId, RequestOptions, Response, ResponseBody, ResponseHead, Result,
    SUCCESS_RANGE, StatusClass, StubTransport, SuccessResponse, Transport, TransportError,
    UnknownMethod, decode_success, decode_union, dispatch,
};

// Re-export http types for status codes and headers
pub use courier_core::{StatusCode, header};

pub use url;

/// Client over the live network transport, with default configuration.
#[must_use]
pub fn live() -> HttpRequestClient<HyperTransport> {
    HttpRequestClient::new(HyperTransport::new())
}

/// Client whose transport answers an empty `200` to every request.
///
/// ```
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// use courier::{Endpoint, Middleware, NoContent, RequestOptions};
///
/// let base = "https://api.example.com".parse().unwrap();
/// let response = courier::preview()
///     .send_endpoint::<NoContent>(
///         Endpoint::get("/anything"),
///         &base,
///         &RequestOptions::default(),
///         &Middleware::identity(),
///     )
///     .await
///     .unwrap();
/// assert_eq!(response.head().status(), 200);
/// # });
/// ```
#[must_use]
pub fn preview() -> HttpRequestClient<StubTransport> {
    HttpRequestClient::new(StubTransport::preview())
}
