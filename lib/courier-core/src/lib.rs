//! Core types and pipeline for courier.
//!
//! This crate dispatches fully-built requests through a pluggable transport
//! and decodes the responses into typed shapes:
//! - [`Transport`] - performs one HTTP exchange, nothing more
//! - [`dispatch`] - tags each call with a fresh [`RequestId`]
//! - [`decode_success`] / [`decode_union`] - status classification and body decoding
//! - [`Decoder`] and [`JsonDecoder`] - pluggable structured decoding
//! - [`HttpRequestClient`] - facade bundling a transport and a decoder
//! - [`Endpoint`], [`BuildRequest`] and [`Middleware`] - logical requests
//! - [`Error`] and [`Result`] - the closed error taxonomy
//! - [`StubTransport`] - deterministic transport for previews and tests
//! - [`StatusCode`] and [`header`] - re-exported from the `http` crate

mod client;
mod decode;
mod decode_error;
mod endpoint;
mod error;
mod method;
mod middleware;
mod pipeline;
pub mod prelude;
mod request;
mod request_id;
mod response;
mod status;
mod stub;
mod transport;

pub use client::HttpRequestClient;
pub use decode::{DecodeFailure, Decoder, JsonDecoder, NoContent, ResponseBody};
pub use decode_error::{DecodeError, DecodeErrorKind, PathSegment};
pub use endpoint::{BuildRequest, ContentType, Endpoint};
pub use error::{BoxError, BuildError, Error, Result, TransportError};
pub use method::{Method, UnknownMethod};
pub use middleware::Middleware;
pub use pipeline::{decode_success, decode_union, dispatch};
pub use request::{CachePolicy, DEFAULT_TIMEOUT, Request, RequestBuilder, RequestOptions};
pub use request_id::RequestId;
pub use response::{Exchange, HttpResponse, Response, ResponseHead, SuccessResponse};
pub use status::{SUCCESS_RANGE, StatusClass};
pub use stub::StubTransport;
pub use transport::Transport;

// Re-export http crate types for status codes and headers
pub use http::{StatusCode, header};
pub use url::Url;
