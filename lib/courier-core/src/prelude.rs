//! Prelude module for convenient imports.
//!
//! ```ignore
//! use courier_core::prelude::*;
//! ```

pub use crate::{
    BuildRequest, CachePolicy, Decoder, Endpoint, Error, HttpRequestClient, HttpResponse,
    JsonDecoder, Method, Middleware, NoContent, Request, RequestId, RequestOptions, Response,
    ResponseBody, Result, SuccessResponse, Transport, TransportError,
};
