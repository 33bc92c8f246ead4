//! Prelude module for convenient imports.
//!
//! ```ignore
//! use courier::prelude::*;
//! ```

pub use crate::{
    ApiClient, ClientConfig, Endpoint, Error, HttpRequestClient, HyperTransport, Method,
    Middleware, NoContent, Request, RequestOptions, Response, Result, StatusCode,
    SuccessResponse, Transport, header,
};
pub use serde::{Deserialize, Serialize};
