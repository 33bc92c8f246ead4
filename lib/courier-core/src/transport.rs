//! Transport trait.
//!
//! A [`Transport`] performs exactly one exchange: it sends a fully-built
//! [`Request`] and returns the raw [`HttpResponse`], or a [`TransportError`]
//! when no HTTP response could be obtained. It never classifies statuses nor
//! decodes bodies.
//!
//! Implement it for:
//! - a live network client (`courier::HyperTransport`)
//! - a diagnostic wrapper around another transport (`courier::middleware::Logging`)
//! - a deterministic double for tests ([`StubTransport`](crate::StubTransport))

use std::future::Future;
use std::sync::Arc;

use crate::{HttpResponse, Request, TransportError};

/// Core transport trait.
///
/// Implementations must tolerate concurrent calls: the pipeline shares one
/// transport across every in-flight dispatch.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
///
/// use courier_core::{HttpResponse, Request, Transport, TransportError};
///
/// /// Answers every request with the URL it was sent to.
/// struct Echo;
///
/// impl Transport for Echo {
///     async fn perform(&self, request: Request) -> Result<HttpResponse, TransportError> {
///         Ok(HttpResponse::new(200, HashMap::new(), request.url().to_string()))
///     }
/// }
/// ```
pub trait Transport: Send + Sync {
    /// Perform the request and return the raw response.
    ///
    /// # Errors
    ///
    /// Returns an error when no HTTP response was obtained:
    /// - Network errors
    /// - TLS errors
    /// - Timeouts
    /// - Invalid response
    fn perform(
        &self,
        request: Request,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}

impl<T: Transport> Transport for &T {
    fn perform(
        &self,
        request: Request,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send {
        (**self).perform(request)
    }
}

impl<T: Transport> Transport for Arc<T> {
    fn perform(
        &self,
        request: Request,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send {
        (**self).perform(request)
    }
}
