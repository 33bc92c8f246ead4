//! Request/response logging.
//!
//! Logs each exchange with `tracing`, inside an `http_request` span that
//! carries the method, the URL and the correlation id of the dispatch.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use courier_core::{HttpResponse, Request, Transport, TransportError};
use tower::{Layer, Service};
use tracing::{Instrument, Level, debug, info, span, warn};

/// Layer that adds request/response logging.
///
/// # Example
///
/// ```no_run
/// use courier::HyperTransport;
/// use courier::middleware::LoggingLayer;
///
/// let transport = HyperTransport::builder()
///     .layer(LoggingLayer::new())
///     .build();
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingLayer {
    level: LogLevel,
}

/// Log level for the logging middleware.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Log at debug level (request headers included).
    Debug,
    /// Log at info level (summary only).
    #[default]
    Info,
}

impl LoggingLayer {
    /// Create a new logging layer with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a logging layer that logs at debug level.
    #[must_use]
    pub fn debug() -> Self {
        Self {
            level: LogLevel::Debug,
        }
    }
}

impl<S> Layer<S> for LoggingLayer {
    type Service = Logging<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Logging {
            inner,
            level: self.level,
        }
    }
}

/// Logs the exchanges of the wrapped service or transport.
///
/// Works both as a tower [`Service`] and as a [`Transport`]:
///
/// ```
/// use courier::middleware::Logging;
/// use courier::{HttpRequestClient, StubTransport};
///
/// let client = HttpRequestClient::new(Logging::new(StubTransport::preview()));
/// ```
#[derive(Debug, Clone)]
pub struct Logging<S> {
    inner: S,
    level: LogLevel,
}

impl<S> Logging<S> {
    /// Wrap `inner`, logging at info level.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            level: LogLevel::Info,
        }
    }

    /// Wrap `inner`, logging at debug level.
    pub fn debug(inner: S) -> Self {
        Self {
            inner,
            level: LogLevel::Debug,
        }
    }

    /// The configured level.
    pub const fn level(&self) -> LogLevel {
        self.level
    }

    /// The wrapped service or transport.
    pub const fn inner(&self) -> &S {
        &self.inner
    }
}

fn logged<F, Fut>(
    level: LogLevel,
    request: Request,
    send: F,
) -> impl Future<Output = Result<HttpResponse, TransportError>>
where
    F: FnOnce(Request) -> Fut,
    Fut: Future<Output = Result<HttpResponse, TransportError>>,
{
    let method = request.method();
    let url = request.url().to_string();
    let request_id = request
        .request_id()
        .map(|id| id.to_string())
        .unwrap_or_default();

    let span = span!(Level::INFO, "http_request", %method, %url, %request_id);

    async move {
        let start = Instant::now();

        match level {
            LogLevel::Debug => {
                debug!(
                    method = %method,
                    url = %url,
                    headers = ?request.headers(),
                    "sending request"
                );
            }
            LogLevel::Info => {
                info!(method = %method, url = %url, "sending request");
            }
        }

        let result = send(request).await;

        // Saturating conversion to u64
        let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        match &result {
            Ok(response) if response.head().is_success() => {
                info!(status = response.status(), elapsed_ms, "request completed");
            }
            Ok(response) => {
                warn!(
                    status = response.status(),
                    elapsed_ms,
                    "request failed with HTTP error"
                );
            }
            Err(err) => {
                warn!(error = %err, elapsed_ms, "request failed");
            }
        }

        result
    }
    .instrument(span)
}

impl<S> Service<Request> for Logging<S>
where
    S: Service<Request, Response = HttpResponse, Error = TransportError> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = HttpResponse;
    type Error = TransportError;
    type Future = Pin<Box<dyn Future<Output = Result<HttpResponse, TransportError>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), TransportError>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        // The instance polled ready is the one that must serve the call
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        Box::pin(logged(self.level, request, move |request| {
            inner.call(request)
        }))
    }
}

impl<T: Transport> Transport for Logging<T> {
    fn perform(
        &self,
        request: Request,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send {
        logged(self.level, request, |request| self.inner.perform(request))
    }
}

#[cfg(test)]
mod tests {
    use courier_core::{Method, StubTransport};

    use super::*;

    fn request() -> Request {
        Request::builder(Method::Get, "https://h.example/".parse().expect("url")).build()
    }

    #[test]
    fn logging_layer_default() {
        let layer = LoggingLayer::new();
        assert_eq!(layer.level, LogLevel::Info);
    }

    #[test]
    fn logging_layer_debug() {
        let service = LoggingLayer::debug().layer(());
        assert_eq!(service.level(), LogLevel::Debug);
    }

    #[tokio::test]
    async fn transport_wrapper_passes_response_through() {
        let stub = StubTransport::new(418, "teapot");
        let logging = Logging::debug(stub.clone());

        let response = logging.perform(request()).await.expect("response");

        assert_eq!(response.status(), 418);
        assert_eq!(response.body().as_ref(), b"teapot");
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn transport_wrapper_passes_errors_through() {
        let logging = Logging::new(StubTransport::preview().with_error(|| TransportError::Timeout));
        let err = logging.perform(request()).await.expect_err("timeout");
        assert!(err.is_timeout());
    }
}
