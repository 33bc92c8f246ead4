//! Deterministic transport for previews and tests.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use crate::{HttpResponse, Request, Transport, TransportError};

type ErrorFactory = Arc<dyn Fn() -> TransportError + Send + Sync>;

#[derive(Debug, Default)]
struct Recorded {
    calls: usize,
    last: Option<Request>,
}

/// Answers every request with the same canned response.
///
/// Clones share the call counter and the last recorded request, so a clone
/// handed to a client can be inspected afterwards.
#[derive(Clone)]
pub struct StubTransport {
    response: HttpResponse,
    error: Option<ErrorFactory>,
    recorded: Arc<Mutex<Recorded>>,
}

impl StubTransport {
    /// Canned status and body, no headers.
    #[must_use]
    pub fn new(status: u16, body: impl Into<bytes::Bytes>) -> Self {
        Self::from_response(HttpResponse::new(status, HashMap::new(), body))
    }

    /// Canned response.
    #[must_use]
    pub fn from_response(response: HttpResponse) -> Self {
        Self {
            response,
            error: None,
            recorded: Arc::default(),
        }
    }

    /// Empty `200` for every request.
    #[must_use]
    pub fn preview() -> Self {
        Self::new(200, bytes::Bytes::new())
    }

    /// Fail every request with the error produced by `error`.
    #[must_use]
    pub fn with_error<F>(mut self, error: F) -> Self
    where
        F: Fn() -> TransportError + Send + Sync + 'static,
    {
        self.error = Some(Arc::new(error));
        self
    }

    /// Number of requests performed so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.lock().calls
    }

    /// The most recent request, as the transport received it.
    #[must_use]
    pub fn last_request(&self) -> Option<Request> {
        self.lock().last.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Recorded> {
        self.recorded.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Transport for StubTransport {
    async fn perform(&self, request: Request) -> Result<HttpResponse, TransportError> {
        {
            let mut recorded = self.lock();
            recorded.calls += 1;
            recorded.last = Some(request);
        }

        match &self.error {
            Some(error) => Err(error()),
            None => Ok(self.response.clone()),
        }
    }
}

impl fmt::Debug for StubTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StubTransport")
            .field("status", &self.response.status())
            .field("fails", &self.error.is_some())
            .field("calls", &self.calls())
            .finish()
    }
}
