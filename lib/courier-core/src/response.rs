//! Response types.
//!
//! - [`HttpResponse`]: what a [`Transport`](crate::Transport) hands back.
//! - [`Exchange`]: the raw shape (body bytes, head, request id).
//! - [`SuccessResponse`]: the single-typed shape.
//! - [`Response`]: the success/server-error union shape.

use std::collections::HashMap;

use bytes::Bytes;

use crate::RequestId;
use crate::request::find_header;
use crate::status::StatusClass;

/// Status line and headers of a response.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResponseHead {
    status: u16,
    headers: HashMap<String, String>,
}

impl ResponseHead {
    /// Creates a new head.
    #[must_use]
    pub fn new(status: u16, headers: HashMap<String, String>) -> Self {
        Self { status, headers }
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Response headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Single header value by name, ignoring ASCII case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Status is 2xx.
    #[must_use]
    pub fn is_success(&self) -> bool {
        StatusClass::of(self.status).is_success()
    }
}

/// A response as returned by a transport: head plus raw body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    head: ResponseHead,
    body: Bytes,
}

impl HttpResponse {
    /// Creates a new response.
    #[must_use]
    pub fn new(status: u16, headers: HashMap<String, String>, body: impl Into<Bytes>) -> Self {
        Self {
            head: ResponseHead::new(status, headers),
            body: body.into(),
        }
    }

    /// Status and headers.
    #[must_use]
    pub const fn head(&self) -> &ResponseHead {
        &self.head
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.head.status
    }

    /// Response body.
    #[must_use]
    pub const fn body(&self) -> &Bytes {
        &self.body
    }

    /// Consume into (head, body).
    #[must_use]
    pub fn into_parts(self) -> (ResponseHead, Bytes) {
        (self.head, self.body)
    }
}

/// Raw outcome of one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    request_id: RequestId,
    head: ResponseHead,
    body: Bytes,
}

impl Exchange {
    pub(crate) fn new(request_id: RequestId, response: HttpResponse) -> Self {
        let (head, body) = response.into_parts();
        Self {
            request_id,
            head,
            body,
        }
    }

    /// Correlation id of the call.
    #[must_use]
    pub const fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Status and headers.
    #[must_use]
    pub const fn head(&self) -> &ResponseHead {
        &self.head
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.head.status
    }

    /// Raw body bytes.
    #[must_use]
    pub const fn body(&self) -> &Bytes {
        &self.body
    }

    /// Consume into (body, head, request id).
    #[must_use]
    pub fn into_parts(self) -> (Bytes, ResponseHead, RequestId) {
        (self.body, self.head, self.request_id)
    }
}

/// Single-typed response: a decoded success value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuccessResponse<T> {
    request_id: RequestId,
    head: ResponseHead,
    value: T,
}

impl<T> SuccessResponse<T> {
    /// Creates a new response.
    #[must_use]
    pub const fn new(value: T, head: ResponseHead, request_id: RequestId) -> Self {
        Self {
            request_id,
            head,
            value,
        }
    }

    /// Correlation id of the call.
    #[must_use]
    pub const fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Status and headers.
    #[must_use]
    pub const fn head(&self) -> &ResponseHead {
        &self.head
    }

    /// Decoded value.
    #[must_use]
    pub const fn value(&self) -> &T {
        &self.value
    }

    /// Consume into the decoded value.
    #[must_use]
    pub fn into_value(self) -> T {
        self.value
    }
}

/// Union response: exactly one of a success value or a server-declared error.
///
/// Both sides are decoded from a 2xx body; which one is populated depends on
/// which schema the body matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response<T, E> {
    request_id: RequestId,
    head: ResponseHead,
    body: Result<T, E>,
}

impl<T, E> Response<T, E> {
    /// A response populated on the success side.
    #[must_use]
    pub const fn from_value(value: T, head: ResponseHead, request_id: RequestId) -> Self {
        Self {
            request_id,
            head,
            body: Ok(value),
        }
    }

    /// A response populated on the server-error side.
    #[must_use]
    pub const fn from_error(error: E, head: ResponseHead, request_id: RequestId) -> Self {
        Self {
            request_id,
            head,
            body: Err(error),
        }
    }

    /// Correlation id of the call.
    #[must_use]
    pub const fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Status and headers.
    #[must_use]
    pub const fn head(&self) -> &ResponseHead {
        &self.head
    }

    /// Decoded body.
    #[must_use]
    pub const fn body(&self) -> &Result<T, E> {
        &self.body
    }

    /// The success value, if that side is populated.
    #[must_use]
    pub fn value(&self) -> Option<&T> {
        self.body.as_ref().ok()
    }

    /// The server error, if that side is populated.
    #[must_use]
    pub fn error(&self) -> Option<&E> {
        self.body.as_ref().err()
    }

    /// Returns `true` when the success side is populated.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.body.is_ok()
    }

    /// Consume into the decoded body.
    pub fn into_result(self) -> Result<T, E> {
        self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Widget {
        id: u64,
        name: String,
    }

    #[derive(Debug, PartialEq)]
    struct ApiError {
        message: String,
    }

    fn head(status: u16) -> ResponseHead {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());
        ResponseHead::new(status, headers)
    }

    #[test]
    fn union_success_side() {
        let id = RequestId::new();
        let response: Response<Widget, ApiError> = Response::from_value(
            Widget {
                id: 1,
                name: "Test".to_string(),
            },
            head(200),
            id,
        );

        assert_eq!(response.value().map(|w| w.id), Some(1));
        assert_eq!(response.value().map(|w| w.name.as_str()), Some("Test"));
        assert!(response.error().is_none());
        assert!(response.is_success());
        assert_eq!(response.request_id(), id);
    }

    #[test]
    fn union_error_side() {
        let id = RequestId::new();
        let response: Response<Widget, ApiError> = Response::from_error(
            ApiError {
                message: "Bad request".to_string(),
            },
            head(200),
            id,
        );

        assert!(response.value().is_none());
        assert_eq!(
            response.error().map(|e| e.message.as_str()),
            Some("Bad request")
        );
        assert_eq!(response.request_id(), id);
        assert!(response.into_result().is_err());
    }

    #[test]
    fn success_response() {
        let id = RequestId::new();
        let response = SuccessResponse::new(
            Widget {
                id: 42,
                name: "Success".to_string(),
            },
            head(201),
            id,
        );

        assert_eq!(response.value().id, 42);
        assert_eq!(response.head().status(), 201);
        assert_eq!(response.request_id(), id);
        assert_eq!(response.into_value().name, "Success");
    }

    #[test]
    fn head_header_lookup_ignores_case() {
        let head = head(200);
        assert_eq!(head.header("Content-Type"), Some("application/json"));
        assert!(head.header("x-missing").is_none());
        assert!(head.is_success());
    }

    #[test]
    fn exchange_into_parts() {
        let id = RequestId::new();
        let exchange = Exchange::new(id, HttpResponse::new(404, HashMap::new(), "nope"));

        assert_eq!(exchange.status(), 404);
        let (body, head, request_id) = exchange.into_parts();
        assert_eq!(body, Bytes::from_static(b"nope"));
        assert_eq!(head.status(), 404);
        assert_eq!(request_id, id);
    }
}
