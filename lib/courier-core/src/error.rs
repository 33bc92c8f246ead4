//! Error types for courier.
//!
//! - [`Error`] - the closed taxonomy returned by every pipeline operation
//! - [`TransportError`] - network-layer failures reported by a [`Transport`](crate::Transport)
//! - [`BuildError`] - failures turning a logical request into a [`Request`](crate::Request)

use derive_more::{Display, Error as DeriveError, From};

use crate::response::ResponseHead;
use crate::{DecodeError, RequestId};

/// Boxed error used for causes of unknown type.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

// ============================================================================
// Transport Error
// ============================================================================

/// Failure reported by a transport before any HTTP response was obtained.
#[derive(Debug, Display, DeriveError)]
pub enum TransportError {
    /// Network/connection errors.
    #[display("connection error: {_0}")]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    Tls(#[error(not(source))] String),

    /// The request deadline elapsed.
    #[display("request timeout")]
    Timeout,

    /// The request could not be turned into a wire request.
    #[display("invalid request: {_0}")]
    InvalidRequest(#[error(not(source))] String),

    /// The peer answered with something that is not an HTTP response.
    #[display("invalid HTTP response: {_0}")]
    InvalidResponse(#[error(not(source))] String),
}

impl TransportError {
    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create an invalid response error.
    #[must_use]
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

// ============================================================================
// Build Error
// ============================================================================

/// Failure building a [`Request`](crate::Request) from a logical request.
#[derive(Debug, Display, DeriveError, From)]
pub enum BuildError {
    /// URL parsing or joining error.
    #[display("invalid URL: {_0}")]
    InvalidUrl(url::ParseError),

    /// JSON body serialization error.
    #[display("JSON serialization error: {_0}")]
    Json(serde_json::Error),

    /// Form or query string serialization error.
    #[display("form serialization error: {_0}")]
    Form(serde_html_form::ser::Error),

    /// The endpoint path resolved to a URL outside the base URL.
    #[display("URL {_0} is outside the base URL")]
    OutsideBase(#[error(not(source))] String),
}

// ============================================================================
// Error Type
// ============================================================================

/// Main error type: every failure of a dispatched call.
///
/// Each variant carries the [`RequestId`] of the call so it can be matched
/// against transport logs.
#[derive(Debug, Display)]
pub enum Error {
    /// The transport returned something that is not an HTTP response.
    #[display("[{request_id}] invalid HTTP response")]
    InvalidResponse {
        /// Correlation id.
        request_id: RequestId,
    },

    /// The status is outside `200..300`.
    #[display("[{request_id}] HTTP error {status}: {body}")]
    BadResponse {
        /// Correlation id.
        request_id: RequestId,
        /// HTTP status code.
        status: u16,
        /// Body decoded as UTF-8, or empty when it is not valid UTF-8.
        body: String,
        /// Status and headers.
        head: ResponseHead,
    },

    /// The body does not match the expected shape(s).
    #[display("[{request_id}] decoding error: {source}")]
    Decoding {
        /// Correlation id.
        request_id: RequestId,
        /// Failure of the success-side decode.
        source: DecodeError,
    },

    /// Any other failure: network fault, decoder fault, request build failure.
    #[display("[{request_id}] {source}")]
    Other {
        /// Correlation id.
        request_id: RequestId,
        /// Underlying cause.
        source: BoxError,
    },
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidResponse { .. } | Self::BadResponse { .. } => None,
            Self::Decoding { source, .. } => Some(source),
            Self::Other { source, .. } => Some(source.as_ref()),
        }
    }
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error from any cause.
    #[must_use]
    pub fn other(request_id: RequestId, source: impl Into<BoxError>) -> Self {
        Self::Other {
            request_id,
            source: source.into(),
        }
    }

    /// Correlation id of the failed call.
    #[must_use]
    pub const fn request_id(&self) -> RequestId {
        match self {
            Self::InvalidResponse { request_id }
            | Self::BadResponse { request_id, .. }
            | Self::Decoding { request_id, .. }
            | Self::Other { request_id, .. } => *request_id,
        }
    }

    /// Returns the HTTP status code if this is a bad response.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::BadResponse { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the body text if this is a bad response.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::BadResponse { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Returns `true` if this is a bad response.
    #[must_use]
    pub const fn is_bad_response(&self) -> bool {
        matches!(self, Self::BadResponse { .. })
    }

    /// Returns `true` if this is a decoding error.
    #[must_use]
    pub const fn is_decoding(&self) -> bool {
        matches!(self, Self::Decoding { .. })
    }

    /// Returns `true` if the transport gave up because of a timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        self.transport_error().is_some_and(TransportError::is_timeout)
    }

    /// Returns `true` if the transport could not connect.
    #[must_use]
    pub fn is_connection(&self) -> bool {
        self.transport_error()
            .is_some_and(TransportError::is_connection)
    }

    /// The transport failure behind an [`Error::Other`], if any.
    #[must_use]
    pub fn transport_error(&self) -> Option<&TransportError> {
        match self {
            Self::Other { source, .. } => source.downcast_ref(),
            _ => None,
        }
    }

    /// Try to decode the body of a bad response as JSON.
    ///
    /// Returns `None` for other variants.
    ///
    /// # Example
    ///
    /// ```ignore
    /// #[derive(Debug, Deserialize)]
    /// struct ApiError {
    ///     message: String,
    /// }
    ///
    /// if let Err(err) = client.send_value::<User>(request).await {
    ///     if let Some(Ok(api_error)) = err.decode_body::<ApiError>() {
    ///         println!("API error: {}", api_error.message);
    ///     }
    /// }
    /// ```
    pub fn decode_body<T: serde::de::DeserializeOwned>(
        &self,
    ) -> Option<std::result::Result<T, crate::DecodeFailure>> {
        use crate::Decoder;

        self.body()
            .map(|body| crate::JsonDecoder.decode(body.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn error_display() {
        let id = RequestId::new();

        let err = Error::BadResponse {
            request_id: id,
            status: 404,
            body: "Not Found".to_string(),
            head: ResponseHead::default(),
        };
        assert_eq!(err.to_string(), format!("[{id}] HTTP error 404: Not Found"));

        let err = Error::InvalidResponse { request_id: id };
        assert_eq!(err.to_string(), format!("[{id}] invalid HTTP response"));

        let err = Error::other(id, TransportError::connection("refused"));
        assert_eq!(err.to_string(), format!("[{id}] connection error: refused"));
    }

    #[test]
    fn error_carries_request_id() {
        let id = RequestId::new();
        let errors = [
            Error::InvalidResponse { request_id: id },
            Error::Decoding {
                request_id: id,
                source: DecodeError::data_corrupted("bad"),
            },
            Error::other(id, TransportError::Timeout),
        ];

        for err in errors {
            assert_eq!(err.request_id(), id);
        }
    }

    #[test]
    fn error_status_and_body() {
        let err = Error::BadResponse {
            request_id: RequestId::new(),
            status: 500,
            body: "boom".to_string(),
            head: ResponseHead::default(),
        };
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.body(), Some("boom"));
        assert!(err.is_bad_response());

        let err = Error::other(RequestId::new(), TransportError::Timeout);
        assert_eq!(err.status(), None);
        assert!(err.body().is_none());
    }

    #[test]
    fn error_transport_predicates() {
        let id = RequestId::new();
        assert!(Error::other(id, TransportError::Timeout).is_timeout());
        assert!(Error::other(id, TransportError::connection("refused")).is_connection());
        assert!(!Error::InvalidResponse { request_id: id }.is_timeout());
        assert!(!Error::other(id, "plain message").is_timeout());
    }

    #[test]
    fn error_source_chain() {
        let id = RequestId::new();
        let err = Error::Decoding {
            request_id: id,
            source: DecodeError::data_corrupted("bad"),
        };
        assert!(err.is_decoding());
        assert_eq!(err.source().map(ToString::to_string), Some("bad".to_string()));

        assert!(Error::InvalidResponse { request_id: id }.source().is_none());
    }

    #[test]
    fn error_decode_body() {
        #[derive(Debug, PartialEq, serde::Deserialize)]
        struct ApiError {
            message: String,
        }

        let err = Error::BadResponse {
            request_id: RequestId::new(),
            status: 404,
            body: r#"{"message":"not found"}"#.to_string(),
            head: ResponseHead::default(),
        };
        let decoded = err
            .decode_body::<ApiError>()
            .expect("bad response has a body")
            .expect("should decode");
        assert_eq!(
            decoded,
            ApiError {
                message: "not found".to_string()
            }
        );

        assert!(Error::other(RequestId::new(), TransportError::Timeout)
            .decode_body::<ApiError>()
            .is_none());
    }

    #[test]
    fn transport_error_display() {
        assert_eq!(TransportError::Timeout.to_string(), "request timeout");
        assert_eq!(
            TransportError::tls("bad certificate").to_string(),
            "TLS error: bad certificate"
        );
        assert_eq!(
            TransportError::invalid_response("not HTTP").to_string(),
            "invalid HTTP response: not HTTP"
        );
    }
}
