//! Dispatch and decode.
//!
//! [`dispatch`] performs one exchange through a [`Transport`]; [`decode_success`]
//! and [`decode_union`] turn the resulting [`Exchange`] into a typed shape.
//! All three are free functions so the pipeline can be reused without
//! [`HttpRequestClient`](crate::HttpRequestClient).

use serde::de::DeserializeOwned;

use crate::response::{Exchange, Response, ResponseHead, SuccessResponse};
use crate::status::StatusClass;
use crate::{
    DecodeFailure, Decoder, Error, Request, RequestId, ResponseBody, Result, Transport,
    TransportError,
};

/// Perform exactly one request against `transport`.
///
/// A fresh [`RequestId`] is minted before the transport is invoked and stored
/// in the request extensions, so it is present even when the call fails.
pub async fn dispatch<T: Transport>(transport: &T, mut request: Request) -> Result<Exchange> {
    let request_id = RequestId::new();
    request.extensions_mut().insert(request_id);

    match transport.perform(request).await {
        Ok(response) => Ok(Exchange::new(request_id, response)),
        Err(TransportError::InvalidResponse(_)) => Err(Error::InvalidResponse { request_id }),
        Err(err) => Err(Error::other(request_id, err)),
    }
}

/// Decode a successful exchange into a single typed value.
///
/// Non-2xx statuses fail with [`Error::BadResponse`]; a body that does not
/// match `T` fails with [`Error::Decoding`].
pub fn decode_success<T, D>(decoder: &D, exchange: Exchange) -> Result<SuccessResponse<T>>
where
    T: ResponseBody,
    D: Decoder,
{
    let (body, head, request_id) = exchange.into_parts();
    let head = ensure_success(request_id, head, &body)?;

    match T::decode_with(decoder, &body) {
        Ok(value) => Ok(SuccessResponse::new(value, head, request_id)),
        Err(DecodeFailure::Structural(source)) => Err(Error::Decoding { request_id, source }),
        Err(DecodeFailure::Other(source)) => Err(Error::Other { request_id, source }),
    }
}

/// Decode a successful exchange into the success/server-error union.
///
/// When the body structurally fails to decode as `T`, the same bytes are
/// decoded as `E`. If that also fails, the call fails with
/// [`Error::Decoding`] carrying the success-side `T` failure.
pub fn decode_union<T, E, D>(decoder: &D, exchange: Exchange) -> Result<Response<T, E>>
where
    T: ResponseBody,
    E: DeserializeOwned,
    D: Decoder,
{
    let (body, head, request_id) = exchange.into_parts();
    let head = ensure_success(request_id, head, &body)?;

    match T::decode_with(decoder, &body) {
        Ok(value) => Ok(Response::from_value(value, head, request_id)),
        Err(DecodeFailure::Structural(source)) => match decoder.decode::<E>(&body) {
            Ok(error) => Ok(Response::from_error(error, head, request_id)),
            Err(_) => Err(Error::Decoding { request_id, source }),
        },
        Err(DecodeFailure::Other(source)) => Err(Error::Other { request_id, source }),
    }
}

fn ensure_success(request_id: RequestId, head: ResponseHead, body: &[u8]) -> Result<ResponseHead> {
    match StatusClass::of(head.status()) {
        StatusClass::Success => Ok(head),
        StatusClass::Failure => Err(Error::BadResponse {
            request_id,
            status: head.status(),
            body: std::str::from_utf8(body)
                .map(ToOwned::to_owned)
                .unwrap_or_default(),
            head,
        }),
    }
}
