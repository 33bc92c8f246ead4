//! Body decoding.
//!
//! - [`Decoder`] - pluggable structured decoding (JSON by default, see [`JsonDecoder`])
//! - [`DecodeFailure`] - tagged failure: structural mismatch vs. any other fault
//! - [`ResponseBody`] - target types of the pipeline, including [`NoContent`]

use derive_more::{Display, From};
use serde::de::DeserializeOwned;
use serde_json::error::Category;

use crate::decode_error::{DecodeError, DecodeErrorKind, PathSegment};
use crate::error::BoxError;

/// Why a body could not be decoded.
///
/// Only [`DecodeFailure::Structural`] lets the union shape fall back to the
/// server-error type.
#[derive(Debug, Display, From)]
pub enum DecodeFailure {
    /// The body does not match the expected schema.
    #[display("{_0}")]
    Structural(DecodeError),
    /// Any other fault raised while decoding (e.g. an I/O error).
    #[display("{_0}")]
    Other(BoxError),
}

impl DecodeFailure {
    /// Returns `true` for a structural mismatch.
    #[must_use]
    pub const fn is_structural(&self) -> bool {
        matches!(self, Self::Structural(_))
    }
}

/// Structured decoding of raw body bytes.
///
/// Implementations must be free of hidden state: decoding the same bytes
/// twice yields the same result.
///
/// # Example
///
/// ```
/// use courier_core::{DecodeError, DecodeFailure, Decoder};
/// use serde::de::DeserializeOwned;
///
/// /// Accepts JSON wrapped in a `)]}',` anti-hijacking prefix.
/// struct PrefixedJson;
///
/// impl Decoder for PrefixedJson {
///     fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, DecodeFailure> {
///         let json = bytes.strip_prefix(b")]}',").ok_or_else(|| {
///             DecodeFailure::Structural(DecodeError::data_corrupted("missing prefix"))
///         })?;
///         courier_core::JsonDecoder.decode(json)
///     }
/// }
///
/// let value: Vec<u8> = PrefixedJson.decode(b")]}',[1,2]").unwrap();
/// assert_eq!(value, vec![1, 2]);
/// ```
pub trait Decoder: Send + Sync {
    /// Decode `bytes` into `T`.
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, DecodeFailure>;
}

impl<D: Decoder> Decoder for &D {
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, DecodeFailure> {
        (**self).decode(bytes)
    }
}

/// JSON decoder with path-aware errors.
///
/// Uses `serde_path_to_error` so structural errors carry the coding path of
/// the failing field, and rejects trailing characters after the value.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;

impl Decoder for JsonDecoder {
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, DecodeFailure> {
        let mut deserializer = serde_json::Deserializer::from_slice(bytes);
        let value = serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
            let path = err.path().iter().map(path_segment).collect();
            classify(err.into_inner(), path)
        })?;
        deserializer
            .end()
            .map_err(|err| classify(err, Vec::new()))?;
        Ok(value)
    }
}

fn path_segment(segment: &serde_path_to_error::Segment) -> PathSegment {
    match segment {
        serde_path_to_error::Segment::Seq { index } => PathSegment::Index(*index),
        serde_path_to_error::Segment::Map { key } => PathSegment::Key(key.clone()),
        serde_path_to_error::Segment::Enum { variant } => PathSegment::Key(variant.clone()),
        _ => PathSegment::Key("?".to_string()),
    }
}

fn classify(err: serde_json::Error, path: Vec<PathSegment>) -> DecodeFailure {
    let kind = match err.classify() {
        Category::Io => return DecodeFailure::Other(Box::new(err)),
        Category::Syntax | Category::Eof => DecodeErrorKind::DataCorrupted,
        Category::Data => data_error_kind(&message_of(&err)),
    };
    DecodeFailure::Structural(DecodeError::new(kind, path, message_of(&err)))
}

/// The serde message without serde_json's ` at line X column Y` suffix.
fn message_of(err: &serde_json::Error) -> String {
    let text = err.to_string();
    match text.rsplit_once(" at line ") {
        Some((message, _)) => message.to_string(),
        None => text,
    }
}

fn data_error_kind(message: &str) -> DecodeErrorKind {
    if let Some(key) = message
        .strip_prefix("missing field `")
        .and_then(|rest| rest.strip_suffix('`'))
    {
        return DecodeErrorKind::KeyNotFound {
            key: key.to_string(),
        };
    }

    if let Some((found, expected)) = message
        .strip_prefix("invalid type: ")
        .and_then(|rest| rest.rsplit_once(", expected "))
    {
        let expected = expected.to_string();
        return if found == "null" {
            DecodeErrorKind::ValueNotFound { expected }
        } else {
            DecodeErrorKind::TypeMismatch { expected }
        };
    }

    DecodeErrorKind::DataCorrupted
}

/// Canonical value for calls that expect no body.
///
/// Decoding into `NoContent` never reads the body nor calls the decoder,
/// so `204 No Content` and empty `200` responses succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NoContent;

/// Types the pipeline can produce from a successful response body.
///
/// Every [`DeserializeOwned`] type is a `ResponseBody` decoded through the
/// configured [`Decoder`]; [`NoContent`] is the one type that skips decoding.
pub trait ResponseBody: Sized {
    /// Produce `Self` from the raw body.
    fn decode_with<D: Decoder>(decoder: &D, body: &[u8]) -> Result<Self, DecodeFailure>;
}

impl<T: DeserializeOwned> ResponseBody for T {
    fn decode_with<D: Decoder>(decoder: &D, body: &[u8]) -> Result<Self, DecodeFailure> {
        decoder.decode(body)
    }
}

impl ResponseBody for NoContent {
    fn decode_with<D: Decoder>(_decoder: &D, _body: &[u8]) -> Result<Self, DecodeFailure> {
        Ok(Self)
    }
}
