//! Structural decode errors.
//!
//! A [`DecodeError`] means the body did not match the expected schema. It
//! keeps the coding path of the failing value so the mismatch can be reported
//! precisely, see [`DecodeError::debug_description`].

use std::fmt;

/// What kind of schema mismatch was found.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DecodeErrorKind {
    /// The payload is not well-formed (syntax error, truncated input, bad value).
    DataCorrupted,
    /// A required key is absent.
    KeyNotFound {
        /// Name of the missing key.
        key: String,
    },
    /// A value has the wrong type.
    TypeMismatch {
        /// Description of the expected type.
        expected: String,
    },
    /// A required value is `null`.
    ValueNotFound {
        /// Description of the expected type.
        expected: String,
    },
}

/// One step of a coding path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Object key or enum variant.
    Key(String),
    /// Array index.
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

/// The body did not match the expected schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    kind: DecodeErrorKind,
    path: Vec<PathSegment>,
    message: String,
}

impl DecodeError {
    /// Creates a new decode error.
    #[must_use]
    pub fn new(kind: DecodeErrorKind, path: Vec<PathSegment>, message: impl Into<String>) -> Self {
        Self {
            kind,
            path,
            message: message.into(),
        }
    }

    /// Shorthand for a [`DecodeErrorKind::DataCorrupted`] error at the root.
    #[must_use]
    pub fn data_corrupted(message: impl Into<String>) -> Self {
        Self::new(DecodeErrorKind::DataCorrupted, Vec::new(), message)
    }

    /// Mismatch kind.
    #[must_use]
    pub const fn kind(&self) -> &DecodeErrorKind {
        &self.kind
    }

    /// Coding path of the failing value, outermost first.
    #[must_use]
    pub fn path(&self) -> &[PathSegment] {
        &self.path
    }

    /// Decoder message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Coding path joined with `.`, e.g. `items.0.name`.
    #[must_use]
    pub fn coding_path(&self) -> String {
        join_path(&self.path)
    }

    /// Human-readable description of the failure when decoding `T`.
    ///
    /// ```
    /// use courier_core::{DecodeError, DecodeErrorKind, PathSegment};
    ///
    /// struct User;
    ///
    /// let err = DecodeError::new(
    ///     DecodeErrorKind::KeyNotFound { key: "city".to_string() },
    ///     vec![PathSegment::Key("address".to_string())],
    ///     "missing field `city`",
    /// );
    /// assert_eq!(
    ///     err.debug_description::<User>(),
    ///     "Value required for 'User.address.city' but it was missing."
    /// );
    /// ```
    #[must_use]
    pub fn debug_description<T: ?Sized>(&self) -> String {
        match &self.kind {
            DecodeErrorKind::DataCorrupted => {
                format!("{} Path: {}", self.message, self.coding_path())
            }
            DecodeErrorKind::KeyNotFound { key } => {
                let mut path = self.path.clone();
                path.push(PathSegment::Key(key.clone()));
                format!(
                    "Value required for '{}.{}' but it was missing.",
                    short_type_name::<T>(),
                    join_path(&path)
                )
            }
            DecodeErrorKind::TypeMismatch { expected } => {
                format!(
                    "Type mismatch: {expected} required for key [{}].",
                    self.coding_path()
                )
            }
            DecodeErrorKind::ValueNotFound { expected } => {
                format!(
                    "Value Required: {expected} required for key [{}].",
                    self.coding_path()
                )
            }
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{} (at '{}')", self.message, self.coding_path())
        }
    }
}

impl std::error::Error for DecodeError {}

fn join_path(path: &[PathSegment]) -> String {
    path.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

/// Last path segment of the type name, generics kept: `app::User` becomes `User`.
///
/// Names that do not start with a path (tuples, slices, references) are kept
/// whole.
fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    if !full.starts_with(|c: char| c.is_alphabetic() || c == '_') {
        return full;
    }
    let base = full.split('<').next().unwrap_or(full);
    match base.rfind("::") {
        Some(pos) => full.get(pos + 2..).unwrap_or(full),
        None => full,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(dead_code)]
    mod api {
        pub struct Widget;
        pub struct Page<T>(pub T);
    }

    fn key(name: &str) -> PathSegment {
        PathSegment::Key(name.to_string())
    }

    #[test]
    fn data_corrupted_description() {
        let err = DecodeError::new(
            DecodeErrorKind::DataCorrupted,
            vec![key("items"), PathSegment::Index(2)],
            "expected value",
        );
        assert_eq!(
            err.debug_description::<api::Widget>(),
            "expected value Path: items.2"
        );
    }

    #[test]
    fn key_not_found_description_at_root() {
        let err = DecodeError::new(
            DecodeErrorKind::KeyNotFound {
                key: "name".to_string(),
            },
            Vec::new(),
            "missing field `name`",
        );
        assert_eq!(
            err.debug_description::<api::Widget>(),
            "Value required for 'Widget.name' but it was missing."
        );
    }

    #[test]
    fn type_mismatch_description() {
        let err = DecodeError::new(
            DecodeErrorKind::TypeMismatch {
                expected: "u64".to_string(),
            },
            vec![key("id")],
            "invalid type: string \"x\", expected u64",
        );
        assert_eq!(
            err.debug_description::<api::Widget>(),
            "Type mismatch: u64 required for key [id]."
        );
    }

    #[test]
    fn value_not_found_description() {
        let err = DecodeError::new(
            DecodeErrorKind::ValueNotFound {
                expected: "a string".to_string(),
            },
            vec![key("owner"), key("name")],
            "invalid type: null, expected a string",
        );
        assert_eq!(
            err.debug_description::<api::Widget>(),
            "Value Required: a string required for key [owner.name]."
        );
    }

    #[test]
    fn generic_type_names_are_shortened_before_generics() {
        assert_eq!(short_type_name::<api::Page<u64>>(), "Page<u64>");
    }

    #[test]
    fn tuple_and_slice_type_names_are_kept_whole() {
        let tuple = short_type_name::<(api::Widget, u64)>();
        assert!(tuple.starts_with('('), "{tuple}");
        assert!(tuple.ends_with("Widget, u64)"), "{tuple}");

        let slice = short_type_name::<[api::Widget]>();
        assert!(slice.starts_with('['), "{slice}");
        assert!(slice.ends_with("Widget]"), "{slice}");
    }

    #[test]
    fn display_includes_path() {
        let err = DecodeError::new(DecodeErrorKind::DataCorrupted, vec![key("user")], "bad");
        assert_eq!(err.to_string(), "bad (at 'user')");
        assert_eq!(DecodeError::data_corrupted("eof").to_string(), "eof");
    }
}
