//! Status classification.

use std::ops::Range;

/// Status codes considered successful.
pub const SUCCESS_RANGE: Range<u16> = 200..300;

/// Outcome class of an HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusClass {
    /// `200..300`: the body is decoded into the requested shape.
    Success,
    /// Anything else: the call fails with `Error::BadResponse`.
    Failure,
}

impl StatusClass {
    /// Classify a numeric status.
    #[must_use]
    pub fn of(status: u16) -> Self {
        if SUCCESS_RANGE.contains(&status) {
            Self::Success
        } else {
            Self::Failure
        }
    }

    /// Returns `true` for [`StatusClass::Success`].
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}
