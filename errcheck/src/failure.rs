//! The uniform failure signal.
//!
//! [`Failure`] says "an error occurred"; which one is in the diagnostic
//! slot. It carries nothing else.

use errcheck_common::consts::{FAILURE_SENTINEL, NO_ERROR_RAW};
use static_assertions::assert_eq_size;
use thiserror::Error;

/// Result of an operation built from checked calls.
pub type Checked<T = ()> = Result<T, Failure>;

/// Returned by any operation whose checked call failed.
///
/// Holds only the sentinel byte configured on the originating
/// [`Diagnostics`](crate::Diagnostics).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[error("checked call failed (sentinel {sentinel:#04x})")]
pub struct Failure {
    sentinel: u8,
}

assert_eq_size!(Failure, u8);

impl Failure {
    pub(crate) const fn new(sentinel: u8) -> Self {
        Self { sentinel }
    }

    /// The sentinel byte, for callers that report status as a raw byte.
    #[inline]
    pub const fn sentinel(self) -> u8 {
        self.sentinel
    }
}

impl Default for Failure {
    fn default() -> Self {
        Self::new(FAILURE_SENTINEL)
    }
}

/// Collapse a checked result into the classic status byte.
///
/// Success maps to the "no error" byte, failure to the sentinel.
pub trait StatusByte {
    /// The status byte for this result.
    fn status_byte(&self) -> u8;
}

impl<T> StatusByte for Checked<T> {
    #[inline]
    fn status_byte(&self) -> u8 {
        match self {
            Ok(_) => NO_ERROR_RAW,
            Err(failure) => failure.sentinel(),
        }
    }
}
