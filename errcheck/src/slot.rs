//! Single-code registers.
//!
//! A [`CodeCell`] is one atomic byte holding an [`ErrorCode`]. The last-error
//! slot and the error group are both `CodeCell`s. There is no history: each
//! store replaces the previous value.
//!
//! Stores and loads are `Relaxed`. The cell guarantees a torn-free byte and
//! last-write-wins, nothing more; it never orders other memory.

use crate::code::ErrorCode;
use errcheck_common::consts::NO_ERROR_RAW;
use static_assertions::{assert_eq_size, assert_impl_all};
use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU8, Ordering};

/// Atomic register holding one [`ErrorCode`], initially `NONE`.
///
/// `new` is `const`, so a cell can live in a `static`.
pub struct CodeCell<C> {
    raw: AtomicU8,
    _code: PhantomData<fn() -> C>,
}

assert_eq_size!(CodeCell<u8>, u8);
assert_impl_all!(CodeCell<u8>: Send, Sync);

impl<C: ErrorCode> CodeCell<C> {
    /// A cell holding `NONE`.
    pub const fn new() -> Self {
        Self {
            raw: AtomicU8::new(NO_ERROR_RAW),
            _code: PhantomData,
        }
    }

    /// Current code.
    ///
    /// A byte outside the code set (only possible through a foreign writer
    /// such as a debugger) reads as `NONE`.
    #[inline]
    pub fn load(&self) -> C {
        C::from_raw(self.raw.load(Ordering::Relaxed)).unwrap_or(C::NONE)
    }

    /// Replace the current code.
    #[inline]
    pub fn store(&self, code: C) {
        self.raw.store(code.to_raw(), Ordering::Relaxed);
    }

    /// Reset to `NONE`.
    #[inline]
    pub fn clear(&self) {
        self.raw.store(NO_ERROR_RAW, Ordering::Relaxed);
    }

    /// Returns true while the cell holds `NONE`.
    #[inline]
    pub fn is_none(&self) -> bool {
        self.load().is_none()
    }
}

impl<C: ErrorCode> Default for CodeCell<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ErrorCode> fmt::Debug for CodeCell<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CodeCell").field(&self.load()).finish()
    }
}
