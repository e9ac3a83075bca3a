//! Runtime fault injection.
//!
//! An [`InjectionTrigger`] holds at most one armed code. The next checked
//! call carrying that code fails regardless of its real outcome, and the
//! trigger disarms itself in the same step. Calls with other codes are not
//! affected and leave the trigger armed.
//!
//! The trigger is meant to be written by something outside normal program
//! flow (a controller thread, a test harness, a debugger poking the byte)
//! while checked calls run. The only transition the protocol performs is
//! armed → consumed, done with a compare-and-exchange so one arm fires at
//! most once even when several contexts race for it.

use crate::code::ErrorCode;
use errcheck_common::consts::NO_ERROR_RAW;
use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU8, Ordering};

/// Externally writable "fail the next call with this code" register.
pub struct InjectionTrigger<C> {
    raw: AtomicU8,
    _code: PhantomData<fn() -> C>,
}

impl<C: ErrorCode> InjectionTrigger<C> {
    /// A disarmed trigger.
    pub const fn new() -> Self {
        Self {
            raw: AtomicU8::new(NO_ERROR_RAW),
            _code: PhantomData,
        }
    }

    /// Arm the trigger for `code`, replacing any pending arm.
    ///
    /// Arming `NONE` disarms.
    #[inline]
    pub fn arm(&self, code: C) {
        self.raw.store(code.to_raw(), Ordering::Release);
    }

    /// Arm from a raw byte, as received from a serial console or debugger
    /// bridge. Bytes outside the code set are rejected and leave the
    /// trigger untouched.
    pub fn arm_raw(&self, raw: u8) -> Option<C> {
        let code = C::from_raw(raw)?;
        self.arm(code);
        Some(code)
    }

    /// Cancel any pending arm.
    #[inline]
    pub fn disarm(&self) {
        self.raw.store(NO_ERROR_RAW, Ordering::Release);
    }

    /// The armed code, if any.
    #[inline]
    pub fn pending(&self) -> Option<C> {
        match self.raw.load(Ordering::Acquire) {
            NO_ERROR_RAW => None,
            raw => C::from_raw(raw),
        }
    }

    /// Returns true while a code is armed.
    #[inline]
    pub fn is_armed(&self) -> bool {
        self.pending().is_some()
    }

    /// Consume the arm if it matches `code`.
    ///
    /// Returns true exactly when this call disarmed the trigger. `NONE`
    /// never matches.
    #[inline]
    pub fn consume(&self, code: C) -> bool {
        let raw = code.to_raw();
        if raw == NO_ERROR_RAW || self.raw.load(Ordering::Relaxed) != raw {
            return false;
        }
        self.raw
            .compare_exchange(raw, NO_ERROR_RAW, Ordering::AcqRel, Ordering::Relaxed)
            .is_ok()
    }
}

impl<C: ErrorCode> Default for InjectionTrigger<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ErrorCode> fmt::Debug for InjectionTrigger<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InjectionTrigger")
            .field("pending", &self.pending())
            .finish()
    }
}
