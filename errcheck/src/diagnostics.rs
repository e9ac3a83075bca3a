//! The checked-call protocol.
//!
//! [`Diagnostics`] bundles the state one execution context needs: the
//! last-error slot, the error group, the sentinel byte, the optional
//! failure hook and, with `runtime-injection`, the injection trigger.
//!
//! ## Protocol
//!
//! For every checked call:
//! 1. The outcome is evaluated exactly once (it is an argument).
//! 2. On failure the code is stored in the last-error slot, the failure is
//!    reported, and [`Failure`] is returned. `?` exits the enclosing
//!    operation; nothing after it runs.
//! 3. On success the payload is returned and no slot is written.
//!
//! The slot is never cleared on success. After an operation returns
//! [`Failure`] it holds that failure's cause; otherwise it holds whatever
//! the last failure left there. [`Diagnostics::clear`] resets it explicitly.
//!
//! ## Placement
//!
//! `new` is `const`. Pass a `Diagnostics` by reference as an explicit
//! context, or put one in a `static` for parity with bare-metal targets.
//! A shared instance assumes a single writer per failure sequence; two
//! contexts failing concurrently will overwrite each other's cause.

use crate::code::ErrorCode;
use crate::failure::{Checked, Failure};
use crate::hook::{self, FailureHook, FailureKind};
#[cfg(feature = "runtime-injection")]
use crate::inject::InjectionTrigger;
use crate::outcome::Outcome;
use crate::slot::CodeCell;
use errcheck_common::consts::{FAILURE_SENTINEL, NO_ERROR_RAW};

/// Per-context diagnostic state and the checked-call operations.
#[derive(Debug)]
pub struct Diagnostics<C: ErrorCode> {
    last_error: CodeCell<C>,
    group: CodeCell<C>,
    #[cfg(feature = "runtime-injection")]
    trigger: InjectionTrigger<C>,
    sentinel: u8,
    hook: Option<FailureHook<C>>,
}

impl<C: ErrorCode> Diagnostics<C> {
    /// Fresh state: no error, no group, default sentinel, no hook.
    pub const fn new() -> Self {
        Self {
            last_error: CodeCell::new(),
            group: CodeCell::new(),
            #[cfg(feature = "runtime-injection")]
            trigger: InjectionTrigger::new(),
            sentinel: FAILURE_SENTINEL,
            hook: None,
        }
    }

    /// Override the sentinel byte carried by every [`Failure`].
    ///
    /// # Panics
    ///
    /// Panics if `sentinel` is the "no error" byte (at compile time when
    /// used in a `const` or `static` initializer).
    pub const fn with_sentinel(self, sentinel: u8) -> Self {
        assert!(
            sentinel != NO_ERROR_RAW,
            "failure sentinel must differ from the no-error byte"
        );
        Self { sentinel, ..self }
    }

    /// Install a hook called with the code of every recorded failure.
    pub const fn with_hook(self, hook: FailureHook<C>) -> Self {
        Self {
            hook: Some(hook),
            ..self
        }
    }

    // ─── Checked Calls ──────────────────────────────────────────────

    /// Check an outcome, attributing failure to `code`.
    ///
    /// ```rust
    /// # use errcheck::{error_codes, Checked, Diagnostics};
    /// # error_codes! { pub struct E { const SENSOR = 1; } }
    /// fn read_sensor() -> Option<u16> { Some(512) }
    ///
    /// fn sample(diag: &Diagnostics<E>) -> Checked<u16> {
    ///     let raw = diag.check(read_sensor(), E::SENSOR)?;
    ///     Ok(raw / 2)
    /// }
    /// # assert_eq!(sample(&Diagnostics::new()), Ok(256));
    /// ```
    ///
    /// With `runtime-injection`, a trigger armed for `code` forces the
    /// failure branch and is consumed. The outcome has already been
    /// produced by then, so the real operation's side effects happen.
    #[inline]
    pub fn check<O: Outcome>(&self, outcome: O, code: C) -> Checked<O::Value> {
        let value = outcome.into_value();

        #[cfg(feature = "runtime-injection")]
        if self.trigger.consume(code) {
            return Err(self.record(code, FailureKind::Injected));
        }

        match value {
            Some(value) => Ok(value),
            None => Err(self.record(code, FailureKind::Outcome)),
        }
    }

    /// Check an outcome, attributing failure to the current error group.
    ///
    /// Set the group with [`set_group`](Self::set_group) before the run of
    /// grouped calls, and again before switching to another run. With no
    /// group set, a failure still exits but records `NONE`.
    #[inline]
    pub fn check_same<O: Outcome>(&self, outcome: O) -> Checked<O::Value> {
        self.check(outcome, self.group.load())
    }

    /// Fail unconditionally with `code`.
    ///
    /// For validation that precedes any fallible call:
    /// `if !in_range { return diag.fail(E::POWER); }`.
    #[inline]
    pub fn fail<T>(&self, code: C) -> Checked<T> {
        Err(self.record(code, FailureKind::Explicit))
    }

    /// Checked call with build-time fault injection.
    ///
    /// When `FORCED` is true, `call` is never executed and the site fails
    /// with `code`. When false this is exactly `check(call(), code)`.
    /// `FORCED` is a constant, so the unused branch is compiled out.
    ///
    /// ```rust
    /// # use errcheck::{error_codes, Checked, Diagnostics};
    /// # error_codes! { pub struct E { const SENSOR = 1; } }
    /// const INJECT_SENSOR: bool = cfg!(feature = "inject-sensor");
    ///
    /// fn calibrate_imu() -> bool { true }
    ///
    /// fn init(diag: &Diagnostics<E>) -> Checked {
    ///     diag.check_forced::<{ INJECT_SENSOR }, _>(calibrate_imu, E::SENSOR)?;
    ///     Ok(())
    /// }
    /// # assert!(init(&Diagnostics::new()).is_ok());
    /// ```
    #[inline]
    pub fn check_forced<const FORCED: bool, O: Outcome>(
        &self,
        call: impl FnOnce() -> O,
        code: C,
    ) -> Checked<O::Value> {
        if FORCED {
            return Err(self.record(code, FailureKind::Forced));
        }
        self.check(call(), code)
    }

    // ─── Diagnostic State ───────────────────────────────────────────

    /// Cause of the most recent failure (`NONE` if none recorded yet).
    #[inline]
    pub fn last_error(&self) -> C {
        self.last_error.load()
    }

    /// Reset the last-error slot to `NONE`.
    #[inline]
    pub fn clear(&self) {
        self.last_error.clear();
    }

    /// Set the code used by [`check_same`](Self::check_same).
    #[inline]
    pub fn set_group(&self, code: C) {
        self.group.store(code);
    }

    /// Current error group.
    #[inline]
    pub fn group(&self) -> C {
        self.group.load()
    }

    /// Sentinel byte carried by this context's failures.
    #[inline]
    pub const fn sentinel(&self) -> u8 {
        self.sentinel
    }

    /// The runtime injection trigger, for an external controller.
    #[cfg(feature = "runtime-injection")]
    #[inline]
    pub fn trigger(&self) -> &InjectionTrigger<C> {
        &self.trigger
    }

    #[cold]
    fn record(&self, code: C, kind: FailureKind) -> Failure {
        self.last_error.store(code);
        hook::report(code, kind, self.hook);
        Failure::new(self.sentinel)
    }
}

impl<C: ErrorCode> Default for Diagnostics<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::failure::StatusByte;
    use std::cell::Cell;
    use std::sync::atomic::{AtomicU32, Ordering};

    crate::error_codes! {
        /// Codes used by the unit tests.
        pub struct InitError {
            /// Power regulator.
            const POWER = 1;
            /// Sensor bring-up.
            const SENSOR = 2;
            /// Radio module.
            const RADIO = 3;
            /// I2C bus.
            const I2C = 4;
        }
    }

    /// Records every evaluated step, in order.
    struct Steps {
        trace: Cell<[u8; 8]>,
        len: Cell<usize>,
    }

    impl Steps {
        fn new() -> Self {
            Self {
                trace: Cell::new([0; 8]),
                len: Cell::new(0),
            }
        }

        fn run(&self, id: u8, ok: bool) -> bool {
            let mut trace = self.trace.get();
            trace[self.len.get()] = id;
            self.trace.set(trace);
            self.len.set(self.len.get() + 1);
            ok
        }

        fn evaluated(&self) -> Vec<u8> {
            self.trace.get()[..self.len.get()].to_vec()
        }
    }

    #[test]
    fn failure_records_code_and_returns_sentinel() {
        let diag = Diagnostics::new();
        let result = diag.check(false, InitError::SENSOR);
        assert_eq!(result, Err(Failure::default()));
        assert_eq!(diag.last_error(), InitError::SENSOR);
        assert_eq!(result.status_byte(), 0xFF);
    }

    #[test]
    fn success_leaves_slot_untouched() {
        let diag = Diagnostics::new();
        assert_eq!(diag.check(true, InitError::POWER), Ok(()));
        assert_eq!(diag.last_error(), InitError::NONE);

        let _ = diag.check(0u8, InitError::RADIO);
        assert_eq!(diag.check(7u8, InitError::POWER), Ok(7));
        // Not cleared by the later success.
        assert_eq!(diag.last_error(), InitError::RADIO);
    }

    #[test]
    fn first_failure_wins() {
        let diag = Diagnostics::new();
        let steps = Steps::new();

        let sequence = || -> Checked {
            diag.check(steps.run(1, true), InitError::POWER)?;
            diag.check(steps.run(2, false), InitError::SENSOR)?;
            diag.check(steps.run(3, false), InitError::RADIO)?;
            Ok(())
        };

        assert!(sequence().is_err());
        assert_eq!(steps.evaluated(), vec![1, 2]);
        assert_eq!(diag.last_error(), InitError::SENSOR);
    }

    #[test]
    fn grouped_calls_share_cause() {
        let diag = Diagnostics::new();
        let steps = Steps::new();
        diag.set_group(InitError::I2C);

        let sequence = || -> Checked {
            diag.check_same(steps.run(1, true))?;
            diag.check_same(steps.run(2, false))?;
            diag.check_same(steps.run(3, true))?;
            Ok(())
        };

        assert!(sequence().is_err());
        assert_eq!(steps.evaluated(), vec![1, 2]);
        assert_eq!(diag.last_error(), InitError::I2C);
        assert_eq!(diag.group(), InitError::I2C);
    }

    #[test]
    fn switching_group_between_runs() {
        let diag = Diagnostics::new();

        diag.set_group(InitError::I2C);
        assert_eq!(diag.check_same(true), Ok(()));
        assert!(diag.check_same(false).is_err());
        assert_eq!(diag.last_error(), InitError::I2C);

        diag.set_group(InitError::RADIO);
        assert_eq!(diag.check_same(3u8), Ok(3));
        assert!(diag.check_same(0u8).is_err());
        assert_eq!(diag.last_error(), InitError::RADIO);
        assert_eq!(diag.group(), InitError::RADIO);
    }

    #[test]
    fn ungrouped_check_same() {
        let diag = Diagnostics::<InitError>::new();
        assert_eq!(diag.group(), InitError::NONE);

        assert_eq!(diag.check_same(true), Ok(()));
        assert_eq!(diag.last_error(), InitError::NONE);

        let _ = diag.check(false, InitError::POWER);
        let result = diag.check_same(false);
        assert_eq!(result.status_byte(), 0xFF);
        assert_eq!(diag.last_error(), InitError::NONE);
    }

    #[test]
    fn explicit_fail_always_exits() {
        let diag = Diagnostics::new();
        let validate = |millivolts: u16| -> Checked<u16> {
            if !(3_000..=3_600).contains(&millivolts) {
                return diag.fail(InitError::POWER);
            }
            Ok(millivolts)
        };

        assert_eq!(validate(3_300), Ok(3_300));
        assert!(validate(5_000).is_err());
        assert_eq!(diag.last_error(), InitError::POWER);
    }

    #[test]
    fn forced_site_skips_call() {
        let diag = Diagnostics::new();
        let steps = Steps::new();

        let result = diag.check_forced::<true, _>(|| steps.run(1, true), InitError::SENSOR);
        assert!(result.is_err());
        assert!(steps.evaluated().is_empty());
        assert_eq!(diag.last_error(), InitError::SENSOR);
    }

    #[test]
    fn unforced_site_matches_check() {
        let diag = Diagnostics::new();
        let steps = Steps::new();

        assert_eq!(
            diag.check_forced::<false, _>(|| steps.run(1, true), InitError::SENSOR),
            Ok(())
        );
        assert!(
            diag.check_forced::<false, _>(|| steps.run(2, false), InitError::RADIO)
                .is_err()
        );
        assert_eq!(steps.evaluated(), vec![1, 2]);
        assert_eq!(diag.last_error(), InitError::RADIO);
    }

    #[test]
    fn custom_sentinel() {
        let diag = Diagnostics::<InitError>::new().with_sentinel(0xA5);
        let result = diag.fail::<()>(InitError::RADIO);
        assert_eq!(result.unwrap_err().sentinel(), 0xA5);
        assert_eq!(diag.sentinel(), 0xA5);
    }

    #[test]
    #[should_panic(expected = "failure sentinel must differ")]
    fn zero_sentinel_rejected() {
        let _ = Diagnostics::<InitError>::new().with_sentinel(0);
    }

    static HOOK_CALLS: AtomicU32 = AtomicU32::new(0);
    static HOOK_LAST: AtomicU32 = AtomicU32::new(0);

    fn count_failure(code: InitError) {
        HOOK_CALLS.fetch_add(1, Ordering::SeqCst);
        HOOK_LAST.store(u32::from(code.to_raw()), Ordering::SeqCst);
    }

    #[test]
    fn hook_sees_every_failure() {
        let diag = Diagnostics::new().with_hook(count_failure);
        let _ = diag.check(true, InitError::POWER);
        let _ = diag.check(false, InitError::SENSOR);
        let _ = diag.fail::<()>(InitError::RADIO);

        assert_eq!(HOOK_CALLS.load(Ordering::SeqCst), 2);
        assert_eq!(HOOK_LAST.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn clear_resets_slot() {
        let diag = Diagnostics::new();
        let _ = diag.check(false, InitError::POWER);
        diag.clear();
        assert_eq!(diag.last_error(), InitError::NONE);
    }

    #[cfg(feature = "runtime-injection")]
    #[test]
    fn armed_trigger_forces_one_failure() {
        let diag = Diagnostics::new();
        let steps = Steps::new();
        diag.trigger().arm(InitError::RADIO);

        assert!(diag.check(steps.run(1, true), InitError::RADIO).is_err());
        assert_eq!(diag.last_error(), InitError::RADIO);
        assert!(!diag.trigger().is_armed());

        assert_eq!(diag.check(steps.run(2, true), InitError::RADIO), Ok(()));
        // The real call ran both times.
        assert_eq!(steps.evaluated(), vec![1, 2]);
    }

    #[cfg(feature = "runtime-injection")]
    #[test]
    fn trigger_ignores_other_codes() {
        let diag = Diagnostics::new();
        diag.trigger().arm(InitError::RADIO);

        assert_eq!(diag.check(true, InitError::POWER), Ok(()));
        // A real failure elsewhere does not consume the arm.
        assert!(diag.check(false, InitError::SENSOR).is_err());
        assert_eq!(diag.trigger().pending(), Some(InitError::RADIO));
    }
}
