//! Failure reporting.
//!
//! Two optional sinks fire at the moment a checked call fails:
//!
//! - with the `logging` feature, a `tracing` WARN event carrying the code
//!   name, its raw byte and the [`FailureKind`];
//! - a consumer [`FailureHook`] installed with
//!   [`Diagnostics::with_hook`](crate::Diagnostics::with_hook).
//!
//! Both are no-ops unless enabled.

use crate::code::ErrorCode;

/// Consumer function called with the code of every recorded failure.
///
/// Runs on the failing call's stack, before the enclosing operation
/// returns. Keep it short and non-blocking.
pub type FailureHook<C> = fn(C);

/// What made a checked call fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The operation's own outcome was zero / false.
    Outcome,
    /// Unconditional failure (validation before any fallible call).
    Explicit,
    /// Build-time forced site.
    Forced,
    /// Runtime trigger matched the call's code.
    Injected,
}

impl FailureKind {
    /// Short lowercase label for logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Outcome => "outcome",
            Self::Explicit => "explicit",
            Self::Forced => "forced",
            Self::Injected => "injected",
        }
    }

    /// True when the failure was produced by fault injection.
    pub const fn is_injected(self) -> bool {
        matches!(self, Self::Forced | Self::Injected)
    }
}

#[inline]
pub(crate) fn report<C: ErrorCode>(code: C, kind: FailureKind, hook: Option<FailureHook<C>>) {
    #[cfg(feature = "logging")]
    tracing::warn!(
        code = code.name(),
        raw = code.to_raw(),
        kind = kind.as_str(),
        "checked call failed"
    );
    #[cfg(not(feature = "logging"))]
    let _ = kind;

    if let Some(hook) = hook {
        hook(code);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::error_codes! {
        /// Codes used by the unit tests.
        pub struct HookError {
            /// I2C bus.
            const I2C = 1;
            /// SPI bus.
            const SPI = 2;
        }
    }

    #[test]
    fn kind_labels() {
        assert_eq!(FailureKind::Outcome.as_str(), "outcome");
        assert_eq!(FailureKind::Injected.as_str(), "injected");
    }

    #[test]
    fn hook_called_with_code() {
        use std::sync::atomic::{AtomicU8, Ordering};

        static LAST: AtomicU8 = AtomicU8::new(0);
        fn remember(code: HookError) {
            LAST.store(code.to_raw(), Ordering::SeqCst);
        }

        report(HookError::SPI, FailureKind::Outcome, Some(remember));
        assert_eq!(LAST.load(Ordering::SeqCst), 2);
        report(HookError::I2C, FailureKind::Forced, None);
        assert_eq!(LAST.load(Ordering::SeqCst), 2);
    }

    #[cfg(feature = "logging")]
    mod logging {
        use super::*;
        use std::collections::BTreeMap;
        use std::fmt;
        use std::sync::{Arc, Mutex};
        use tracing::field::{Field, Visit};
        use tracing::{Event, Subscriber};
        use tracing_subscriber::layer::{Context, SubscriberExt};
        use tracing_subscriber::{Layer, Registry};

        type Captured = Arc<Mutex<Vec<BTreeMap<&'static str, String>>>>;

        /// Collects every event's fields as strings.
        struct Capture(Captured);

        struct Fields(BTreeMap<&'static str, String>);

        impl Visit for Fields {
            fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
                self.0.insert(field.name(), format!("{value:?}"));
            }

            fn record_str(&mut self, field: &Field, value: &str) {
                self.0.insert(field.name(), value.to_string());
            }

            fn record_u64(&mut self, field: &Field, value: u64) {
                self.0.insert(field.name(), value.to_string());
            }
        }

        impl<S: Subscriber> Layer<S> for Capture {
            fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
                let mut fields = Fields(BTreeMap::new());
                event.record(&mut fields);
                fields
                    .0
                    .insert("level", event.metadata().level().to_string());
                self.0.lock().unwrap().push(fields.0);
            }
        }

        #[test]
        fn failure_emits_warn_event() {
            let captured = Captured::default();
            let subscriber = Registry::default().with(Capture(Arc::clone(&captured)));

            tracing::subscriber::with_default(subscriber, || {
                report(HookError::SPI, FailureKind::Injected, None);
            });

            let events = captured.lock().unwrap();
            assert_eq!(events.len(), 1);
            let event = &events[0];
            assert_eq!(event["level"], "WARN");
            assert_eq!(event["message"], "checked call failed");
            assert_eq!(event["code"], "SPI");
            assert_eq!(event["raw"], "2");
            assert_eq!(event["kind"], "injected");
        }

        #[test]
        fn diagnostics_failure_is_logged_once() {
            let captured = Captured::default();
            let subscriber = Registry::default().with(Capture(Arc::clone(&captured)));
            let diag = crate::Diagnostics::new();

            tracing::subscriber::with_default(subscriber, || {
                let _ = diag.check(true, HookError::I2C);
                let _ = diag.check(0u16, HookError::I2C);
            });

            let events = captured.lock().unwrap();
            assert_eq!(events.len(), 1);
            assert_eq!(events[0]["code"], "I2C");
            assert_eq!(events[0]["kind"], "outcome");
        }
    }

    #[test]
    fn injected_kinds() {
        assert!(FailureKind::Forced.is_injected());
        assert!(FailureKind::Injected.is_injected());
        assert!(!FailureKind::Outcome.is_injected());
        assert!(!FailureKind::Explicit.is_injected());
    }
}
