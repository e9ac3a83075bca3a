//! # errcheck
//!
//! Fail-fast checked calls for control software bring-up and operation.
//! Each fallible step collapses into one line: on failure the cause is
//! recorded in a diagnostic slot and the enclosing operation returns
//! immediately with a uniform [`Failure`].
//!
//! ```rust
//! use errcheck::{error_codes, Checked, Diagnostics, ErrorCode};
//!
//! error_codes! {
//!     /// Bring-up failure causes.
//!     pub struct InitError {
//!         /// Power regulator failed.
//!         const POWER = 1;
//!         /// Sensor initialization failed.
//!         const SENSOR = 2;
//!         /// Radio module failed.
//!         const RADIO = 3;
//!     }
//! }
//!
//! static DIAG: Diagnostics<InitError> = Diagnostics::new();
//!
//! fn init_power() -> bool { true }
//! fn init_sensor() -> bool { true }
//! fn init_radio() -> bool { false }
//!
//! fn device_init() -> Checked {
//!     DIAG.check(init_power(), InitError::POWER)?;
//!     DIAG.check(init_sensor(), InitError::SENSOR)?;
//!     DIAG.check(init_radio(), InitError::RADIO)?;
//!     Ok(())
//! }
//!
//! assert!(device_init().is_err());
//! assert_eq!(DIAG.last_error(), InitError::RADIO);
//! ```
//!
//! ## Components
//!
//! 1. [`code`] - consumer-defined [`ErrorCode`] sets
//! 2. [`slot`] - atomic [`CodeCell`] registers (last error, error group)
//! 3. [`diagnostics`] - the checked-call protocol on [`Diagnostics`]
//! 4. [`inject`] - runtime [`InjectionTrigger`] (feature `runtime-injection`)
//! 5. [`hook`] - failure reporting (feature `logging`, consumer hook)
//!
//! Build-time injection is [`Diagnostics::check_forced`], driven by a
//! `const bool` the consumer derives from its own Cargo features.
//!
//! ## Concurrency
//!
//! Nothing here blocks or allocates. Slots are single atomic bytes with
//! last-write-wins semantics; attributing concurrent failures correctly
//! requires one [`Diagnostics`] per execution context.

#![deny(missing_docs)]

pub mod code;
pub mod diagnostics;
pub mod failure;
pub mod hook;
#[cfg(feature = "runtime-injection")]
pub mod inject;
pub mod outcome;
pub mod slot;

pub use crate::code::ErrorCode;
pub use crate::diagnostics::Diagnostics;
pub use crate::failure::{Checked, Failure, StatusByte};
pub use crate::hook::{FailureHook, FailureKind};
#[cfg(feature = "runtime-injection")]
pub use crate::inject::InjectionTrigger;
pub use crate::outcome::Outcome;
pub use crate::slot::CodeCell;

#[doc(hidden)]
pub use errcheck_common::consts::NO_ERROR_RAW as __NO_ERROR_RAW;
