//! Workspace-wide constants.
//!
//! Single source of truth for the raw code values and fixed bounds used by
//! the protocol and its consumers.

use static_assertions::const_assert_ne;

/// Raw value of the "no error" code. Every `ErrorCode::NONE` maps to it.
pub const NO_ERROR_RAW: u8 = 0;

/// Default value returned by an operation that failed a checked call.
///
/// Out-of-band with respect to typical code sets, which count up from 1.
pub const FAILURE_SENTINEL: u8 = 0xFF;

/// Maximum number of runtime injections a schedule may hold.
pub const MAX_SCHEDULED_FAULTS: usize = 16;

/// Default period of the periodic bring-up loop in milliseconds.
pub const DEFAULT_CYCLE_PERIOD_MS: u64 = 100;

/// Default number of cycles run by the periodic bring-up loop.
pub const DEFAULT_CYCLES: u64 = 10;

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/errcheck/demo.toml";

// A failing operation must never look like a success status byte.
const_assert_ne!(FAILURE_SENTINEL, NO_ERROR_RAW);
