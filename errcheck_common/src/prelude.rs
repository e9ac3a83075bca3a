//! Prelude module for common re-exports.
//!
//! ```rust
//! use errcheck_common::prelude::*;
//! ```

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, LogLevel, SharedConfig};

// ─── Constants ──────────────────────────────────────────────────────
pub use crate::consts::{FAILURE_SENTINEL, MAX_SCHEDULED_FAULTS, NO_ERROR_RAW};
