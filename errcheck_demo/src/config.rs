//! Demo binary configuration.
//!
//! # TOML Example
//!
//! ```toml
//! [shared]
//! log_level = "info"
//! service_name = "errcheck-demo"
//!
//! [demo]
//! sentinel = 255
//! cycles = 10
//! cycle_period_ms = 100
//! supply_mv = 3300
//! faulty = ["radio"]
//!
//! [[demo.schedule]]
//! cycle = 3
//! code = "radio"
//! ```
//!
//! Every table and field is optional; missing values take the defaults.

use crate::codes::{InitError, parse_code};
use crate::hardware::{Board, NOMINAL_SUPPLY_MV};
use errcheck_common::consts::{DEFAULT_CYCLE_PERIOD_MS, DEFAULT_CYCLES};
use errcheck_common::prelude::*;
use serde::Deserialize;

/// Full configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DemoConfig {
    /// Common fields.
    #[serde(default)]
    pub shared: SharedConfig,

    /// Demo-specific fields.
    #[serde(default)]
    pub demo: DemoSection,
}

/// The `[demo]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemoSection {
    /// Byte carried by every failure.
    pub sentinel: u8,
    /// Length of the periodic radio loop.
    pub cycles: u64,
    /// Sleep between radio loop cycles, in milliseconds.
    pub cycle_period_ms: u64,
    /// Simulated supply voltage in millivolts.
    pub supply_mv: u16,
    /// Peripherals whose real bring-up fails.
    pub faulty: Vec<String>,
    /// Runtime injections armed at given radio loop cycles.
    pub schedule: heapless::Vec<ScheduledFault, MAX_SCHEDULED_FAULTS>,
}

impl Default for DemoSection {
    fn default() -> Self {
        Self {
            sentinel: FAILURE_SENTINEL,
            cycles: DEFAULT_CYCLES,
            cycle_period_ms: DEFAULT_CYCLE_PERIOD_MS,
            supply_mv: NOMINAL_SUPPLY_MV,
            faulty: Vec::new(),
            schedule: heapless::Vec::new(),
        }
    }
}

/// One `[[demo.schedule]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScheduledFault {
    /// Radio loop cycle at which the trigger is armed.
    pub cycle: u64,
    /// Code to arm, by name or raw value.
    pub code: String,
}

impl ScheduledFault {
    /// Resolve the configured code.
    ///
    /// # Errors
    ///
    /// `ConfigError::ValidationError` for unknown codes and for `NONE`,
    /// which would never fire.
    pub fn resolve(&self) -> Result<InitError, ConfigError> {
        match parse_code(&self.code) {
            Some(code) if code != InitError::NONE => Ok(code),
            _ => Err(ConfigError::ValidationError(format!(
                "schedule entry at cycle {}: unknown error code '{}'",
                self.cycle, self.code
            ))),
        }
    }
}

impl DemoConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if:
    /// - the `[shared]` table is invalid
    /// - `sentinel` is the no-error byte
    /// - `faulty` names an unknown peripheral
    /// - a schedule entry names an unknown code
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;

        let demo = &self.demo;
        if demo.sentinel == NO_ERROR_RAW {
            return Err(ConfigError::ValidationError(
                "sentinel must not be 0".to_string(),
            ));
        }
        for name in &demo.faulty {
            if !Board::PERIPHERALS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(name))
            {
                return Err(ConfigError::ValidationError(format!(
                    "unknown peripheral '{name}' in faulty"
                )));
            }
        }
        for entry in demo.schedule.iter() {
            entry.resolve()?;
        }
        Ok(())
    }
}
