//! Runtime injection controllers.
//!
//! Both controllers only ever write the injection trigger; the checked
//! calls consume it.
//!
//! - [`InjectionSchedule`] arms codes at fixed loop cycles, from
//!   configuration. Deterministic, used by tests and unattended runs.
//! - [`spawn_console_controller`] arms codes typed on a line-oriented input
//!   (stdin in the binary) while the loop keeps running.

use crate::codes::{InitError, parse_code};
use crate::config::ScheduledFault;
use errcheck::{Diagnostics, ErrorCode, InjectionTrigger};
use errcheck_common::config::ConfigError;
use errcheck_common::consts::MAX_SCHEDULED_FAULTS;
use std::io::BufRead;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{info, warn};

/// Codes to arm at given cycles, sorted by cycle.
#[derive(Debug, Clone, Default)]
pub struct InjectionSchedule {
    entries: heapless::Vec<(u64, InitError), MAX_SCHEDULED_FAULTS>,
    next: usize,
}

impl InjectionSchedule {
    /// Build from configuration entries.
    ///
    /// # Errors
    ///
    /// `ConfigError::ValidationError` if an entry names an unknown code.
    pub fn from_config(faults: &[ScheduledFault]) -> Result<Self, ConfigError> {
        let mut entries = heapless::Vec::new();
        for fault in faults {
            let code = fault.resolve()?;
            entries.push((fault.cycle, code)).map_err(|_| {
                ConfigError::ValidationError(format!(
                    "schedule holds at most {MAX_SCHEDULED_FAULTS} entries"
                ))
            })?;
        }
        entries.sort_unstable_by_key(|(cycle, _)| *cycle);
        Ok(Self { entries, next: 0 })
    }

    /// Number of entries not yet armed.
    pub fn remaining(&self) -> usize {
        self.entries.len() - self.next
    }

    /// Arm every entry due at or before `cycle`.
    ///
    /// The trigger holds one code, so when several entries fall due at once
    /// the last one wins. Returns the code left armed, if any was due.
    pub fn arm_due(
        &mut self,
        cycle: u64,
        trigger: &InjectionTrigger<InitError>,
    ) -> Option<InitError> {
        let mut armed = None;
        while let Some(&(due, code)) = self.entries.get(self.next) {
            if due > cycle {
                break;
            }
            trigger.arm(code);
            info!(cycle, code = code.name(), "scheduled injection armed");
            armed = Some(code);
            self.next += 1;
        }
        armed
    }
}

/// Spawn a thread that arms the trigger from `input`, one code per line.
///
/// Accepts names (`radio`) or raw bytes (`3`); `off` disarms. The thread
/// ends at end of input or on `quit`.
pub fn spawn_console_controller<R>(diag: Arc<Diagnostics<InitError>>, input: R) -> JoinHandle<()>
where
    R: BufRead + Send + 'static,
{
    thread::spawn(move || {
        for line in input.lines() {
            let Ok(line) = line else { break };
            let command = line.trim();
            match command {
                "" => continue,
                "quit" => break,
                "off" => {
                    diag.trigger().disarm();
                    info!("injection disarmed");
                }
                _ => match command.parse::<u8>() {
                    Ok(raw) => match diag.trigger().arm_raw(raw) {
                        Some(code) => info!(code = code.name(), "injection armed"),
                        None => warn!(raw, "ignoring unknown raw code"),
                    },
                    Err(_) => match parse_code(command) {
                        Some(code) => {
                            diag.trigger().arm(code);
                            info!(code = code.name(), "injection armed");
                        }
                        None => warn!(command, "ignoring unknown code"),
                    },
                },
            }
        }
    })
}
