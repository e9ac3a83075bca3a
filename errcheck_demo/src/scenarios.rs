//! Bring-up sequences written with checked calls.
//!
//! Every function here runs its steps in order and stops at the first
//! failure; the cause is then in `diag.last_error()`.

use crate::codes::{InitError, describe};
use crate::controller::InjectionSchedule;
use crate::hardware::Board;
use crate::sites::{FORCE_I2C, FORCE_POWER, FORCE_RADIO, FORCE_SENSOR, FORCE_SPI, FORCE_UART};
use errcheck::{Checked, Diagnostics, ErrorCode, StatusByte};
use errcheck_common::consts::NO_ERROR_RAW;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Scenario selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Scenario {
    /// Power, IMU and radio bring-up.
    Basic,
    /// I2C, SPI and UART bring-up with a grouped I2C transaction.
    Bus,
    /// IMU calibration sample.
    Imu,
    /// Periodic radio loop with recovery.
    Radio,
    /// Everything above, in order.
    All,
}

impl Scenario {
    /// Scenarios run for this selection.
    pub fn expand(self) -> &'static [Scenario] {
        match self {
            Self::Basic => &[Self::Basic],
            Self::Bus => &[Self::Bus],
            Self::Imu => &[Self::Imu],
            Self::Radio => &[Self::Radio],
            Self::All => &[Self::Basic, Self::Bus, Self::Imu, Self::Radio],
        }
    }

    /// Lowercase name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Bus => "bus",
            Self::Imu => "imu",
            Self::Radio => "radio",
            Self::All => "all",
        }
    }
}

/// Power, IMU and radio bring-up.
///
/// Fails with `POWER` before touching any peripheral when the supply is
/// out of range.
pub fn device_init(board: &mut Board, diag: &Diagnostics<InitError>) -> Checked {
    if !board.supply_in_range() {
        warn!(supply_mv = board.supply_mv, "supply out of range");
        return diag.fail(InitError::POWER);
    }

    diag.check_forced::<{ FORCE_POWER }, _>(|| board.power.init("regulator"), InitError::POWER)?;
    diag.check_forced::<{ FORCE_SENSOR }, _>(|| board.imu.init("configure"), InitError::SENSOR)?;
    diag.check_forced::<{ FORCE_RADIO }, _>(|| board.radio.init("power-up"), InitError::RADIO)?;

    info!("device initialized");
    Ok(())
}

/// Bus bring-up.
///
/// The I2C register write/read pair shares the `I2C` error group.
pub fn bus_init(board: &mut Board, diag: &Diagnostics<InitError>) -> Checked {
    diag.check_forced::<{ FORCE_I2C }, _>(|| board.i2c.init("probe"), InitError::I2C)?;

    diag.set_group(InitError::I2C);
    diag.check_same(board.i2c.init("write config"))?;
    diag.check_same(board.i2c.init("read back"))?;

    diag.check_forced::<{ FORCE_SPI }, _>(|| board.spi.init("loopback"), InitError::SPI)?;
    diag.check_forced::<{ FORCE_UART }, _>(|| board.uart.init("console"), InitError::UART)?;

    info!("buses initialized");
    Ok(())
}

/// Take one IMU calibration sample.
pub fn imu_calibrate(board: &mut Board, diag: &Diagnostics<InitError>) -> Checked<u16> {
    let sample =
        diag.check_forced::<{ FORCE_SENSOR }, _>(|| board.imu.sample(), InitError::SENSOR)?;
    debug!(sample, "imu calibrated");
    Ok(sample)
}

/// Start the radio and read one link sample.
pub fn radio_link(board: &mut Board, diag: &Diagnostics<InitError>) -> Checked<u16> {
    diag.check(board.radio.init("start"), InitError::RADIO)?;
    diag.check(board.radio.sample(), InitError::TIMEOUT)
}

/// Result of one radio loop cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    /// Cycle index, from 0.
    pub cycle: u64,
    /// Link sample, or the cause of the failure.
    pub outcome: Result<u16, InitError>,
}

/// Run [`radio_link`] for up to `cycles` cycles.
///
/// A failed cycle is logged and the loop carries on with the next one.
/// The slot is cleared before every cycle. Stops early when `running`
/// goes false.
pub fn run_radio_cycles(
    board: &mut Board,
    diag: &Diagnostics<InitError>,
    schedule: &mut InjectionSchedule,
    cycles: u64,
    period: Duration,
    running: &AtomicBool,
) -> Vec<CycleReport> {
    let mut reports = Vec::new();
    for cycle in 0..cycles {
        if !running.load(Ordering::SeqCst) {
            info!(cycle, "radio loop interrupted");
            break;
        }

        schedule.arm_due(cycle, diag.trigger());
        diag.clear();

        let outcome = radio_link(board, diag).map_err(|_| diag.last_error());
        match outcome {
            Ok(sample) => debug!(cycle, sample, "radio cycle ok"),
            Err(code) => warn!(
                cycle,
                code = code.name(),
                "radio cycle failed, retrying next cycle"
            ),
        }
        reports.push(CycleReport { cycle, outcome });

        if !period.is_zero() {
            thread::sleep(period);
        }
    }
    reports
}

/// Summary of one scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScenarioReport {
    /// Which scenario.
    pub scenario: Scenario,
    /// Status byte: 0 on success, the sentinel on failure.
    pub status: u8,
    /// Cause, when failed. For the radio loop, the last failed cycle.
    pub cause: Option<InitError>,
}

impl ScenarioReport {
    fn from_checked<T>(
        scenario: Scenario,
        result: &Checked<T>,
        diag: &Diagnostics<InitError>,
    ) -> Self {
        let cause = result.is_err().then(|| diag.last_error());
        if let Some(code) = cause {
            warn!(
                scenario = scenario.as_str(),
                code = code.name(),
                subsystem = describe(code),
                "scenario failed"
            );
        } else {
            info!(scenario = scenario.as_str(), "scenario passed");
        }
        Self {
            scenario,
            status: result.status_byte(),
            cause,
        }
    }

    /// Whether the scenario succeeded.
    pub fn passed(&self) -> bool {
        self.cause.is_none()
    }
}

/// Parameters of the radio loop.
#[derive(Debug, Clone, Copy)]
pub struct RadioLoop {
    /// Number of cycles.
    pub cycles: u64,
    /// Sleep between cycles.
    pub period: Duration,
}

/// Run `selection` on `board`, clearing the slot before each scenario.
pub fn run_scenarios(
    selection: Scenario,
    board: &mut Board,
    diag: &Diagnostics<InitError>,
    schedule: &mut InjectionSchedule,
    radio: RadioLoop,
    running: &AtomicBool,
) -> Vec<ScenarioReport> {
    let mut reports = Vec::new();
    for &scenario in selection.expand() {
        diag.clear();
        let report = match scenario {
            Scenario::Basic => {
                ScenarioReport::from_checked(scenario, &device_init(board, diag), diag)
            }
            Scenario::Bus => ScenarioReport::from_checked(scenario, &bus_init(board, diag), diag),
            Scenario::Imu => {
                ScenarioReport::from_checked(scenario, &imu_calibrate(board, diag), diag)
            }
            Scenario::Radio | Scenario::All => {
                let cycles = run_radio_cycles(
                    board,
                    diag,
                    schedule,
                    radio.cycles,
                    radio.period,
                    running,
                );
                let cause = cycles.iter().rev().find_map(|c| c.outcome.err());
                info!(
                    cycles = cycles.len(),
                    failed = cycles.iter().filter(|c| c.outcome.is_err()).count(),
                    "radio loop finished"
                );
                ScenarioReport {
                    scenario: Scenario::Radio,
                    status: cause.map_or(NO_ERROR_RAW, |_| diag.sentinel()),
                    cause,
                }
            }
        };
        reports.push(report);
    }
    reports
}
