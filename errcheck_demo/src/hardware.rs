//! Simulated peripherals.
//!
//! Each peripheral reports its bring-up result the classic way (`1` ok,
//! `0` failed) and counts how often it was driven, so callers can see
//! which steps a checked sequence actually evaluated.

use crate::config::DemoSection;
use std::ops::RangeInclusive;
use tracing::debug;

/// Accepted supply voltage window in millivolts.
pub const SUPPLY_RANGE_MV: RangeInclusive<u16> = 3_000..=3_600;

/// Nominal supply voltage in millivolts.
pub const NOMINAL_SUPPLY_MV: u16 = 3_300;

/// One simulated peripheral.
#[derive(Debug, Clone)]
pub struct SimPeripheral {
    name: &'static str,
    healthy: bool,
    calls: u32,
}

impl SimPeripheral {
    /// A healthy peripheral.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            healthy: true,
            calls: 0,
        }
    }

    /// Peripheral name as used in configuration.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Whether the hardware currently works.
    pub const fn is_healthy(&self) -> bool {
        self.healthy
    }

    /// Break or repair the hardware.
    pub fn set_healthy(&mut self, healthy: bool) {
        self.healthy = healthy;
    }

    /// How many operations were issued to this peripheral.
    pub const fn calls(&self) -> u32 {
        self.calls
    }

    /// Run one bring-up operation. Returns `1` on success, `0` on failure.
    pub fn init(&mut self, op: &str) -> u8 {
        self.calls = self.calls.wrapping_add(1);
        debug!(
            peripheral = self.name,
            op,
            healthy = self.healthy,
            "peripheral operation"
        );
        u8::from(self.healthy)
    }

    /// Read one sample. `None` when the hardware does not answer.
    pub fn sample(&mut self) -> Option<u16> {
        self.calls = self.calls.wrapping_add(1);
        // Deterministic pseudo-reading that stays nonzero.
        self.healthy.then(|| 900 + (self.calls % 64) as u16)
    }
}

/// The simulated board.
#[derive(Debug, Clone)]
pub struct Board {
    /// Measured supply voltage in millivolts.
    pub supply_mv: u16,
    /// Power regulator.
    pub power: SimPeripheral,
    /// Inertial measurement unit.
    pub imu: SimPeripheral,
    /// Radio module.
    pub radio: SimPeripheral,
    /// I2C bus controller.
    pub i2c: SimPeripheral,
    /// SPI bus controller.
    pub spi: SimPeripheral,
    /// UART console.
    pub uart: SimPeripheral,
}

impl Board {
    /// Names accepted in the `faulty` configuration list.
    pub const PERIPHERALS: [&'static str; 6] = ["power", "imu", "radio", "i2c", "spi", "uart"];

    /// A board with every peripheral healthy and a nominal supply.
    pub const fn new() -> Self {
        Self {
            supply_mv: NOMINAL_SUPPLY_MV,
            power: SimPeripheral::new("power"),
            imu: SimPeripheral::new("imu"),
            radio: SimPeripheral::new("radio"),
            i2c: SimPeripheral::new("i2c"),
            spi: SimPeripheral::new("spi"),
            uart: SimPeripheral::new("uart"),
        }
    }

    /// Build a board from configuration: supply voltage and faulty parts.
    ///
    /// Unknown names are skipped; `DemoConfig::validate` rejects them
    /// before this is reached.
    pub fn from_config(section: &DemoSection) -> Self {
        let mut board = Self::new();
        board.supply_mv = section.supply_mv;
        for name in &section.faulty {
            if let Some(peripheral) = board.peripheral_mut(name) {
                peripheral.set_healthy(false);
            }
        }
        board
    }

    /// Look a peripheral up by name (ASCII case-insensitive).
    pub fn peripheral_mut(&mut self, name: &str) -> Option<&mut SimPeripheral> {
        [
            &mut self.power,
            &mut self.imu,
            &mut self.radio,
            &mut self.i2c,
            &mut self.spi,
            &mut self.uart,
        ]
        .into_iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Whether the supply voltage is inside [`SUPPLY_RANGE_MV`].
    pub fn supply_in_range(&self) -> bool {
        SUPPLY_RANGE_MV.contains(&self.supply_mv)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
