//! Build-time forced sites.
//!
//! Each `inject-*` Cargo feature flips one constant below. Call sites
//! tagged with that constant through `Diagnostics::check_forced` fail with
//! the matching code without running the real operation. A CI matrix of
//! one build per feature walks every error path.
//!
//! ```bash
//! cargo test -p errcheck_demo --features inject-sensor
//! ```

use crate::codes::InitError;
use bitflags::bitflags;

/// Power regulator sites fail with `POWER`.
pub const FORCE_POWER: bool = cfg!(feature = "inject-power");
/// IMU sites fail with `SENSOR`.
pub const FORCE_SENSOR: bool = cfg!(feature = "inject-sensor");
/// Radio bring-up site fails with `RADIO`.
pub const FORCE_RADIO: bool = cfg!(feature = "inject-radio");
/// I2C probe site fails with `I2C`.
pub const FORCE_I2C: bool = cfg!(feature = "inject-i2c");
/// SPI loopback site fails with `SPI`.
pub const FORCE_SPI: bool = cfg!(feature = "inject-spi");
/// UART console site fails with `UART`.
pub const FORCE_UART: bool = cfg!(feature = "inject-uart");

bitflags! {
    /// Set of subsystems whose sites are forced to fail in this build.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ForcedSites: u8 {
        /// `inject-power`.
        const POWER  = 0x01;
        /// `inject-sensor`.
        const SENSOR = 0x02;
        /// `inject-radio`.
        const RADIO  = 0x04;
        /// `inject-i2c`.
        const I2C    = 0x08;
        /// `inject-spi`.
        const SPI    = 0x10;
        /// `inject-uart`.
        const UART   = 0x20;
    }
}

impl ForcedSites {
    /// Sites forced by the features this crate was compiled with.
    pub const COMPILED: Self = Self::from_flags([
        FORCE_POWER,
        FORCE_SENSOR,
        FORCE_RADIO,
        FORCE_I2C,
        FORCE_SPI,
        FORCE_UART,
    ]);

    const MAPPING: [(Self, InitError); 6] = [
        (Self::POWER, InitError::POWER),
        (Self::SENSOR, InitError::SENSOR),
        (Self::RADIO, InitError::RADIO),
        (Self::I2C, InitError::I2C),
        (Self::SPI, InitError::SPI),
        (Self::UART, InitError::UART),
    ];

    const fn from_flags(flags: [bool; 6]) -> Self {
        let mut bits = 0u8;
        let mut i = 0;
        while i < flags.len() {
            if flags[i] {
                bits |= 1 << i;
            }
            i += 1;
        }
        Self::from_bits_truncate(bits)
    }

    /// Codes forced by this set, in declaration order.
    pub fn codes(self) -> impl Iterator<Item = InitError> {
        Self::MAPPING
            .into_iter()
            .filter(move |(site, _)| self.contains(*site))
            .map(|(_, code)| code)
    }
}
