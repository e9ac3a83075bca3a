//! Failure causes of the simulated board.

use errcheck::error_codes;

error_codes! {
    /// Bring-up and link failure causes.
    pub struct InitError {
        /// Supply out of range or regulator failed.
        const POWER = 1;
        /// IMU / sensor initialization or calibration failed.
        const SENSOR = 2;
        /// Radio module failed to start.
        const RADIO = 3;
        /// Any I2C transaction failed.
        const I2C = 4;
        /// SPI loopback failed.
        const SPI = 5;
        /// UART console failed.
        const UART = 6;
        /// Link produced no sample in time.
        const TIMEOUT = 7;
    }
}

/// Parse a code given by name (`radio`) or raw byte (`3`).
pub fn parse_code(text: &str) -> Option<InitError> {
    use errcheck::ErrorCode;

    let text = text.trim();
    match text.parse::<u8>() {
        Ok(raw) => InitError::from_raw(raw),
        Err(_) => InitError::from_name(text),
    }
}

/// Operator-facing description of a code.
pub const fn describe(code: InitError) -> &'static str {
    match code {
        InitError::POWER => "power regulator",
        InitError::SENSOR => "sensor / IMU",
        InitError::RADIO => "radio module",
        InitError::I2C => "I2C communication",
        InitError::SPI => "SPI peripheral",
        InitError::UART => "UART console",
        InitError::TIMEOUT => "link timeout",
        _ => "no error",
    }
}
