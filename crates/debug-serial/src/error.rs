//! Debug Serial Error Types

use thiserror::Error;

/// Errors that can occur while bringing up the debug serial port
///
/// Queueing and transmitting never fail; only initialization reports errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerialError {
    /// Requested baud rate of zero
    #[error("Baud rate must be non-zero")]
    ZeroBaud,

    /// Peripheral clock of zero
    #[error("Peripheral clock frequency must be non-zero")]
    ZeroClock,

    /// Baud rate faster than the clock can divide down to
    #[error("Baud rate {baud} is too high for a {clock_hz} Hz clock")]
    BaudTooHigh { baud: u32, clock_hz: u32 },

    /// Divisor does not fit the baud-rate register
    #[error("Baud rate {baud} needs divisor {divisor}, register maximum is {max}")]
    DivisorOutOfRange { baud: u32, divisor: u64, max: u16 },

    /// Consumer callback was running while the port was being reinitialized
    #[error("Transmit-ready handler is running, cannot reinitialize")]
    Busy,
}
