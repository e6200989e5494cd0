//! Line Settings and Baud-Rate Divisor

use crate::error::SerialError;
use serde::{Deserialize, Serialize};

/// Largest value the 12-bit baud-rate register accepts
pub const MAX_DIVISOR: u16 = 4095;

/// Character frame layout on the wire (no parity bit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameFormat {
    /// Data bits per character
    pub data_bits: u8,
    /// Stop bits per character
    pub stop_bits: u8,
}

impl FrameFormat {
    /// 8 data bits, no parity, 1 stop bit
    pub const EIGHT_N_ONE: Self = Self {
        data_bits: 8,
        stop_bits: 1,
    };

    /// Bits on the wire per character, start bit included
    pub fn bits_per_frame(&self) -> u32 {
        1 + self.data_bits as u32 + self.stop_bits as u32
    }
}

/// Resolved transmitter settings handed to [`crate::ByteSink::configure`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSettings {
    /// Peripheral clock (Hz)
    pub clock_hz: u32,
    /// Baud rate that was asked for
    pub requested_baud: u32,
    /// Value for the baud-rate register
    pub divisor: u16,
    /// Whether the divide-by-8 double-speed mode is used
    pub double_speed: bool,
    /// Character frame
    pub frame: FrameFormat,
}

impl LineSettings {
    /// Derive the baud-rate register value for `baud` at `clock_hz`
    ///
    /// `divisor = clock / (8 * baud) - 1` in double-speed mode, `/ (16 * baud)` otherwise,
    /// with integer truncation as the hardware reference formula does.
    pub fn compute(clock_hz: u32, baud: u32, double_speed: bool) -> Result<Self, SerialError> {
        if baud == 0 {
            return Err(SerialError::ZeroBaud);
        }
        if clock_hz == 0 {
            return Err(SerialError::ZeroClock);
        }

        let quotient = clock_hz as u64 / (Self::scale(double_speed) * baud as u64);
        if quotient == 0 {
            return Err(SerialError::BaudTooHigh { baud, clock_hz });
        }

        let divisor = quotient - 1;
        if divisor > MAX_DIVISOR as u64 {
            return Err(SerialError::DivisorOutOfRange {
                baud,
                divisor,
                max: MAX_DIVISOR,
            });
        }

        Ok(Self {
            clock_hz,
            requested_baud: baud,
            divisor: divisor as u16,
            double_speed,
            frame: FrameFormat::EIGHT_N_ONE,
        })
    }

    /// Baud rate the divisor actually produces
    pub fn actual_baud(&self) -> f64 {
        self.clock_hz as f64 / (Self::scale(self.double_speed) as f64 * (self.divisor as f64 + 1.0))
    }

    /// Signed deviation of the actual from the requested baud rate, in percent
    pub fn baud_error_percent(&self) -> f64 {
        (self.actual_baud() / self.requested_baud as f64 - 1.0) * 100.0
    }

    /// Time to shift one character out, in microseconds
    pub fn byte_time_us(&self) -> u64 {
        let clocks = self.frame.bits_per_frame() as u64
            * Self::scale(self.double_speed)
            * (self.divisor as u64 + 1);
        (clocks * 1_000_000).div_ceil(self.clock_hz as u64)
    }

    fn scale(double_speed: bool) -> u64 {
        if double_speed {
            8
        } else {
            16
        }
    }
}
