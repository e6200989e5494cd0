//! Debug serial configuration

use crate::error::SerialError;
use crate::line::LineSettings;
use serde::{Deserialize, Serialize};

/// Debug serial configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// Peripheral clock feeding the baud-rate generator (Hz)
    pub clock_hz: u32,

    /// Requested baud rate
    pub baud: u32,

    /// Double-speed mode (divide by 8 instead of 16)
    pub double_speed: bool,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            clock_hz: 16_000_000,
            baud: 9600,
            double_speed: true,
        }
    }
}

impl SerialConfig {
    /// Create fast config (115200 baud)
    pub fn fast() -> Self {
        Self {
            baud: 115_200,
            ..Default::default()
        }
    }

    /// Override the baud rate
    pub fn with_baud(mut self, baud: u32) -> Self {
        self.baud = baud;
        self
    }

    /// Compute the line settings this config asks for
    pub fn line_settings(&self) -> Result<LineSettings, SerialError> {
        LineSettings::compute(self.clock_hz, self.baud, self.double_speed)
    }
}
