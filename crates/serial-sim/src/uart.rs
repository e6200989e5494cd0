//! Terminal-backed transmitter

use debug_serial::{ByteSink, LineSettings};
use std::io::Write;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, trace};

/// Transmitter that shifts bytes out to any [`Write`] (stdout in the binary)
pub struct TerminalUart<W> {
    out: Mutex<W>,
}

impl<W: Write> TerminalUart<W> {
    /// Wrap an output stream
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }
}

impl<W: Write> ByteSink for TerminalUart<W> {
    fn configure(&self, settings: &LineSettings) {
        debug!(
            "UART: divisor {} ({} mode), frame {}N{}",
            settings.divisor,
            if settings.double_speed { "double-speed" } else { "normal" },
            settings.frame.data_bits,
            settings.frame.stop_bits
        );
    }

    fn write_byte(&self, byte: u8) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        // The wire has no way to report a failed shift; the byte is lost
        if let Err(err) = out.write_all(&[byte]).and_then(|_| out.flush()) {
            debug!("UART: dropped byte {:#04x}, output failed: {}", byte, err);
        }
    }

    fn set_tx_ready(&self, armed: bool) {
        // The event source follows `DebugSerial::state`, so there is no register to flip
        trace!("UART: transmit-ready {}", if armed { "armed" } else { "disarmed" });
    }
}
