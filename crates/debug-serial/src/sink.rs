//! Hardware Transmitter Abstraction

use crate::line::LineSettings;

/// The transmit side of a UART, as seen by the debug serial driver
///
/// Methods take `&self` because they are called from both the application
/// context and the transmit-ready interrupt; implementations talk to
/// memory-mapped registers, which are shared by nature.
pub trait ByteSink {
    /// Program the baud-rate generator and frame format, and enable the transmitter
    fn configure(&self, settings: &LineSettings);

    /// Load one byte into the transmit data register
    ///
    /// The hardware raises the transmit-ready event again once it can take the next byte.
    fn write_byte(&self, byte: u8);

    /// Arm or disarm the transmit-ready interrupt
    fn set_tx_ready(&self, armed: bool);
}

impl<T: ByteSink + ?Sized> ByteSink for &T {
    fn configure(&self, settings: &LineSettings) {
        (**self).configure(settings)
    }

    fn write_byte(&self, byte: u8) {
        (**self).write_byte(byte)
    }

    fn set_tx_ready(&self, armed: bool) {
        (**self).set_tx_ready(armed)
    }
}
