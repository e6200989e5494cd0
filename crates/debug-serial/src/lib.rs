//! Transmit-Only Debug Serial Output
//!
//! Application code queues text, integers and floats through [`DebugSerial`];
//! the platform's transmit-ready interrupt calls [`DebugSerial::on_tx_ready`]
//! to move one byte at a time from the queue into the transmitter.
//!
//! The hardware side is abstracted by [`ByteSink`], so the whole protocol can
//! run on a host against [`mock::MockUart`].

mod config;
mod error;
mod format;
mod line;
pub mod mock;
mod port;
mod sink;

pub use config::SerialConfig;
pub use error::SerialError;
pub use format::SerialWriter;
pub use line::{FrameFormat, LineSettings, MAX_DIVISOR};
pub use port::{DebugSerial, TxState};
pub use ring_buffer::{BufferStats, DEFAULT_CAPACITY};
pub use sink::ByteSink;

/// Control bytes emitted by the formatters
pub mod control {
    /// Carriage return
    pub const CR: u8 = b'\r';
    /// Line feed
    pub const LF: u8 = b'\n';
    /// String terminator; printing stops here
    pub const NUL: u8 = 0;
}
