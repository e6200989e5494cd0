//! Mock transmitter for running the driver without hardware

use crate::line::LineSettings;
use crate::port::DebugSerial;
use crate::sink::ByteSink;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Transmitter that records everything the driver does to it
#[derive(Debug, Default)]
pub struct MockUart {
    /// Bytes loaded into the data register, in order
    written: Mutex<Vec<u8>>,
    /// Transmit-ready interrupt enable
    armed: AtomicBool,
    /// Number of disarmed→armed transitions
    arm_count: AtomicUsize,
    /// Last applied line settings
    settings: Mutex<Option<LineSettings>>,
}

impl MockUart {
    /// Create an unconfigured mock transmitter
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes transmitted so far
    pub fn written(&self) -> Vec<u8> {
        lock(&self.written).clone()
    }

    /// Number of bytes transmitted so far
    pub fn written_len(&self) -> usize {
        lock(&self.written).len()
    }

    /// Whether the transmit-ready interrupt is armed
    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::SeqCst)
    }

    /// How many times the interrupt went from disarmed to armed
    pub fn arm_count(&self) -> usize {
        self.arm_count.load(Ordering::SeqCst)
    }

    /// Line settings from the last `configure`
    pub fn settings(&self) -> Option<LineSettings> {
        *lock(&self.settings)
    }
}

impl ByteSink for MockUart {
    fn configure(&self, settings: &LineSettings) {
        *lock(&self.settings) = Some(*settings);
    }

    fn write_byte(&self, byte: u8) {
        lock(&self.written).push(byte);
    }

    fn set_tx_ready(&self, armed: bool) {
        let was_armed = self.armed.swap(armed, Ordering::SeqCst);
        if armed && !was_armed {
            self.arm_count.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Raise transmit-ready events the way the hardware would until the port goes idle
///
/// Returns the bytes transmitted during this call.
pub fn drain<const C: usize>(port: &DebugSerial<MockUart, C>) -> Vec<u8> {
    let start = port.sink().written_len();
    while port.sink().is_armed() {
        port.on_tx_ready();
    }
    port.sink().written()[start..].to_vec()
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
