//! Debug Serial Port: producer and interrupt consumer

use crate::config::SerialConfig;
use crate::error::SerialError;
use crate::line::LineSettings;
use crate::sink::ByteSink;
use ring_buffer::{BufferStats, RingBuffer, DEFAULT_CAPACITY};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

/// Baud error above which `begin` warns (percent)
const MAX_BAUD_ERROR_PERCENT: f64 = 2.0;

/// Transmit state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxState {
    /// Queue drained, transmit-ready interrupt disarmed
    Idle,
    /// Bytes queued or in flight, transmit-ready interrupt armed
    Draining,
}

/// Transmit-only debug serial port over a `C`-slot byte queue
///
/// Application code calls [`submit_byte`](Self::submit_byte) and the `print_*`
/// formatters; the platform routes the transmit-ready interrupt to
/// [`on_tx_ready`](Self::on_tx_ready). Bytes leave in submission order. When the
/// queue is full, newly submitted bytes are dropped without any signal to the caller.
pub struct DebugSerial<S, const C: usize = DEFAULT_CAPACITY> {
    /// Hardware transmitter
    sink: S,
    /// Peripheral clock used for the baud-rate divisor
    clock_hz: u32,
    /// Queue shared between producer and consumer
    buffer: RingBuffer<C>,
    /// Mirror of the transmit-ready interrupt enable
    armed: AtomicBool,
    /// Set while the consumer (or a reinitialization) owns the tail cursor
    consuming: AtomicBool,
}

impl<S: ByteSink, const C: usize> DebugSerial<S, C> {
    /// Create a port on top of `sink`, clocked at `clock_hz`
    ///
    /// The queue starts empty, but the transmitter is not configured until [`begin`](Self::begin).
    pub const fn new(sink: S, clock_hz: u32) -> Self {
        Self {
            sink,
            clock_hz,
            buffer: RingBuffer::new(),
            armed: AtomicBool::new(false),
            consuming: AtomicBool::new(false),
        }
    }

    /// Configure the transmitter for `baud` in double-speed mode and empty the queue
    pub fn begin(&self, baud: u32) -> Result<LineSettings, SerialError> {
        self.begin_with(baud, true)
    }

    /// Configure the transmitter for `baud` at the port's clock and empty the queue
    pub fn begin_with(&self, baud: u32, double_speed: bool) -> Result<LineSettings, SerialError> {
        self.begin_config(&SerialConfig {
            clock_hz: self.clock_hz,
            baud,
            double_speed,
        })
    }

    /// Configure the transmitter from `config` and empty the queue
    ///
    /// `config.clock_hz` is used for the divisor in place of the clock given to
    /// [`new`](Self::new). Anything still queued is discarded. The port is left
    /// [`TxState::Idle`].
    pub fn begin_config(&self, config: &SerialConfig) -> Result<LineSettings, SerialError> {
        let settings = config.line_settings()?;
        let baud = config.baud;

        critical_section::with(|_cs| {
            if self.consuming.swap(true, Ordering::Acquire) {
                return Err(SerialError::Busy);
            }

            self.disarm();
            self.sink.configure(&settings);
            // SAFETY: producers are shut out by the critical section and the
            // consumer by the `consuming` flag we now hold.
            unsafe { self.buffer.reset() };

            self.consuming.store(false, Ordering::Release);
            Ok(())
        })?;

        info!(
            baud,
            divisor = settings.divisor,
            actual_baud = settings.actual_baud(),
            "Debug serial configured"
        );
        if settings.baud_error_percent().abs() > MAX_BAUD_ERROR_PERCENT {
            warn!(
                "Baud error {:.2}% at {} baud exceeds {}%",
                settings.baud_error_percent(),
                baud,
                MAX_BAUD_ERROR_PERCENT
            );
        }

        Ok(settings)
    }

    /// Queue one byte for transmission
    ///
    /// Never blocks. If the queue is full the byte is dropped. The first byte
    /// queued into an empty buffer arms the transmit-ready interrupt.
    pub fn submit_byte(&self, byte: u8) {
        critical_section::with(|_cs| {
            let was_empty = self.buffer.is_empty();
            // SAFETY: every producer runs inside the critical section, so puts never overlap.
            unsafe { self.buffer.put(byte) };
            if was_empty {
                self.arm();
            }
        });
    }

    /// Transmit-ready interrupt handler
    ///
    /// Hands the next queued byte to the transmitter, or disarms the interrupt
    /// once the queue is empty. Constant time, never blocks.
    pub fn on_tx_ready(&self) {
        if self.consuming.swap(true, Ordering::Acquire) {
            return;
        }

        // SAFETY: the `consuming` flag admits a single consumer at a time.
        match unsafe { self.buffer.get() } {
            Some(byte) => self.sink.write_byte(byte),
            None => {
                self.disarm();
                // A producer preempting us between the empty check and the disarm
                // would otherwise leave its byte stranded.
                if !self.buffer.is_empty() {
                    self.arm();
                }
            }
        }

        self.consuming.store(false, Ordering::Release);
    }

    /// Current transmit state
    pub fn state(&self) -> TxState {
        if self.armed.load(Ordering::Acquire) {
            TxState::Draining
        } else {
            TxState::Idle
        }
    }

    /// Check if the queue is empty
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Check if the queue is full
    pub fn is_full(&self) -> bool {
        self.buffer.is_full()
    }

    /// Get the number of queued bytes
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Get the usable queue capacity (`C - 1`)
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Snapshot the queue counters, including bytes dropped on overflow
    pub fn stats(&self) -> BufferStats {
        self.buffer.stats()
    }

    /// Get the underlying transmitter
    pub fn sink(&self) -> &S {
        &self.sink
    }

    fn arm(&self) {
        self.armed.store(true, Ordering::Release);
        self.sink.set_tx_ready(true);
    }

    fn disarm(&self) {
        self.armed.store(false, Ordering::Release);
        self.sink.set_tx_ready(false);
    }
}
