//! Lock-Free Byte Ring Buffer
//!
//! Provides a fixed-capacity SPSC byte queue for interrupt-driven transmit paths.
//! One slot is kept free so that `head == tail` always means empty.

mod buffer;

pub use buffer::RingBuffer;

use serde::{Deserialize, Serialize};

/// Default buffer capacity (99 usable bytes)
pub const DEFAULT_CAPACITY: usize = 100;

/// Point-in-time snapshot of a ring buffer's fill level and running counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferStats {
    /// Bytes currently queued
    pub len: usize,
    /// Usable capacity (C - 1)
    pub capacity: usize,
    /// Bytes accepted since the last reset
    pub total_written: usize,
    /// Bytes dropped on overflow since the last reset
    pub total_dropped: usize,
}
