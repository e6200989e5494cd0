//! Lock-Free Ring Buffer Implementation

use crate::BufferStats;
use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Lock-free SPSC ring buffer of bytes with compile-time capacity `C`
///
/// `head` is only ever written by the producer and `tail` only by the consumer,
/// so neither cursor needs a read-modify-write primitive. Usable capacity is
/// `C - 1`: one slot stays free to tell a full buffer from an empty one.
pub struct RingBuffer<const C: usize> {
    /// Pre-allocated storage
    storage: UnsafeCell<[u8; C]>,
    /// Head position (write pointer, producer-owned)
    head: AtomicUsize,
    /// Tail position (read pointer, consumer-owned)
    tail: AtomicUsize,
    /// Total bytes accepted (for statistics)
    total_written: AtomicUsize,
    /// Total bytes dropped on overflow (for statistics)
    total_dropped: AtomicUsize,
}

impl<const C: usize> RingBuffer<C> {
    const VALID_CAPACITY: () = assert!(C >= 2, "ring buffer capacity must be at least 2");

    /// Create an empty ring buffer
    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::VALID_CAPACITY;
        Self {
            storage: UnsafeCell::new([0; C]),
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
            total_written: AtomicUsize::new(0),
            total_dropped: AtomicUsize::new(0),
        }
    }

    /// Reset both cursors and the counters
    ///
    /// # Safety
    /// No `put` or `get` may run concurrently with the reset.
    pub unsafe fn reset(&self) {
        self.head.store(0, Ordering::Release);
        self.tail.store(0, Ordering::Release);
        self.total_written.store(0, Ordering::Relaxed);
        self.total_dropped.store(0, Ordering::Relaxed);
    }

    /// Enqueue a byte, returning `false` if the buffer was full
    ///
    /// A byte offered to a full buffer is dropped; queued bytes are never overwritten.
    ///
    /// # Safety
    /// At most one context may call `put` at a time.
    pub unsafe fn put(&self, byte: u8) -> bool {
        let head = self.head.load(Ordering::Relaxed);
        let next_head = (head + 1) % C;

        if next_head == self.tail.load(Ordering::Acquire) {
            let dropped = self.total_dropped.load(Ordering::Relaxed);
            self.total_dropped.store(dropped + 1, Ordering::Relaxed);
            return false;
        }

        // SAFETY: slot `head` lies outside [tail, head), so the consumer never reads it
        // until the Release store below publishes it.
        self.storage.get().cast::<u8>().add(head).write(byte);

        self.head.store(next_head, Ordering::Release);
        let written = self.total_written.load(Ordering::Relaxed);
        self.total_written.store(written + 1, Ordering::Relaxed);
        true
    }

    /// Dequeue the oldest byte, or `None` if the buffer is empty
    ///
    /// # Safety
    /// At most one context may call `get` at a time.
    pub unsafe fn get(&self) -> Option<u8> {
        let tail = self.tail.load(Ordering::Relaxed);
        if tail == self.head.load(Ordering::Acquire) {
            return None;
        }

        // SAFETY: the Acquire load of head above makes the producer's write visible,
        // and the producer does not reuse this slot until tail moves past it.
        let byte = self.storage.get().cast::<u8>().add(tail).read();

        self.tail.store((tail + 1) % C, Ordering::Release);
        Some(byte)
    }

    /// Enqueue through an exclusive borrow
    pub fn push(&mut self, byte: u8) -> bool {
        // SAFETY: `&mut self` rules out any other producer or consumer.
        unsafe { self.put(byte) }
    }

    /// Dequeue through an exclusive borrow
    pub fn pop(&mut self) -> Option<u8> {
        // SAFETY: `&mut self` rules out any other producer or consumer.
        unsafe { self.get() }
    }

    /// Get the number of bytes currently in the buffer
    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        if head >= tail {
            head - tail
        } else {
            C - tail + head
        }
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.head.load(Ordering::Acquire) == self.tail.load(Ordering::Acquire)
    }

    /// Check if buffer is full
    pub fn is_full(&self) -> bool {
        (self.head.load(Ordering::Acquire) + 1) % C == self.tail.load(Ordering::Acquire)
    }

    /// Get the usable capacity (`C - 1`)
    pub const fn capacity(&self) -> usize {
        C - 1
    }

    /// Get total bytes accepted
    pub fn total_written(&self) -> usize {
        self.total_written.load(Ordering::Relaxed)
    }

    /// Get total bytes dropped on overflow
    pub fn total_dropped(&self) -> usize {
        self.total_dropped.load(Ordering::Relaxed)
    }

    /// Snapshot the fill level and counters
    pub fn stats(&self) -> BufferStats {
        BufferStats {
            len: self.len(),
            capacity: self.capacity(),
            total_written: self.total_written(),
            total_dropped: self.total_dropped(),
        }
    }
}

impl<const C: usize> Default for RingBuffer<C> {
    fn default() -> Self {
        Self::new()
    }
}

// SAFETY: storage slots are handed between exactly one producer and one consumer
// through Release/Acquire cursor stores; `put`, `get` and `reset` are unsafe and
// document that contract.
unsafe impl<const C: usize> Sync for RingBuffer<C> {}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::VecDeque;

    #[test]
    fn test_empty_after_new() {
        let buffer = RingBuffer::<100>::new();
        assert!(buffer.is_empty());
        assert!(!buffer.is_full());
        assert_eq!(buffer.len(), 0);
        assert_eq!(buffer.capacity(), 99);
    }

    #[test]
    fn test_put_and_get() {
        let mut buffer = RingBuffer::<10>::new();

        for byte in b"hello" {
            assert!(buffer.push(*byte));
        }
        assert_eq!(buffer.len(), 5);

        let out: Vec<u8> = std::iter::from_fn(|| buffer.pop()).collect();
        assert_eq!(out, b"hello");
        assert!(buffer.is_empty());
        assert_eq!(buffer.pop(), None);
    }

    #[test]
    fn test_full_at_capacity_minus_one() {
        let mut buffer = RingBuffer::<5>::new();

        for i in 0..4 {
            assert!(!buffer.is_full());
            assert!(buffer.push(i));
        }

        assert!(buffer.is_full());
        assert!(!buffer.is_empty());
        assert_eq!(buffer.len(), 4);
    }

    #[test]
    fn test_overflow_drops_newest() {
        let mut buffer = RingBuffer::<5>::new();

        for i in 0..10 {
            buffer.push(i);
        }

        // First C-1 bytes survive, the rest were dropped
        assert_eq!(buffer.total_written(), 4);
        assert_eq!(buffer.total_dropped(), 6);
        let out: Vec<u8> = std::iter::from_fn(|| buffer.pop()).collect();
        assert_eq!(out, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_wraparound() {
        let mut buffer = RingBuffer::<4>::new();

        for round in 0..10u8 {
            assert!(buffer.push(round));
            assert!(buffer.push(round.wrapping_add(100)));
            assert_eq!(buffer.pop(), Some(round));
            assert_eq!(buffer.pop(), Some(round.wrapping_add(100)));
            assert!(buffer.is_empty());
        }
    }

    #[test]
    fn test_reset() {
        let mut buffer = RingBuffer::<8>::new();
        for i in 0..20 {
            buffer.push(i);
        }

        unsafe { buffer.reset() };

        assert!(buffer.is_empty());
        assert_eq!(buffer.stats(), BufferStats { capacity: 7, ..Default::default() });
        assert!(buffer.push(42));
        assert_eq!(buffer.pop(), Some(42));
    }

    #[test]
    fn test_stats() {
        let mut buffer = RingBuffer::<4>::new();
        for i in 0..5 {
            buffer.push(i);
        }
        buffer.pop();

        let stats = buffer.stats();
        assert_eq!(stats.len, 2);
        assert_eq!(stats.capacity, 3);
        assert_eq!(stats.total_written, 3);
        assert_eq!(stats.total_dropped, 2);
    }

    #[test]
    fn test_spsc_threads_preserve_order() {
        const COUNT: usize = 20_000;
        let buffer = RingBuffer::<16>::new();

        std::thread::scope(|scope| {
            scope.spawn(|| {
                for i in 0..COUNT {
                    // SAFETY: this thread is the only producer
                    while !unsafe { buffer.put(i as u8) } {
                        std::hint::spin_loop();
                    }
                }
            });

            let mut received = Vec::with_capacity(COUNT);
            while received.len() < COUNT {
                // SAFETY: this thread is the only consumer
                match unsafe { buffer.get() } {
                    Some(byte) => received.push(byte),
                    None => std::hint::spin_loop(),
                }
            }

            for (i, byte) in received.iter().enumerate() {
                assert_eq!(*byte, i as u8);
            }
        });

        assert!(buffer.is_empty());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Put(u8),
        Get,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![any::<u8>().prop_map(Op::Put), Just(Op::Get)]
    }

    proptest! {
        #[test]
        fn prop_fifo_round_trip(bytes in proptest::collection::vec(any::<u8>(), 0..32)) {
            let mut buffer = RingBuffer::<33>::new();
            for byte in &bytes {
                prop_assert!(buffer.push(*byte));
            }
            let out: Vec<u8> = std::iter::from_fn(|| buffer.pop()).collect();
            prop_assert_eq!(out, bytes);
            prop_assert!(buffer.is_empty());
        }

        #[test]
        fn prop_overflow_keeps_first_bytes(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
            let mut buffer = RingBuffer::<16>::new();
            for byte in &bytes {
                buffer.push(*byte);
            }
            let kept = bytes.len().min(15);
            prop_assert_eq!(buffer.total_dropped(), bytes.len() - kept);
            prop_assert_eq!(buffer.is_full(), bytes.len() >= 15);
            let out: Vec<u8> = std::iter::from_fn(|| buffer.pop()).collect();
            prop_assert_eq!(&out[..], &bytes[..kept]);
        }

        #[test]
        fn prop_matches_model(ops in proptest::collection::vec(op(), 0..200)) {
            let mut buffer = RingBuffer::<8>::new();
            let mut model = VecDeque::new();

            for op in ops {
                match op {
                    Op::Put(byte) => {
                        let accepted = buffer.push(byte);
                        prop_assert_eq!(accepted, model.len() < 7);
                        if accepted {
                            model.push_back(byte);
                        }
                    }
                    Op::Get => prop_assert_eq!(buffer.pop(), model.pop_front()),
                }
                prop_assert!(!(buffer.is_full() && buffer.is_empty()));
                prop_assert_eq!(buffer.len(), model.len());
            }
        }
    }
}
