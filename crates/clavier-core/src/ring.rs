//! Bounded single-producer/single-consumer ring buffer.
//!
//! Wraps a [`HeapRb`] split into its two halves. The read and write cursors
//! are atomics inside `ringbuf`: a push publishes its slot with release
//! ordering and a pop observes it with acquire ordering, so a consumer never
//! sees a slot before its contents.
//!
//! Each half sits behind its own mutex that is only ever `try_lock`ed. With
//! one producer and one consumer the locks are never contended; if a second
//! thread does show up on the same side, the loser gets a failed push or an
//! empty pop instead of blocking.

use parking_lot::Mutex;
use ringbuf::{traits::*, HeapCons, HeapProd, HeapRb};

pub struct SpscRing<T> {
    producer: Mutex<HeapProd<T>>,
    consumer: Mutex<HeapCons<T>>,
    capacity: usize,
}

impl<T> SpscRing<T> {
    /// Allocate a ring holding `capacity` elements.
    ///
    /// Returns `None` for a zero capacity; callers model a disabled ring as
    /// an absent one.
    pub fn new(capacity: usize) -> Option<Self> {
        if capacity == 0 {
            return None;
        }
        let (producer, consumer) = HeapRb::<T>::new(capacity).split();
        Some(Self {
            producer: Mutex::new(producer),
            consumer: Mutex::new(consumer),
            capacity,
        })
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Push one element. Returns false if the ring is full.
    #[inline]
    pub fn try_push(&self, item: T) -> bool {
        match self.producer.try_lock() {
            Some(mut producer) => producer.try_push(item).is_ok(),
            None => false,
        }
    }

    /// Pop the oldest element.
    #[inline]
    pub fn try_pop(&self) -> Option<T> {
        self.consumer.try_lock()?.try_pop()
    }

    /// Number of elements waiting to be read.
    ///
    /// `None` while the consumer end is held by a reader, so a busy consumer
    /// is never mistaken for an empty ring.
    pub fn occupied_len(&self) -> Option<usize> {
        Some(self.consumer.try_lock()?.occupied_len())
    }

    /// Free slots. `None` while the producer end is held by a writer.
    pub fn vacant_len(&self) -> Option<usize> {
        Some(self.producer.try_lock()?.vacant_len())
    }
}

impl<T: Copy> SpscRing<T> {
    /// Push every element of `items` or none of them.
    ///
    /// Free space only grows while the producer lock is held, so checking
    /// `vacant_len` first makes the following `push_slice` complete.
    pub fn push_all(&self, items: &[T]) -> bool {
        let Some(mut producer) = self.producer.try_lock() else {
            return false;
        };
        if producer.vacant_len() < items.len() {
            return false;
        }
        producer.push_slice(items) == items.len()
    }

    /// Read a length-prefixed frame: one length element followed by that
    /// many payload elements, popped as a unit.
    ///
    /// Returns the payload length, or `None` while the frame is incomplete.
    /// `prefix_len` maps the first element to its payload length.
    pub(crate) fn pop_frame(
        &self,
        out: &mut [T],
        prefix_len: impl Fn(T) -> usize,
    ) -> Option<usize> {
        let mut consumer = self.consumer.try_lock()?;
        let (head, tail) = consumer.as_slices();
        let len = prefix_len(*head.first().or_else(|| tail.first())?);
        if len > out.len() || consumer.occupied_len() < len + 1 {
            return None;
        }
        consumer.skip(1);
        let read = consumer.pop_slice(&mut out[..len]);
        debug_assert_eq!(read, len);
        Some(len)
    }
}
