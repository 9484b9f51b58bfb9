// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Lock-free bounded multi-producer/multi-consumer ring.
//!
//! Every slot carries a version. `head` and `tail` are monotonic counters, not
//! wrapped indices, so a slot's version identifies the lap it belongs to and a
//! producer that wrapped around can never be confused with the previous lap.
//!
//! For the slot at position `pos`:
//!
//! * version `== pos`: empty and free for the producer that reserves `pos`
//! * version `== pos + 1`: published, readable by the consumer expecting `pos`
//! * version `== pos + size`: consumed, free for the next lap
//!
//! A consumer only reads a slot once its version has moved past its expected
//! generation, so a reserved but unpublished value is never observed.

use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicUsize, Ordering};

struct Slot<T> {
    version: AtomicUsize,
    value: UnsafeCell<MaybeUninit<T>>,
}

/// Fixed-capacity ring of versioned slots.
///
/// Non-blocking on both ends: `push` hands the value back when the ring is full
/// and `pop` returns `None` when nothing is published. Callers decide whether to
/// retry, wait or drop. One slot is sacrificed to keep "full" distinct from
/// "empty", so usable capacity is `size - 1`.
pub struct BoundedQueue<T> {
    slots: Box<[Slot<T>]>,
    size: usize,
    head: AtomicUsize,
    tail: AtomicUsize,
}

// SAFETY: a value is written by exactly one producer (the one whose tail CAS won)
// and read by exactly one consumer (the one whose head CAS won); the slot version
// hands ownership across with Release/Acquire ordering.
unsafe impl<T: Send> Send for BoundedQueue<T> {}
unsafe impl<T: Send> Sync for BoundedQueue<T> {}

impl<T> BoundedQueue<T> {
    /// Create a ring with `size` slots, `size - 1` of them usable. Sizes below
    /// two are raised to two.
    pub fn new(size: usize) -> Self {
        let size = size.max(2);
        let slots = (0..size)
            .map(|i| Slot {
                version: AtomicUsize::new(i),
                value: UnsafeCell::new(MaybeUninit::uninit()),
            })
            .collect();

        Self {
            slots,
            size,
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
        }
    }

    /// Enqueue `value`, or give it back if the ring is full.
    pub fn push(&self, value: T) -> Result<(), T> {
        let mut tail = self.tail.load(Ordering::Relaxed);

        loop {
            let head = self.head.load(Ordering::Acquire);
            if head > tail {
                // Stale tail, consumers already moved past it.
                tail = self.tail.load(Ordering::Relaxed);
                continue;
            }
            if tail - head >= self.size - 1 {
                return Err(value);
            }

            let slot = &self.slots[tail % self.size];
            let version = slot.version.load(Ordering::Acquire);

            if version == tail {
                match self.tail.compare_exchange_weak(
                    tail,
                    tail + 1,
                    Ordering::AcqRel,
                    Ordering::Relaxed,
                ) {
                    Ok(_) => {
                        // SAFETY: winning the CAS on `tail` makes this producer the
                        // only writer of the slot until its version is bumped.
                        unsafe { (*slot.value.get()).write(value) };
                        slot.version.store(tail + 1, Ordering::Release);
                        return Ok(());
                    }
                    Err(current) => tail = current,
                }
            } else if version < tail {
                // Previous lap not consumed yet.
                return Err(value);
            } else {
                tail = self.tail.load(Ordering::Relaxed);
            }
        }
    }

    /// Dequeue the oldest published value.
    pub fn pop(&self) -> Option<T> {
        let mut head = self.head.load(Ordering::Relaxed);

        loop {
            let slot = &self.slots[head % self.size];
            let version = slot.version.load(Ordering::Acquire);
            let expected = head + 1;

            if version == expected {
                match self.head.compare_exchange_weak(
                    head,
                    head + 1,
                    Ordering::AcqRel,
                    Ordering::Relaxed,
                ) {
                    Ok(_) => {
                        // SAFETY: the version shows a published value and winning
                        // the CAS on `head` makes this consumer its only reader.
                        let value = unsafe { (*slot.value.get()).assume_init_read() };
                        slot.version.store(head + self.size, Ordering::Release);
                        return Some(value);
                    }
                    Err(current) => head = current,
                }
            } else if version < expected {
                return None;
            } else {
                head = self.head.load(Ordering::Relaxed);
            }
        }
    }

    /// Usable slots: configured size minus one.
    pub fn capacity(&self) -> usize {
        self.size - 1
    }

    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        tail.saturating_sub(head)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity()
    }
}

impl<T> Drop for BoundedQueue<T> {
    fn drop(&mut self) {
        while self.pop().is_some() {}
    }
}

impl<T> std::fmt::Debug for BoundedQueue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundedQueue")
            .field("capacity", &self.capacity())
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_round_trip_preserves_order() {
        let queue = BoundedQueue::new(8);
        for i in 1..=5 {
            assert!(queue.push(i).is_ok());
        }
        for i in 1..=5 {
            assert_eq!(queue.pop(), Some(i));
        }
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn test_capacity_is_size_minus_one() {
        assert_eq!(BoundedQueue::<i32>::new(5).capacity(), 4);
        assert_eq!(BoundedQueue::<i32>::new(10).capacity(), 9);
    }

    #[test]
    fn test_full_queue_hands_value_back() {
        let queue = BoundedQueue::new(3);
        assert!(queue.push(1).is_ok());
        assert!(!queue.is_full());
        assert!(queue.push(2).is_ok());
        assert!(queue.is_full());
        assert_eq!(queue.push(3), Err(3));

        assert_eq!(queue.pop(), Some(1));
        assert!(queue.push(3).is_ok());
    }

    #[test]
    fn test_is_empty() {
        let queue = BoundedQueue::new(3);
        assert!(queue.is_empty());
        queue.push(1).unwrap();
        queue.push(2).unwrap();
        assert!(!queue.is_empty());
        queue.pop();
        queue.pop();
        assert!(queue.is_empty());
    }

    #[test]
    fn test_wraps_around_many_laps() {
        let queue = BoundedQueue::new(4);
        for lap in 0..100 {
            for i in 0..3 {
                queue.push(lap * 10 + i).unwrap();
            }
            for i in 0..3 {
                assert_eq!(queue.pop(), Some(lap * 10 + i));
            }
        }
        assert!(queue.is_empty());
    }

    #[test]
    fn test_drop_releases_remaining_values() {
        let marker = Arc::new(());
        {
            let queue = BoundedQueue::new(4);
            queue.push(Arc::clone(&marker)).unwrap();
            queue.push(Arc::clone(&marker)).unwrap();
            assert_eq!(Arc::strong_count(&marker), 3);
        }
        assert_eq!(Arc::strong_count(&marker), 1);
    }

    #[test]
    fn test_concurrent_producers_and_consumers_see_every_value_once() {
        const PRODUCERS: usize = 4;
        const PER_PRODUCER: usize = 2_000;

        let queue = Arc::new(BoundedQueue::new(64));
        let mut producers = Vec::new();
        for p in 0..PRODUCERS {
            let queue = Arc::clone(&queue);
            producers.push(thread::spawn(move || {
                for i in 0..PER_PRODUCER {
                    let mut value = p * PER_PRODUCER + i;
                    while let Err(back) = queue.push(value) {
                        value = back;
                        thread::yield_now();
                    }
                }
            }));
        }

        let mut consumers = Vec::new();
        for _ in 0..2 {
            let queue = Arc::clone(&queue);
            consumers.push(thread::spawn(move || {
                let mut seen = Vec::new();
                while seen.len() < PRODUCERS * PER_PRODUCER / 2 {
                    match queue.pop() {
                        Some(value) => seen.push(value),
                        None => thread::yield_now(),
                    }
                }
                seen
            }));
        }

        for producer in producers {
            producer.join().unwrap();
        }
        let mut all: Vec<usize> = consumers
            .into_iter()
            .flat_map(|consumer| consumer.join().unwrap())
            .collect();
        all.sort_unstable();

        assert_eq!(all, (0..PRODUCERS * PER_PRODUCER).collect::<Vec<_>>());
    }
}
