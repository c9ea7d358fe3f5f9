//! Deferred callbacks driven by the owner's tick.
//!
//! A [`TimerQueue`] is a min-heap of `(fire_time, sequence)` entries carrying a
//! typed payload. The owner pops due payloads with [`TimerQueue::drain_due`] and
//! dispatches them itself, so a payload may freely mutate its owner. Entries
//! scheduled while a drained batch is being dispatched wait for the next drain.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

/// Handle returned by [`TimerQueue::set`], used for cancellation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

/// Dispatch boundary returned by [`TimerQueue::cutoff`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerCutoff(u64);

#[derive(Clone, Debug)]
struct Entry<T> {
    fire_time: f32,
    seq: u64,
    handle: TimerHandle,
    payload: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    // Reversed so the max-heap pops the earliest entry first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .fire_time
            .total_cmp(&self.fire_time)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Priority queue of scheduled payloads with cancellation by handle.
#[derive(Clone, Debug)]
pub struct TimerQueue<T> {
    heap: BinaryHeap<Entry<T>>,
    live: HashMap<TimerHandle, f32>,
    next_seq: u64,
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            live: HashMap::new(),
            next_seq: 0,
        }
    }

    /// Schedules `payload` to fire `delay` seconds after `now`.
    pub fn set(&mut self, now: f32, delay: f32, payload: T) -> TimerHandle {
        let seq = self.next_seq;
        self.next_seq += 1;
        let handle = TimerHandle(seq);
        let fire_time = now + delay.max(0.0);
        self.live.insert(handle, fire_time);
        self.heap.push(Entry {
            fire_time,
            seq,
            handle,
            payload,
        });
        handle
    }

    /// Cancels a pending timer. Unknown or already fired handles are ignored.
    pub fn clear(&mut self, handle: TimerHandle) {
        self.live.remove(&handle);
    }

    pub fn is_active(&self, handle: TimerHandle) -> bool {
        self.live.contains_key(&handle)
    }

    /// Seconds until `handle` fires, or `None` if it is not pending.
    pub fn remaining(&self, handle: TimerHandle, now: f32) -> Option<f32> {
        self.live.get(&handle).map(|t| (t - now).max(0.0))
    }

    /// Number of pending (not cancelled) timers.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Marks the boundary between timers that exist now and timers scheduled
    /// later. Pass it to [`TimerQueue::pop_due`] while dispatching a batch.
    pub fn cutoff(&self) -> TimerCutoff {
        TimerCutoff(self.next_seq)
    }

    /// Pops the earliest live payload due at or before `now` that was scheduled
    /// before `cutoff`. Timers cleared by an earlier payload of the same batch
    /// are skipped.
    pub fn pop_due(&mut self, now: f32, cutoff: TimerCutoff) -> Option<T> {
        let mut deferred = Vec::new();
        let mut due = None;
        while let Some(entry) = self.heap.peek() {
            if entry.fire_time > now {
                break;
            }
            let Some(entry) = self.heap.pop() else {
                break;
            };
            if !self.live.contains_key(&entry.handle) {
                continue;
            }
            if entry.seq >= cutoff.0 {
                deferred.push(entry);
                continue;
            }
            self.live.remove(&entry.handle);
            due = Some(entry.payload);
            break;
        }
        self.heap.extend(deferred);
        due
    }

    /// Pops every pending payload due at or before `now`, earliest first.
    pub fn drain_due(&mut self, now: f32) -> Vec<T> {
        let cutoff = self.cutoff();
        let mut due = Vec::new();
        while let Some(payload) = self.pop_due(now, cutoff) {
            due.push(payload);
        }
        due
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_in_fire_time_then_insertion_order() {
        let mut q = TimerQueue::new();
        q.set(0.0, 0.3, "c");
        q.set(0.0, 0.1, "a");
        q.set(0.0, 0.1, "b");
        assert_eq!(q.drain_due(0.05), Vec::<&str>::new());
        assert_eq!(q.drain_due(0.2), vec!["a", "b"]);
        assert_eq!(q.drain_due(1.0), vec!["c"]);
        assert!(q.is_empty());
    }

    #[test]
    fn cleared_handles_never_fire() {
        let mut q = TimerQueue::new();
        let h = q.set(0.0, 0.1, 1);
        q.set(0.0, 0.2, 2);
        q.clear(h);
        assert!(!q.is_active(h));
        assert_eq!(q.drain_due(1.0), vec![2]);
        q.clear(h);
    }

    #[test]
    fn timers_set_during_dispatch_wait_for_next_batch() {
        let mut q = TimerQueue::new();
        q.set(0.0, 0.0, 1);
        let cutoff = q.cutoff();
        assert_eq!(q.pop_due(0.0, cutoff), Some(1));
        q.set(0.0, 0.0, 2);
        assert_eq!(q.pop_due(0.0, cutoff), None);
        assert_eq!(q.drain_due(0.0), vec![2]);
    }

    #[test]
    fn clearing_inside_a_batch_suppresses_later_entries() {
        let mut q = TimerQueue::new();
        q.set(0.0, 0.1, "first");
        let second = q.set(0.0, 0.2, "second");
        let cutoff = q.cutoff();
        assert_eq!(q.pop_due(1.0, cutoff), Some("first"));
        q.clear(second);
        assert_eq!(q.pop_due(1.0, cutoff), None);
    }

    #[test]
    fn remaining_reports_time_left() {
        let mut q = TimerQueue::new();
        let h = q.set(1.0, 0.5, ());
        assert_eq!(q.remaining(h, 1.25), Some(0.25));
        q.drain_due(2.0);
        assert_eq!(q.remaining(h, 2.0), None);
    }
}
