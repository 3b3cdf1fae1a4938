//! The time-ordered wake queue.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use pl_core::{SimTime, TaskId};

/// A scheduled resumption: wake `task` at `at`.
///
/// `seq` is assigned monotonically at scheduling time and orders wakes that
/// share the same instant (FIFO among simultaneous events).
#[derive(Debug)]
struct ScheduledWake {
    at: SimTime,
    seq: u64,
    task: TaskId,
}

impl PartialEq for ScheduledWake {
    fn eq(&self, other: &Self) -> bool {
        self.at == other.at && self.seq == other.seq
    }
}

impl Eq for ScheduledWake {}

impl PartialOrd for ScheduledWake {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledWake {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap, we need the earliest wake first.
        other
            .at
            .cmp(&self.at)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Min-heap of pending wakes with an internal sequence counter.
#[derive(Default)]
pub(crate) struct WakeHeap {
    heap: BinaryHeap<ScheduledWake>,
    next_seq: u64,
}

impl WakeHeap {
    /// Schedule `task` to wake at `at`, after every wake already scheduled
    /// for that instant.
    pub(crate) fn push(&mut self, at: SimTime, task: TaskId) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(ScheduledWake { at, seq, task });
    }

    /// Remove and return the earliest wake, provided it is at or before
    /// `limit`.
    pub(crate) fn pop_within(&mut self, limit: SimTime) -> Option<(SimTime, TaskId)> {
        if self.heap.peek()?.at > limit {
            return None;
        }
        self.heap.pop().map(|w| (w.at, w.task))
    }

    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }
}
