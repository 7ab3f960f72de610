/// Playback clock - deferred triggers on a single logical thread
///
/// Every delayed action in the game is a [`Timer`] sitting in a
/// [`TimerQueue`]. Whoever owns the queue advances a virtual clock and fires
/// due timers one at a time, so each callback runs to completion before the
/// next one starts.
use crate::pad::PadId;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timer {
    /// Sound a pad as one slot of a scripted playback.
    Play(PadId),
    /// A note's duration has elapsed.
    Release(PadId),
    /// The last slot of a playback has finished.
    PlaybackDone,
    /// Echo debounce check for the given save generation.
    EchoCheck { generation: u64 },
    /// Pause before a challenge round is played back.
    RoundPlayback { round: u64 },
}

#[derive(Debug)]
struct Entry {
    due: Duration,
    seq: u64,
    timer: Timer,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due
            .cmp(&other.due)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Timers ordered by due time, ties broken by scheduling order.
#[derive(Debug, Default)]
pub struct TimerQueue {
    entries: BinaryHeap<Reverse<Entry>>,
    next_seq: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due: Duration, timer: Timer) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Reverse(Entry { due, seq, timer }));
    }

    /// Pop the earliest timer if it is due at `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<(Duration, Timer)> {
        match self.entries.peek() {
            Some(Reverse(entry)) if entry.due <= now => {}
            _ => return None,
        }
        self.entries
            .pop()
            .map(|Reverse(entry)| (entry.due, entry.timer))
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.entries.peek().map(|Reverse(entry)| entry.due)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
