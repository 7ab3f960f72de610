/// Sequencer - timed playback of pad sequences
///
/// A playback locks pad input, sounds each pad in its own note-wide slot and
/// unlocks input once the final note has run its course.
use crate::pad::{PadId, PadRegistry};
use crate::surface::ModeControl;
use log::debug;
use std::time::Duration;

pub mod playback;

use playback::{Timer, TimerQueue};

/// Ordered pad identifiers, duplicates allowed.
pub type Sequence = Vec<PadId>;

#[derive(Debug, Clone)]
pub struct Sequencer {
    note_duration: Duration,
    in_flight: usize,
}

impl Sequencer {
    pub fn new(note_duration: Duration) -> Self {
        Self {
            note_duration,
            in_flight: 0,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.in_flight > 0
    }

    /// Total time input stays locked for a sequence of `len` pads.
    /// Saturates at `Duration::MAX` rather than overflowing.
    pub fn span(&self, len: usize) -> Duration {
        let len = u32::try_from(len).unwrap_or(u32::MAX);
        self.note_duration.saturating_mul(len)
    }

    /// Schedule `sequence` starting at `now`. Input is disabled right away;
    /// the returned value is when the trailing [`Timer::PlaybackDone`] fires.
    pub fn playback(
        &mut self,
        sequence: &[PadId],
        now: Duration,
        registry: &mut PadRegistry,
        control: &mut dyn ModeControl,
        timers: &mut TimerQueue,
    ) -> Option<Duration> {
        if sequence.is_empty() {
            return None;
        }

        registry.disable_all(control);

        for (i, pad) in sequence.iter().enumerate() {
            timers.schedule(now.saturating_add(self.span(i)), Timer::Play(*pad));
        }

        let done = now.saturating_add(self.span(sequence.len()));
        timers.schedule(done, Timer::PlaybackDone);
        self.in_flight += 1;

        debug!(
            "Playback of {} pads scheduled, input locked until {:?}",
            sequence.len(),
            done
        );
        Some(done)
    }

    /// Mark one playback as finished. Returns true when none remain.
    pub fn finish(&mut self) -> bool {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.in_flight == 0
    }
}
