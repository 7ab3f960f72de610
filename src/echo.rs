/// Echo recorder - debounced record and replay
///
/// Each save bumps a generation number. A deferred check only flushes the
/// record when it still carries the latest generation, so only the check
/// belonging to the most recent click can fire.
use crate::pad::PadId;
use crate::sequencer::Sequence;

#[derive(Debug, Clone, Default)]
pub struct EchoRecorder {
    record: Sequence,
    generation: u64,
}

impl EchoRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self) -> &[PadId] {
        &self.record
    }

    /// Append a click and return the generation the deferred check must carry.
    pub fn save(&mut self, pad: PadId) -> u64 {
        self.record.push(pad);
        self.generation += 1;
        self.generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    /// Hand over the record if no click superseded `generation`.
    pub fn take_if_current(&mut self, generation: u64) -> Option<Sequence> {
        if !self.is_current(generation) || self.record.is_empty() {
            return None;
        }
        Some(std::mem::take(&mut self.record))
    }

    /// Drop the record and invalidate any pending check.
    pub fn clear(&mut self) {
        self.record.clear();
        self.generation += 1;
    }
}
