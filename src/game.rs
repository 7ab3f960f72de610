/// Challenge game - a growing random sequence to repeat
use crate::pad::PadId;
use crate::sequencer::Sequence;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Chooses the pad appended to the challenge each round.
pub trait PadPicker {
    fn pick(&mut self, pads: &[PadId]) -> PadId;
}

/// Uniform choice backed by a `rand` generator.
pub struct RandomPicker<R> {
    rng: R,
}

impl<R: Rng> RandomPicker<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomPicker<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> PadPicker for RandomPicker<R> {
    fn pick(&mut self, pads: &[PadId]) -> PadId {
        pads[self.rng.gen_range(0..pads.len())]
    }
}

/// Replays a fixed list of pads, cycling when exhausted.
#[derive(Debug, Clone)]
pub struct ScriptedPicker {
    script: Vec<PadId>,
    cursor: usize,
}

impl ScriptedPicker {
    pub fn new(script: impl IntoIterator<Item = PadId>) -> Self {
        Self {
            script: script.into_iter().collect(),
            cursor: 0,
        }
    }
}

impl PadPicker for ScriptedPicker {
    fn pick(&mut self, pads: &[PadId]) -> PadId {
        if self.script.is_empty() {
            return pads[0];
        }
        let pad = self.script[self.cursor % self.script.len()];
        self.cursor += 1;
        pad
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    /// Waiting out the pause before the round is played back.
    AwaitingRound,
    Playing,
    AwaitingInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    Advanced { progress: usize },
    /// No pad is expected right now; the click does not count.
    OutOfTurn,
    RoundComplete,
    Mismatch { expected: PadId, got: PadId },
}

pub struct ChallengeGame {
    alphabet: Vec<PadId>,
    sequence: Sequence,
    progress: usize,
    phase: RoundPhase,
    round: u64,
    picker: Box<dyn PadPicker>,
}

impl ChallengeGame {
    pub fn new(alphabet: Vec<PadId>, picker: Box<dyn PadPicker>) -> Self {
        Self {
            alphabet,
            sequence: Vec::new(),
            progress: 0,
            phase: RoundPhase::AwaitingRound,
            round: 0,
            picker,
        }
    }

    pub fn sequence(&self) -> &[PadId] {
        &self.sequence
    }

    pub fn progress(&self) -> usize {
        self.progress
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    /// Rounds completed in the current run.
    pub fn score(&self) -> usize {
        self.sequence.len().saturating_sub(1)
    }

    /// Grow the challenge by one pad. Returns the score to display (the
    /// length before growing) and the token the delayed playback must carry.
    pub fn begin_round(&mut self) -> (usize, u64) {
        let score = self.sequence.len();
        self.progress = 0;
        let mut pad = self.picker.pick(&self.alphabet);
        if !self.alphabet.contains(&pad) {
            let fallback = self.alphabet[self.sequence.len() % self.alphabet.len()];
            warn!("Picker chose unknown pad {}, using {}", pad, fallback);
            pad = fallback;
        }
        self.sequence.push(pad);
        self.phase = RoundPhase::AwaitingRound;
        self.round += 1;
        info!("Round {} started, sequence length {}", score + 1, self.sequence.len());
        (score, self.round)
    }

    pub fn is_current_round(&self, round: u64) -> bool {
        self.round == round
    }

    pub fn mark_playing(&mut self) {
        self.phase = RoundPhase::Playing;
    }

    pub fn mark_awaiting_input(&mut self) {
        self.phase = RoundPhase::AwaitingInput;
    }

    pub fn check(&mut self, pad: PadId) -> CheckOutcome {
        let expected = match self.sequence.get(self.progress) {
            Some(expected) => *expected,
            None => return CheckOutcome::OutOfTurn,
        };

        if expected != pad {
            debug!("Expected {} but got {}", expected, pad);
            return CheckOutcome::Mismatch { expected, got: pad };
        }

        self.progress += 1;
        if self.progress == self.sequence.len() {
            CheckOutcome::RoundComplete
        } else {
            CheckOutcome::Advanced {
                progress: self.progress,
            }
        }
    }

    /// Forget the challenge and invalidate any pending round playback.
    pub fn clear(&mut self) {
        self.sequence.clear();
        self.progress = 0;
        self.phase = RoundPhase::AwaitingRound;
        self.round += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alphabet() -> Vec<PadId> {
        "cdef".chars().map(PadId).collect()
    }

    fn scripted(keys: &str) -> ChallengeGame {
        ChallengeGame::new(
            alphabet(),
            Box::new(ScriptedPicker::new(keys.chars().map(PadId))),
        )
    }

    #[test]
    fn test_begin_round_grows_by_one() {
        let mut game = scripted("dfc");
        assert_eq!(game.begin_round().0, 0);
        assert_eq!(game.sequence(), &[PadId('d')]);
        assert_eq!(game.begin_round().0, 1);
        assert_eq!(game.sequence(), &[PadId('d'), PadId('f')]);
        assert_eq!(game.progress(), 0);
        assert_eq!(game.score(), 1);
    }

    #[test]
    fn test_check_progress_and_completion() {
        let mut game = scripted("ce");
        game.begin_round();
        game.begin_round();

        assert_eq!(game.check(PadId('c')), CheckOutcome::Advanced { progress: 1 });
        assert_eq!(game.check(PadId('e')), CheckOutcome::RoundComplete);
    }

    #[test]
    fn test_check_mismatch() {
        let mut game = scripted("c");
        game.begin_round();
        assert_eq!(
            game.check(PadId('d')),
            CheckOutcome::Mismatch {
                expected: PadId('c'),
                got: PadId('d')
            }
        );
        assert_eq!(game.progress(), 0);
    }

    #[test]
    fn test_unknown_pick_falls_back_to_alphabet() {
        let mut game = scripted("xy");
        game.begin_round();
        game.begin_round();
        assert_eq!(game.sequence(), &[PadId('c'), PadId('d')]);
    }

    #[test]
    fn test_check_without_challenge_does_not_score() {
        let mut game = scripted("c");
        assert_eq!(game.check(PadId('c')), CheckOutcome::OutOfTurn);
        assert!(game.sequence().is_empty());

        game.begin_round();
        assert_eq!(game.check(PadId('c')), CheckOutcome::RoundComplete);
        assert_eq!(game.check(PadId('c')), CheckOutcome::OutOfTurn);
        assert_eq!(game.sequence().len(), 1);
    }

    #[test]
    fn test_clear_invalidates_round_token() {
        let mut game = scripted("c");
        let (_, round) = game.begin_round();
        assert!(game.is_current_round(round));
        game.clear();
        assert!(!game.is_current_round(round));
        assert!(game.sequence().is_empty());
    }

    #[test]
    fn test_seeded_picker_is_reproducible() {
        let pads = alphabet();
        let mut a = RandomPicker::seeded(42);
        let mut b = RandomPicker::seeded(42);
        for _ in 0..32 {
            let pick = a.pick(&pads);
            assert!(pads.contains(&pick));
            assert_eq!(pick, b.pick(&pads));
        }
    }
}
