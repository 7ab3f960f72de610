/// Game session - owns every piece of game state and drives the timers
///
/// The session is the only controller: pad clicks, mode toggles and the
/// passage of time all enter through it. Deferred work is queued as
/// [`Timer`]s and fired by [`GameSession::advance_to`], one at a time, with
/// the session clock pinned to each timer's nominal due time.
use crate::config::{GameConfig, Timings};
use crate::echo::EchoRecorder;
use crate::error::{Error, Result};
use crate::game::{ChallengeGame, CheckOutcome, PadPicker, RandomPicker, RoundPhase};
use crate::mode::{Mode, ModeSwitch};
use crate::pad::{ClickHandler, PadId, PadRegistry};
use crate::sequencer::playback::{Timer, TimerQueue};
use crate::sequencer::Sequencer;
use crate::surface::Surface;
use log::{debug, info, trace, warn};
use std::time::Duration;

pub struct GameSession<S: Surface> {
    surface: S,
    registry: PadRegistry,
    timers: TimerQueue,
    sequencer: Sequencer,
    switch: ModeSwitch,
    echo: EchoRecorder,
    game: ChallengeGame,
    timings: Timings,
    start_mode: Mode,
    intro: bool,
    now: Duration,
    best_score: usize,
}

impl<S: Surface> GameSession<S> {
    /// Build a session whose challenge pads come from `rand`, seeded from
    /// the config when it carries a seed.
    pub fn new(config: &GameConfig, surface: S) -> Result<Self> {
        let picker: Box<dyn PadPicker> = match config.seed {
            Some(seed) => Box::new(RandomPicker::seeded(seed)),
            None => Box::new(RandomPicker::from_entropy()),
        };
        Self::with_picker(config, surface, picker)
    }

    pub fn with_picker(
        config: &GameConfig,
        mut surface: S,
        picker: Box<dyn PadPicker>,
    ) -> Result<Self> {
        config.validate()?;

        let keys = config.keys();
        if let Some(missing) = keys.iter().find(|key| !surface.has_pad(**key)) {
            return Err(Error::UnknownPad(missing.0));
        }

        let switch = ModeSwitch::new(Mode::Echo);
        let registry = PadRegistry::new(keys.iter().copied(), switch.mode().click_handler())?;
        let timings = config.timings();

        surface.set_visible(switch.mode().shows_score());

        info!(
            "Session ready with pads [{}], note {:?}, echo delay {:?}",
            keys.iter().map(|k| k.to_string()).collect::<Vec<_>>().join(" "),
            timings.note_duration,
            timings.echo_delay
        );

        Ok(Self {
            surface,
            registry,
            timers: TimerQueue::new(),
            sequencer: Sequencer::new(timings.note_duration),
            switch,
            echo: EchoRecorder::new(),
            game: ChallengeGame::new(keys, picker),
            timings,
            start_mode: config.start_mode,
            intro: config.intro,
            now: Duration::ZERO,
            best_score: 0,
        })
    }

    /// Enter the configured start mode. In echo mode the intro fanfare, if
    /// enabled, plays before input opens.
    pub fn start(&mut self) {
        match self.start_mode {
            Mode::Challenge => self.enter_mode(Mode::Challenge),
            Mode::Echo if self.intro => self.play_intro(),
            Mode::Echo => {}
        }
        self.run_due();
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn registry(&self) -> &PadRegistry {
        &self.registry
    }

    pub fn echo(&self) -> &EchoRecorder {
        &self.echo
    }

    pub fn game(&self) -> &ChallengeGame {
        &self.game
    }

    pub fn mode(&self) -> Mode {
        self.switch.mode()
    }

    pub fn score(&self) -> usize {
        self.game.score()
    }

    pub fn best_score(&self) -> usize {
        self.best_score
    }

    pub fn is_playing(&self) -> bool {
        self.sequencer.is_playing()
    }

    pub fn input_enabled(&self) -> bool {
        self.registry.all_enabled()
    }

    pub fn can_toggle(&self) -> bool {
        !self.registry.mode_switch_suppressed()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_due()
    }

    /// A player pressed `pad`.
    pub fn activate(&mut self, pad: PadId) {
        let Some(handler) = self.registry.activate(pad) else {
            trace!("Click on {} ignored", pad);
            return;
        };
        debug!("Click on {} routed to {:?}", pad, handler);

        match handler {
            ClickHandler::EchoSave => self.save_echo(pad),
            ClickHandler::ChallengeCheck => self.check_challenge(pad),
        }
        self.play_pad(pad);
        self.run_due();
    }

    /// Flip between echo and challenge. Refused while a playback or round
    /// countdown holds the toggle locked.
    pub fn toggle_mode(&mut self) -> Option<Mode> {
        if !self.can_toggle() {
            debug!("Mode toggle refused, playback in progress");
            return None;
        }
        let mode = self.mode().other();
        self.enter_mode(mode);
        self.run_due();
        Some(mode)
    }

    /// Play `sequence` back through the pads, locking input meanwhile.
    pub fn playback(&mut self, sequence: &[PadId]) {
        self.schedule_playback(sequence);
        self.run_due();
    }

    pub fn advance_by(&mut self, elapsed: Duration) {
        self.advance_to(self.now.saturating_add(elapsed));
    }

    /// Fire every timer due at or before `now`, in order.
    pub fn advance_to(&mut self, now: Duration) {
        while let Some((due, timer)) = self.timers.pop_due(now) {
            self.now = self.now.max(due);
            self.fire(timer);
        }
        self.now = self.now.max(now);
    }

    fn run_due(&mut self) {
        self.advance_to(self.now);
    }

    fn fire(&mut self, timer: Timer) {
        match timer {
            Timer::Play(pad) => self.play_pad(pad),
            Timer::Release(pad) => {
                if let Some(p) = self.registry.get_mut(pad) {
                    p.release(&mut self.surface);
                }
            }
            Timer::PlaybackDone => {
                if self.sequencer.finish() {
                    self.registry.enable_all(&mut self.surface);
                    if self.switch.is(Mode::Challenge) && self.game.phase() == RoundPhase::Playing {
                        self.game.mark_awaiting_input();
                    }
                    debug!("Playback finished, input enabled");
                }
            }
            Timer::EchoCheck { generation } => {
                if !self.switch.is(Mode::Echo) {
                    trace!("Echo check {} dropped, mode changed", generation);
                    return;
                }
                match self.echo.take_if_current(generation) {
                    Some(record) => {
                        info!("Echoing {} pads", record.len());
                        self.schedule_playback(&record);
                    }
                    None => trace!("Echo check {} superseded", generation),
                }
            }
            Timer::RoundPlayback { round } => {
                if !self.switch.is(Mode::Challenge) || !self.game.is_current_round(round) {
                    trace!("Round {} playback dropped", round);
                    return;
                }
                self.game.mark_playing();
                let sequence = self.game.sequence().to_vec();
                if !self.schedule_playback(&sequence) && !self.sequencer.is_playing() {
                    self.registry.enable_all(&mut self.surface);
                    self.game.mark_awaiting_input();
                }
            }
        }
    }

    /// Returns false when nothing was scheduled.
    fn schedule_playback(&mut self, sequence: &[PadId]) -> bool {
        if let Some(unknown) = sequence.iter().find(|p| !self.registry.contains(**p)) {
            warn!("Playback skipped, unknown pad {}", unknown);
            return false;
        }
        self.sequencer
            .playback(
                sequence,
                self.now,
                &mut self.registry,
                &mut self.surface,
                &mut self.timers,
            )
            .is_some()
    }

    fn after(&self, delay: Duration) -> Duration {
        self.now.saturating_add(delay)
    }

    fn play_pad(&mut self, pad: PadId) {
        if let Some(p) = self.registry.get_mut(pad) {
            p.play(&mut self.surface);
            self.timers
                .schedule(self.after(self.timings.note_duration), Timer::Release(pad));
        }
    }

    fn play_intro(&mut self) {
        let mut fanfare = self.registry.ids();
        fanfare.extend(self.registry.ids().into_iter().rev());
        self.schedule_playback(&fanfare);
    }

    fn save_echo(&mut self, pad: PadId) {
        if !self.switch.is(Mode::Echo) {
            return;
        }
        let generation = self.echo.save(pad);
        self.timers.schedule(
            self.after(self.timings.echo_delay),
            Timer::EchoCheck { generation },
        );
    }

    fn check_challenge(&mut self, pad: PadId) {
        if !self.switch.is(Mode::Challenge) {
            return;
        }
        match self.game.check(pad) {
            CheckOutcome::Advanced { progress } => {
                debug!("Correct, {}/{}", progress, self.game.sequence().len());
            }
            CheckOutcome::OutOfTurn => debug!("Click on {} out of turn", pad),
            CheckOutcome::RoundComplete => self.start_round(),
            CheckOutcome::Mismatch { expected, got } => {
                info!(
                    "Lost at score {}: expected {}, got {}",
                    self.game.score(),
                    expected,
                    got
                );
                self.reset_game();
            }
        }
    }

    fn start_round(&mut self) {
        self.registry.disable_all(&mut self.surface);
        let (score, round) = self.game.begin_round();
        self.best_score = self.best_score.max(score);
        self.surface.set_text(&score.to_string());
        self.timers.schedule(
            self.after(self.timings.game_delay),
            Timer::RoundPlayback { round },
        );
    }

    fn reset_game(&mut self) {
        self.game.clear();
        self.start_round();
    }

    fn enter_mode(&mut self, mode: Mode) {
        self.registry.disable_all(&mut self.surface);
        self.switch.set(mode);
        self.echo.clear();
        self.game.clear();
        self.surface.set_visible(mode.shows_score());
        self.registry.set_click_handler(mode.click_handler());
        info!("Mode switched to {}", mode);

        match mode {
            Mode::Challenge => self.start_round(),
            Mode::Echo => self.registry.enable_all(&mut self.surface),
        }
    }
}
