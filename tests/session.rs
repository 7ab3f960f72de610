//! Session-level scenarios for echo and challenge play.
//!
//! Time is virtual: each test advances the session clock explicitly, and an
//! `EventLog` surface records every front-end call for inspection.

use std::time::Duration;

use echopad::config::GameConfig;
use echopad::game::ScriptedPicker;
use echopad::mode::Mode;
use echopad::pad::PadId;
use echopad::session::GameSession;
use echopad::surface::{EventLog, SurfaceEvent};

// ─── Helpers ───────────────────────────────────────────────────────────────

const NOTE: u64 = 1000;
const ECHO: u64 = 2500;
const GAME: u64 = 2 * NOTE;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn pads(keys: &str) -> Vec<PadId> {
    keys.chars().map(PadId).collect()
}

fn session_with_script(script: &str) -> GameSession<EventLog> {
    let config = GameConfig {
        intro: false,
        ..GameConfig::default()
    };
    let picker = ScriptedPicker::new(pads(script));
    GameSession::with_picker(&config, EventLog::new(), Box::new(picker)).unwrap()
}

fn echo_session() -> GameSession<EventLog> {
    session_with_script("c")
}

/// Number of times the surface saw input locked (a playback or round start).
fn lock_count(log: &EventLog) -> usize {
    log.events()
        .iter()
        .filter(|e| **e == SurfaceEvent::Interactive(false))
        .count()
}

/// Toggle into challenge mode and wait until the first round is playable.
fn enter_challenge(s: &mut GameSession<EventLog>) {
    assert_eq!(s.toggle_mode(), Some(Mode::Challenge));
    let len = s.game().sequence().len() as u64;
    s.advance_by(ms(GAME + len * NOTE));
    assert!(s.input_enabled());
}

/// Repeat the current challenge correctly, then wait for the next round.
fn play_round_correctly(s: &mut GameSession<EventLog>) {
    let sequence = s.game().sequence().to_vec();
    for pad in sequence {
        s.activate(pad);
    }
    let len = s.game().sequence().len() as u64;
    s.advance_by(ms(GAME + len * NOTE));
    assert!(s.input_enabled());
}

// ─── Sequencer ─────────────────────────────────────────────────────────────

#[test]
fn playback_locks_input_for_exactly_its_length() {
    for keys in ["c", "cd", "fedc", "ccccc"] {
        let mut s = echo_session();
        let start = ms(123);
        s.advance_to(start);

        s.playback(&pads(keys));
        assert!(!s.input_enabled(), "locked right after playback({keys})");
        assert!(s.is_playing());

        let span = ms(NOTE * keys.len() as u64);
        s.advance_to(start + span - ms(1));
        assert!(!s.input_enabled(), "still locked just before the end of {keys}");

        s.advance_to(start + span);
        assert!(s.input_enabled(), "unlocked at the end of {keys}");
        assert!(!s.is_playing());
    }
}

#[test]
fn playback_sounds_pads_in_fixed_slots() {
    let mut s = echo_session();
    s.playback(&pads("dfd"));
    assert_eq!(s.surface().sounded(), pads("d"));

    s.advance_to(ms(NOTE - 1));
    assert_eq!(s.surface().sounded(), pads("d"));
    s.advance_to(ms(NOTE));
    assert_eq!(s.surface().sounded(), pads("df"));
    s.advance_to(ms(2 * NOTE));
    assert_eq!(s.surface().sounded(), pads("dfd"));
}

#[test]
fn back_to_back_plays_of_one_pad_stay_lit() {
    let mut s = echo_session();
    s.playback(&pads("ee"));

    // first release and second play land on the same instant
    s.advance_to(ms(NOTE));
    assert!(s.registry().get(PadId('e')).unwrap().is_active());

    s.advance_to(ms(2 * NOTE));
    assert!(!s.registry().get(PadId('e')).unwrap().is_active());

    let darkened = s
        .surface()
        .events()
        .iter()
        .filter(|e| **e == SurfaceEvent::Lit(PadId('e'), false))
        .count();
    assert_eq!(darkened, 1);
}

#[test]
fn empty_playback_changes_nothing() {
    let mut s = echo_session();
    s.surface_mut().clear();
    s.playback(&[]);
    assert!(s.input_enabled());
    assert!(s.surface().events().is_empty());
    assert_eq!(s.next_deadline(), None);
}

// ─── Echo mode ─────────────────────────────────────────────────────────────

#[test]
fn echo_replays_quick_clicks_once() {
    let mut s = echo_session();
    s.activate(PadId('c'));
    s.advance_by(ms(500));
    s.activate(PadId('d'));
    s.advance_by(ms(500));
    s.activate(PadId('e'));
    assert_eq!(s.echo().record(), pads("cde").as_slice());
    s.surface_mut().clear();

    s.advance_by(ms(ECHO));
    assert!(s.echo().record().is_empty());
    assert!(!s.input_enabled());

    s.advance_by(ms(10 * NOTE));
    assert_eq!(s.surface().sounded(), pads("cde"));
    assert_eq!(lock_count(s.surface()), 1);
    assert!(s.input_enabled());
}

#[test]
fn echo_check_is_debounced() {
    let mut s = echo_session();
    s.activate(PadId('c'));
    s.advance_by(ms(ECHO / 2));
    s.activate(PadId('d'));
    s.surface_mut().clear();

    // the first click's check fires here and must not play
    s.advance_to(ms(ECHO));
    assert!(s.surface().sounded().is_empty());
    assert_eq!(s.echo().record(), pads("cd").as_slice());

    s.advance_by(ms(ECHO));
    s.advance_by(ms(10 * NOTE));
    assert_eq!(s.surface().sounded(), pads("cd"));
    assert_eq!(lock_count(s.surface()), 1);
}

#[test]
fn echo_waits_the_full_delay() {
    let mut s = echo_session();
    s.activate(PadId('f'));
    s.advance_to(ms(ECHO - 1));
    assert!(s.input_enabled());
    assert_eq!(s.echo().record(), pads("f").as_slice());

    s.advance_to(ms(ECHO));
    assert!(!s.input_enabled());
    assert!(s.echo().record().is_empty());
}

// ─── Challenge mode ────────────────────────────────────────────────────────

#[test]
fn fresh_challenge_has_one_pad() {
    let mut s = session_with_script("dcef");
    assert_eq!(s.toggle_mode(), Some(Mode::Challenge));
    assert_eq!(s.game().sequence(), pads("d").as_slice());
    assert_eq!(s.game().progress(), 0);
    assert!(!s.input_enabled());
    assert_eq!(s.surface().last_score_text(), Some("0"));
    assert_eq!(s.surface().score_visible(), Some(true));
}

#[test]
fn round_waits_game_delay_before_playing() {
    let mut s = session_with_script("e");
    s.toggle_mode();
    s.surface_mut().clear();

    s.advance_to(ms(GAME - 1));
    assert!(s.surface().sounded().is_empty());
    s.advance_to(ms(GAME));
    assert_eq!(s.surface().sounded(), pads("e"));
    s.advance_to(ms(GAME + NOTE));
    assert!(s.input_enabled());
}

#[test]
fn correct_click_starts_next_round() {
    let mut s = session_with_script("cf");
    enter_challenge(&mut s);

    s.activate(PadId('c'));
    assert_eq!(s.game().sequence(), pads("cf").as_slice());
    assert_eq!(s.game().progress(), 0);
    assert_eq!(s.surface().last_score_text(), Some("1"));
    assert!(!s.input_enabled());
}

#[test]
fn wrong_click_resets_to_one_pad() {
    let mut s = session_with_script("cdef");
    enter_challenge(&mut s);
    play_round_correctly(&mut s);
    assert_eq!(s.game().sequence().len(), 2);

    s.activate(PadId('f'));
    assert_eq!(s.game().sequence().len(), 1);
    assert_eq!(s.game().progress(), 0);
    assert_eq!(s.surface().last_score_text(), Some("0"));
}

#[test]
fn wrong_first_click_restarts_round() {
    let mut s = session_with_script("ed");
    enter_challenge(&mut s);

    s.activate(PadId('c'));
    assert_eq!(s.game().sequence(), pads("d").as_slice());
    assert_eq!(s.score(), 0);
}

#[test]
fn scripted_rounds_follow_the_script() {
    let script = "fcedcfed";
    let mut s = session_with_script(script);
    enter_challenge(&mut s);

    for _ in 0..script.len() - 1 {
        play_round_correctly(&mut s);
    }
    assert_eq!(s.game().sequence(), pads(script).as_slice());
    assert_eq!(s.score(), script.len() - 1);
    assert_eq!(s.best_score(), script.len() - 1);
}

#[test]
fn off_alphabet_pick_still_plays_a_known_pad() {
    let mut s = session_with_script("x");
    assert_eq!(s.toggle_mode(), Some(Mode::Challenge));
    s.advance_by(ms(GAME + NOTE));

    assert!(s.input_enabled());
    assert!(s.can_toggle());
    assert_eq!(s.game().sequence(), pads("c").as_slice());
    assert_eq!(s.toggle_mode(), Some(Mode::Echo));
}

#[test]
fn partial_progress_keeps_input_open() {
    let mut s = session_with_script("cd");
    enter_challenge(&mut s);
    play_round_correctly(&mut s);

    s.activate(PadId('c'));
    assert_eq!(s.game().progress(), 1);
    assert!(s.input_enabled());
    assert!(s.can_toggle());
}

// ─── Mode switching ────────────────────────────────────────────────────────

#[test]
fn switching_to_challenge_drops_pending_echo() {
    let mut s = session_with_script("f");
    s.activate(PadId('c'));
    s.advance_by(ms(NOTE));

    assert_eq!(s.toggle_mode(), Some(Mode::Challenge));
    assert!(s.echo().record().is_empty());
    assert_eq!(s.game().sequence(), pads("f").as_slice());
    s.surface_mut().clear();

    s.advance_by(ms(ECHO + GAME + NOTE));
    assert_eq!(s.surface().sounded(), pads("f"));
}

#[test]
fn switching_back_to_echo_clears_challenge() {
    let mut s = session_with_script("cd");
    enter_challenge(&mut s);
    play_round_correctly(&mut s);

    assert_eq!(s.toggle_mode(), Some(Mode::Echo));
    assert!(s.game().sequence().is_empty());
    assert_eq!(s.score(), 0);
    assert!(s.input_enabled());
    assert_eq!(s.surface().score_visible(), Some(false));

    s.activate(PadId('e'));
    assert_eq!(s.echo().record(), pads("e").as_slice());
}

#[test]
fn toggle_is_locked_while_round_is_pending() {
    let mut s = session_with_script("c");
    s.toggle_mode();
    assert!(!s.can_toggle());
    assert_eq!(s.toggle_mode(), None);
    assert_eq!(s.mode(), Mode::Challenge);

    s.advance_by(ms(GAME + NOTE));
    assert!(s.can_toggle());
}

#[test]
fn clicks_in_challenge_are_not_recorded() {
    let mut s = session_with_script("cc");
    enter_challenge(&mut s);
    s.activate(PadId('c'));
    assert!(s.echo().record().is_empty());
}

// ─── Config ────────────────────────────────────────────────────────────────

#[test]
fn demo_config_matches_defaults() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/echopad.toml");
    let config = GameConfig::load(path).unwrap();
    assert_eq!(config, GameConfig::default());
}
