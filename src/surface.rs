/// Front-end capabilities consumed by the game core
///
/// The core never renders anything itself. It asks a surface to sound a pad,
/// light or darken it, show the score and lock the mode toggle.
use crate::pad::PadId;

pub trait PadVoice {
    /// Start the pad's sound from the beginning.
    fn sound(&mut self, pad: PadId);

    fn set_lit(&mut self, pad: PadId, lit: bool);

    /// Whether a playable unit exists for `pad`. Checked once at setup.
    fn has_pad(&self, _pad: PadId) -> bool {
        true
    }
}

pub trait ScoreDisplay {
    fn set_text(&mut self, text: &str);
    fn set_visible(&mut self, visible: bool);
}

pub trait ModeControl {
    /// Lock or unlock the external mode toggle.
    fn set_interactive(&mut self, interactive: bool);
}

pub trait Surface: PadVoice + ScoreDisplay + ModeControl {}

impl<T: PadVoice + ScoreDisplay + ModeControl> Surface for T {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    Sound(PadId),
    Lit(PadId, bool),
    ScoreText(String),
    ScoreVisible(bool),
    Interactive(bool),
}

/// A surface that only remembers what it was asked to do.
///
/// Handy for headless embedding and for asserting on the exact stream of
/// front-end calls.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Vec<SurfaceEvent>,
    known: Option<Vec<PadId>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only the given pads have a playable unit.
    pub fn with_pads(pads: impl IntoIterator<Item = PadId>) -> Self {
        Self {
            events: Vec::new(),
            known: Some(pads.into_iter().collect()),
        }
    }

    pub fn events(&self) -> &[SurfaceEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Pads sounded so far, in order.
    pub fn sounded(&self) -> Vec<PadId> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SurfaceEvent::Sound(pad) => Some(*pad),
                _ => None,
            })
            .collect()
    }

    pub fn last_score_text(&self) -> Option<&str> {
        self.events.iter().rev().find_map(|e| match e {
            SurfaceEvent::ScoreText(text) => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn score_visible(&self) -> Option<bool> {
        self.events.iter().rev().find_map(|e| match e {
            SurfaceEvent::ScoreVisible(visible) => Some(*visible),
            _ => None,
        })
    }

    pub fn interactive(&self) -> Option<bool> {
        self.events.iter().rev().find_map(|e| match e {
            SurfaceEvent::Interactive(interactive) => Some(*interactive),
            _ => None,
        })
    }
}

impl PadVoice for EventLog {
    fn sound(&mut self, pad: PadId) {
        self.events.push(SurfaceEvent::Sound(pad));
    }

    fn set_lit(&mut self, pad: PadId, lit: bool) {
        self.events.push(SurfaceEvent::Lit(pad, lit));
    }

    fn has_pad(&self, pad: PadId) -> bool {
        self.known.as_ref().map_or(true, |known| known.contains(&pad))
    }
}

impl ScoreDisplay for EventLog {
    fn set_text(&mut self, text: &str) {
        self.events.push(SurfaceEvent::ScoreText(text.to_string()));
    }

    fn set_visible(&mut self, visible: bool) {
        self.events.push(SurfaceEvent::ScoreVisible(visible));
    }
}

impl ModeControl for EventLog {
    fn set_interactive(&mut self, interactive: bool) {
        self.events.push(SurfaceEvent::Interactive(interactive));
    }
}
