/// Pads and the registry that owns them
use crate::error::{Error, Result};
use crate::surface::{ModeControl, PadVoice};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a single pad, one symbol of the configured alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PadId(pub char);

impl fmt::Display for PadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<char> for PadId {
    fn from(key: char) -> Self {
        PadId(key)
    }
}

/// One playable key.
///
/// `active_count` tracks plays still in flight so that overlapping plays of
/// the same pad keep it lit until the last one is released.
#[derive(Debug, Clone)]
pub struct Pad {
    id: PadId,
    enabled: bool,
    active_count: usize,
}

impl Pad {
    pub fn new(id: PadId) -> Self {
        Self {
            id,
            enabled: true,
            active_count: 0,
        }
    }

    pub fn id(&self) -> PadId {
        self.id
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_active(&self) -> bool {
        self.active_count > 0
    }

    pub fn active_count(&self) -> usize {
        self.active_count
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Does not cut an in-flight play short.
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Sound the pad and light it. The caller schedules the matching
    /// [`Pad::release`] one note duration later.
    pub fn play(&mut self, voice: &mut dyn PadVoice) {
        self.active_count += 1;
        voice.sound(self.id);
        voice.set_lit(self.id, true);
    }

    pub fn release(&mut self, voice: &mut dyn PadVoice) {
        self.active_count = self.active_count.saturating_sub(1);
        if self.active_count == 0 {
            voice.set_lit(self.id, false);
        }
    }
}

/// Which game operation receives pad clicks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickHandler {
    EchoSave,
    ChallengeCheck,
}

#[derive(Debug, Clone)]
pub struct PadRegistry {
    pads: Vec<Pad>,
    handler: ClickHandler,
    switch_suppressed: bool,
}

impl PadRegistry {
    pub fn new(ids: impl IntoIterator<Item = PadId>, handler: ClickHandler) -> Result<Self> {
        let mut pads: Vec<Pad> = Vec::new();
        for id in ids {
            if pads.iter().any(|p| p.id == id) {
                return Err(Error::DuplicatePad(id.0));
            }
            pads.push(Pad::new(id));
        }

        if pads.is_empty() {
            return Err(Error::EmptyAlphabet);
        }

        Ok(Self {
            pads,
            handler,
            switch_suppressed: false,
        })
    }

    pub fn ids(&self) -> Vec<PadId> {
        self.pads.iter().map(|p| p.id).collect()
    }

    pub fn len(&self) -> usize {
        self.pads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pads.is_empty()
    }

    pub fn contains(&self, id: PadId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: PadId) -> Option<&Pad> {
        self.pads.iter().find(|p| p.id == id)
    }

    pub fn get_mut(&mut self, id: PadId) -> Option<&mut Pad> {
        self.pads.iter_mut().find(|p| p.id == id)
    }

    pub fn pads(&self) -> &[Pad] {
        &self.pads
    }

    pub fn click_handler(&self) -> ClickHandler {
        self.handler
    }

    pub fn set_click_handler(&mut self, handler: ClickHandler) {
        self.handler = handler;
    }

    pub fn all_enabled(&self) -> bool {
        self.pads.iter().all(Pad::is_enabled)
    }

    pub fn mode_switch_suppressed(&self) -> bool {
        self.switch_suppressed
    }

    pub fn enable_all(&mut self, control: &mut dyn ModeControl) {
        for pad in &mut self.pads {
            pad.enable();
        }
        if self.switch_suppressed {
            self.switch_suppressed = false;
            control.set_interactive(true);
        }
    }

    pub fn disable_all(&mut self, control: &mut dyn ModeControl) {
        for pad in &mut self.pads {
            pad.disable();
        }
        if !self.switch_suppressed {
            self.switch_suppressed = true;
            control.set_interactive(false);
        }
    }

    /// Returns the handler a click on `id` should be routed to, or `None`
    /// when the pad is unknown or disabled.
    pub fn activate(&self, id: PadId) -> Option<ClickHandler> {
        match self.get(id) {
            Some(pad) if pad.is_enabled() => Some(self.handler),
            _ => None,
        }
    }
}
