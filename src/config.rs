/// Game configuration - timings and the pad alphabet
use crate::error::{Error, Result};
use crate::mode::Mode;
use crate::pad::PadId;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PadConfig {
    pub key: PadId,
    /// MIDI note sounded by the desktop front end.
    pub note: u8,
    #[serde(default = "default_color")]
    pub color: [u8; 3],
}

fn default_color() -> [u8; 3] {
    [128, 128, 128]
}

/// Longest accepted delay of any kind (ten minutes).
pub const MAX_DELAY_MS: u64 = 10 * 60 * 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub note_duration_ms: u64,
    pub echo_delay_ms: u64,
    /// Pause before a challenge round plays. Twice the note duration if unset.
    pub game_delay_ms: Option<u64>,
    pub seed: Option<u64>,
    /// Play every pad up and down before echo input opens.
    pub intro: bool,
    pub start_mode: Mode,
    pub pads: Vec<PadConfig>,
}

impl Default for GameConfig {
    fn default() -> Self {
        let pad = |key, note, color| PadConfig {
            key: PadId(key),
            note,
            color,
        };
        Self {
            note_duration_ms: 1000,
            echo_delay_ms: 2500,
            game_delay_ms: None,
            seed: None,
            intro: false,
            start_mode: Mode::Echo,
            pads: vec![
                pad('c', 60, [220, 60, 60]),
                pad('d', 62, [60, 170, 80]),
                pad('e', 64, [60, 110, 220]),
                pad('f', 65, [230, 200, 60]),
            ],
        }
    }
}

/// Resolved delays used by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub note_duration: Duration,
    pub echo_delay: Duration,
    pub game_delay: Duration,
}

impl GameConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: GameConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.pads.is_empty() {
            return Err(Error::EmptyAlphabet);
        }
        for (i, pad) in self.pads.iter().enumerate() {
            if self.pads[..i].iter().any(|p| p.key == pad.key) {
                return Err(Error::DuplicatePad(pad.key.0));
            }
        }
        let delays = [
            ("note_duration_ms", Some(self.note_duration_ms)),
            ("echo_delay_ms", Some(self.echo_delay_ms)),
            ("game_delay_ms", self.game_delay_ms),
        ];
        for (name, ms) in delays {
            if let Some(ms) = ms {
                if ms == 0 || ms > MAX_DELAY_MS {
                    return Err(Error::InvalidTiming(name));
                }
            }
        }
        Ok(())
    }

    pub fn keys(&self) -> Vec<PadId> {
        self.pads.iter().map(|p| p.key).collect()
    }

    pub fn pad(&self, key: PadId) -> Option<&PadConfig> {
        self.pads.iter().find(|p| p.key == key)
    }

    pub fn timings(&self) -> Timings {
        Timings {
            note_duration: Duration::from_millis(self.note_duration_ms),
            echo_delay: Duration::from_millis(self.echo_delay_ms),
            game_delay: Duration::from_millis(
                self.game_delay_ms
                    .unwrap_or(self.note_duration_ms.saturating_mul(2)),
            ),
        }
    }
}
