/// Game mode and the switch between them
use crate::pad::ClickHandler;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Echo,
    Challenge,
}

impl Mode {
    pub fn other(self) -> Self {
        match self {
            Mode::Echo => Mode::Challenge,
            Mode::Challenge => Mode::Echo,
        }
    }

    pub fn click_handler(self) -> ClickHandler {
        match self {
            Mode::Echo => ClickHandler::EchoSave,
            Mode::Challenge => ClickHandler::ChallengeCheck,
        }
    }

    pub fn shows_score(self) -> bool {
        self == Mode::Challenge
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Echo => write!(f, "echo"),
            Mode::Challenge => write!(f, "challenge"),
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "echo" => Ok(Mode::Echo),
            "challenge" | "game" => Ok(Mode::Challenge),
            other => Err(format!("unknown mode '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ModeSwitch {
    mode: Mode,
}

impl ModeSwitch {
    pub fn new(mode: Mode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is(&self, mode: Mode) -> bool {
        self.mode == mode
    }

    pub fn set(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn flip(&mut self) -> Mode {
        self.mode = self.mode.other();
        self.mode
    }
}
