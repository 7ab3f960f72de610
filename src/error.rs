/// Setup and front-end errors
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("pad alphabet is empty")]
    EmptyAlphabet,

    #[error("pad '{0}' is declared more than once")]
    DuplicatePad(char),

    #[error("pad '{0}' has no playable unit behind it")]
    UnknownPad(char),

    #[error("{0} must be between 1 ms and ten minutes")]
    InvalidTiming(&'static str),

    #[error("failed to read config: {0}")]
    ConfigRead(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("MIDI error: {0}")]
    Midi(String),
}

pub type Result<T> = std::result::Result<T, Error>;
