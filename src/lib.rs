/// ECHOPAD - a pad-based audio memory game
///
/// This library provides the core of the game:
/// - Pads with reentrant "lit" indicators and a registry for bulk input locking
/// - A sequencer that plays pad sequences in fixed note-wide slots
/// - Echo mode (debounced record and replay) and challenge mode (repeat a
///   growing random sequence)
/// - A single session controller driven by a virtual clock
/// - Audio and MIDI output for the desktop front end

pub mod config;
pub mod echo;
pub mod error;
pub mod game;
pub mod mode;
pub mod pad;
pub mod sequencer;
pub mod session;
pub mod surface;

#[cfg(feature = "audio")]
pub mod audio;
#[cfg(feature = "audio")]
pub mod midi;

// Re-export commonly used types
pub use config::{GameConfig, PadConfig, Timings};
pub use error::{Error, Result};
pub use mode::Mode;
pub use pad::{PadId, PadRegistry};
pub use sequencer::playback::{Timer, TimerQueue};
pub use sequencer::Sequencer;
pub use session::GameSession;
pub use surface::{EventLog, ModeControl, PadVoice, ScoreDisplay, Surface};

#[cfg(feature = "audio")]
pub use audio::AudioOutput;
#[cfg(feature = "audio")]
pub use midi::{midi_note_name, MidiOutputDevice};
