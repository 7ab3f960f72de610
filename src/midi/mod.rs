/// MIDI output using midir
///
/// Mirrors pad plays to an external synth. The device owns the pad to note
/// map taken from the config, so callers talk in pads, never raw notes.
use crate::config::PadConfig;
use crate::error::{Error, Result};
use crate::pad::PadId;
use log::debug;
use midir::{MidiOutput, MidiOutputConnection};
use std::collections::{HashMap, HashSet};

const CLIENT_NAME: &str = "ECHOPAD MIDI Output";
const VELOCITY: u8 = 100;

/// Note-on bytes for `channel` (0-15).
pub fn note_on_message(channel: u8, note: u8, velocity: u8) -> [u8; 3] {
    [0x90 | (channel & 0x0F), note & 0x7F, velocity & 0x7F]
}

/// Note-off bytes for `channel` (0-15).
pub fn note_off_message(channel: u8, note: u8) -> [u8; 3] {
    [0x80 | (channel & 0x0F), note & 0x7F, 0]
}

pub struct MidiOutputDevice {
    connection: Option<MidiOutputConnection>,
    channel: u8,
    notes: HashMap<PadId, u8>,
    sounding: HashSet<PadId>,
}

impl MidiOutputDevice {
    pub fn new(pads: &[PadConfig]) -> Self {
        Self {
            connection: None,
            channel: 0,
            notes: pads.iter().map(|p| (p.key, p.note)).collect(),
            sounding: HashSet::new(),
        }
    }

    pub fn with_channel(mut self, channel: u8) -> Self {
        self.channel = channel & 0x0F;
        self
    }

    pub fn available_ports() -> Vec<String> {
        if let Ok(midi_out) = MidiOutput::new(CLIENT_NAME) {
            midi_out
                .ports()
                .iter()
                .filter_map(|p| midi_out.port_name(p).ok())
                .collect()
        } else {
            vec![]
        }
    }

    /// Connect to the output port at `port_index` and return its name.
    pub fn connect(&mut self, port_index: usize) -> Result<String> {
        let midi_out = MidiOutput::new(CLIENT_NAME)
            .map_err(|e| Error::Midi(format!("failed to create MIDI output: {}", e)))?;

        let ports = midi_out.ports();
        let port = ports
            .get(port_index)
            .ok_or_else(|| Error::Midi(format!("invalid port index {}", port_index)))?;
        let name = midi_out
            .port_name(port)
            .unwrap_or_else(|_| format!("port {}", port_index));

        let connection = midi_out
            .connect(port, "echopad")
            .map_err(|e| Error::Midi(format!("failed to connect: {}", e)))?;

        self.connection = Some(connection);
        Ok(name)
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    pub fn note(&self, pad: PadId) -> Option<u8> {
        self.notes.get(&pad).copied()
    }

    pub fn is_sounding(&self, pad: PadId) -> bool {
        self.sounding.contains(&pad)
    }

    /// Start the pad's note. A pad that is still sounding is cut first so
    /// the synth hears a fresh attack.
    pub fn note_on(&mut self, pad: PadId) -> Result<()> {
        let note = self.note(pad).ok_or(Error::UnknownPad(pad.0))?;
        if !self.sounding.insert(pad) {
            debug!("Retriggering pad {} (note {})", pad, note);
            self.send(note_off_message(self.channel, note))?;
        }
        self.send(note_on_message(self.channel, note, VELOCITY))
    }

    /// Stop the pad's note. Silent pads are left alone.
    pub fn note_off(&mut self, pad: PadId) -> Result<()> {
        let note = self.note(pad).ok_or(Error::UnknownPad(pad.0))?;
        if !self.sounding.remove(&pad) {
            return Ok(());
        }
        self.send(note_off_message(self.channel, note))
    }

    /// Pad keys with their note names, in key order, e.g. `C:C4 D:D4`.
    pub fn describe(&self) -> String {
        let mut pads: Vec<_> = self.notes.iter().collect();
        pads.sort();
        pads.iter()
            .map(|(pad, note)| {
                format!("{}:{}", pad.0.to_ascii_uppercase(), midi_note_name(**note))
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn send(&mut self, message: [u8; 3]) -> Result<()> {
        if let Some(ref mut conn) = self.connection {
            conn.send(&message)
                .map_err(|e| Error::Midi(format!("failed to send {:02X?}: {}", message, e)))?;
        }
        Ok(())
    }
}

pub fn midi_note_name(note: u8) -> String {
    let note_names = ["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"];
    let octave = (note / 12) as i32 - 1;
    let note_index = (note % 12) as usize;
    format!("{}{}", note_names[note_index], octave)
}
