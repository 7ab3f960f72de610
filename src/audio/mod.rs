/// Audio output using cpal
///
/// Each pad play starts a fresh sine voice that rings for one note duration.
/// Voices are mixed, so overlapping plays of different pads sound together.
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use log::warn;
use std::sync::{Arc, Mutex};
use std::time::Duration;

struct Voice {
    frequency: f32,
    phase: f32,
    remaining: usize,
}

pub struct AudioOutput {
    _stream: Option<cpal::Stream>,
    voices: Arc<Mutex<Vec<Voice>>>,
    sample_rate: f32,
    note_duration: Duration,
}

impl AudioOutput {
    pub fn new(note_duration: Duration) -> Option<Self> {
        let voices = Arc::new(Mutex::new(Vec::new()));
        let (stream, sample_rate) = Self::setup_audio_stream(Arc::clone(&voices))?;

        Some(Self {
            _stream: Some(stream),
            voices,
            sample_rate,
            note_duration,
        })
    }

    /// An output that accepts notes and drops them.
    pub fn silent(note_duration: Duration) -> Self {
        Self {
            _stream: None,
            voices: Arc::new(Mutex::new(Vec::new())),
            sample_rate: 44_100.0,
            note_duration,
        }
    }

    pub fn is_silent(&self) -> bool {
        self._stream.is_none()
    }

    fn setup_audio_stream(voices: Arc<Mutex<Vec<Voice>>>) -> Option<(cpal::Stream, f32)> {
        let host = cpal::default_host();
        let device = host.default_output_device()?;
        let config = device.default_output_config().ok()?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;

        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => device.build_output_stream(
                &config.into(),
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let mut voices = voices.lock().unwrap_or_else(|e| e.into_inner());

                    for frame in data.chunks_mut(channels.max(1)) {
                        let mut sample = 0.0;
                        for voice in voices.iter_mut().filter(|v| v.remaining > 0) {
                            sample += (voice.phase * 2.0 * std::f32::consts::PI).sin() * 0.2;
                            voice.phase += voice.frequency / sample_rate;
                            if voice.phase >= 1.0 {
                                voice.phase -= 1.0;
                            }
                            voice.remaining -= 1;
                        }
                        for out in frame.iter_mut() {
                            *out = sample.clamp(-1.0, 1.0);
                        }
                    }

                    voices.retain(|v| v.remaining > 0);
                },
                |err| warn!("Audio stream error: {}", err),
                None,
            ),
            other => {
                warn!("Unsupported sample format {:?}, audio disabled", other);
                return None;
            }
        };

        match stream {
            Ok(stream) => {
                if let Err(e) = stream.play() {
                    warn!("Failed to start audio stream: {}", e);
                    return None;
                }
                Some((stream, sample_rate))
            }
            Err(e) => {
                warn!("Failed to build audio stream: {}", e);
                None
            }
        }
    }

    /// Sound `note` from the start for one note duration.
    pub fn trigger_note(&mut self, note: u8) {
        if self.is_silent() {
            return;
        }
        let remaining = (self.note_duration.as_secs_f32() * self.sample_rate) as usize;
        let mut voices = self.voices.lock().unwrap_or_else(|e| e.into_inner());
        voices.push(Voice {
            frequency: midi_note_to_frequency(note),
            phase: 0.0,
            remaining,
        });
    }
}

fn midi_note_to_frequency(note: u8) -> f32 {
    440.0 * 2.0_f32.powf((note as f32 - 69.0) / 12.0)
}
