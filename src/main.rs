#[cfg(feature = "gui")]
use eframe::egui;

#[cfg(feature = "gui")]
use clap::Parser;
#[cfg(feature = "gui")]
use echopad::{
    GameConfig, GameSession, Mode, ModeControl, PadConfig, PadId, PadVoice, ScoreDisplay,
};
#[cfg(feature = "gui")]
use log::{info, warn};
#[cfg(feature = "gui")]
use std::collections::HashSet;
#[cfg(feature = "gui")]
use std::path::PathBuf;
#[cfg(feature = "gui")]
use std::time::Instant;

#[cfg(all(feature = "gui", feature = "audio"))]
use echopad::{AudioOutput, MidiOutputDevice};

#[cfg(feature = "gui")]
#[derive(Parser)]
#[command(name = "echopad")]
#[command(about = "Pad-based audio memory game with echo and challenge modes")]
struct Cli {
    /// TOML file with timings and pad layout
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start mode: "echo" or "challenge"
    #[arg(long)]
    mode: Option<Mode>,

    /// Seed for the challenge sequence (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Play every pad up and down before input opens
    #[arg(long)]
    intro: bool,

    /// Note duration in milliseconds
    #[arg(long)]
    note_ms: Option<u64>,

    /// Quiet period before an echo plays back, in milliseconds
    #[arg(long)]
    echo_ms: Option<u64>,

    /// MIDI output port index to mirror pad notes to
    #[arg(long)]
    midi_port: Option<usize>,

    /// MIDI channel (1-16) for mirrored notes
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=16))]
    midi_channel: u8,

    /// Print available MIDI output ports and exit
    #[arg(long)]
    list_midi: bool,
}

#[cfg(feature = "gui")]
impl Cli {
    fn apply(&self, config: &mut GameConfig) {
        if let Some(mode) = self.mode {
            config.start_mode = mode;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.intro {
            config.intro = true;
        }
        if let Some(ms) = self.note_ms {
            config.note_duration_ms = ms;
        }
        if let Some(ms) = self.echo_ms {
            config.echo_delay_ms = ms;
        }
    }
}

#[cfg(feature = "gui")]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    if cli.list_midi {
        list_midi_ports();
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    cli.apply(&mut config);

    let board = Board::new(&config, cli.midi_port, cli.midi_channel);
    let session = GameSession::new(&config, board)?;

    info!("ECHOPAD v{} starting in {} mode", env!("CARGO_PKG_VERSION"), config.start_mode);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([640.0, 420.0])
            .with_title("ECHOPAD"),
        ..Default::default()
    };

    eframe::run_native(
        "ECHOPAD",
        options,
        Box::new(|_cc| Ok(Box::new(EchoPadApp::new(session)))),
    )?;
    Ok(())
}

#[cfg(not(feature = "gui"))]
fn main() {
    eprintln!("This binary requires the 'gui' feature to be enabled");
    std::process::exit(1);
}

#[cfg(all(feature = "gui", feature = "audio"))]
fn list_midi_ports() {
    let ports = MidiOutputDevice::available_ports();
    if ports.is_empty() {
        println!("No MIDI output ports available");
    }
    for (i, name) in ports.iter().enumerate() {
        println!("{}: {}", i, name);
    }
}

#[cfg(all(feature = "gui", not(feature = "audio")))]
fn list_midi_ports() {
    println!("MIDI output requires the 'audio' feature");
}

/// What the window shows and sounds, driven by the session.
#[cfg(feature = "gui")]
struct Board {
    pads: Vec<PadConfig>,
    lit: HashSet<PadId>,
    score_text: String,
    score_visible: bool,
    toggle_enabled: bool,
    #[cfg(feature = "audio")]
    audio: AudioOutput,
    #[cfg(feature = "audio")]
    midi: MidiOutputDevice,
}

#[cfg(feature = "gui")]
impl Board {
    fn new(config: &GameConfig, midi_port: Option<usize>, midi_channel: u8) -> Self {
        #[cfg(feature = "audio")]
        let audio = {
            let note = config.timings().note_duration;
            AudioOutput::new(note).unwrap_or_else(|| {
                warn!("No audio output device, pads will be silent");
                AudioOutput::silent(note)
            })
        };

        #[cfg(feature = "audio")]
        let midi = {
            let mut midi = MidiOutputDevice::new(&config.pads).with_channel(midi_channel - 1);
            if let Some(port) = midi_port {
                match midi.connect(port) {
                    Ok(name) => info!("MIDI output connected to {} on channel {}", name, midi_channel),
                    Err(e) => log::error!("{}", e),
                }
            }
            midi
        };

        #[cfg(not(feature = "audio"))]
        {
            if midi_port.is_some() {
                warn!(
                    "MIDI output requires the 'audio' feature, ignoring --midi-port (channel {})",
                    midi_channel
                );
            }
            warn!("Built without the 'audio' feature, pads will be silent");
        }

        Self {
            pads: config.pads.clone(),
            lit: HashSet::new(),
            score_text: String::new(),
            score_visible: false,
            toggle_enabled: true,
            #[cfg(feature = "audio")]
            audio,
            #[cfg(feature = "audio")]
            midi,
        }
    }

    fn note(&self, pad: PadId) -> Option<u8> {
        self.pads.iter().find(|p| p.key == pad).map(|p| p.note)
    }
}

#[cfg(feature = "gui")]
impl PadVoice for Board {
    fn sound(&mut self, pad: PadId) {
        let Some(note) = self.note(pad) else {
            return;
        };
        #[cfg(feature = "audio")]
        {
            self.audio.trigger_note(note);
            if let Err(e) = self.midi.note_on(pad) {
                warn!("{}", e);
            }
        }
        #[cfg(not(feature = "audio"))]
        log::debug!("Pad {} (note {})", pad, note);
    }

    fn set_lit(&mut self, pad: PadId, lit: bool) {
        if lit {
            self.lit.insert(pad);
            return;
        }
        self.lit.remove(&pad);
        #[cfg(feature = "audio")]
        if let Err(e) = self.midi.note_off(pad) {
            warn!("{}", e);
        }
    }

    fn has_pad(&self, pad: PadId) -> bool {
        self.note(pad).is_some()
    }
}

#[cfg(feature = "gui")]
impl ScoreDisplay for Board {
    fn set_text(&mut self, text: &str) {
        self.score_text = text.to_string();
    }

    fn set_visible(&mut self, visible: bool) {
        self.score_visible = visible;
    }
}

#[cfg(feature = "gui")]
impl ModeControl for Board {
    fn set_interactive(&mut self, interactive: bool) {
        self.toggle_enabled = interactive;
    }
}

#[cfg(feature = "gui")]
struct EchoPadApp {
    session: GameSession<Board>,
    started: Instant,
}

#[cfg(feature = "gui")]
impl EchoPadApp {
    fn new(mut session: GameSession<Board>) -> Self {
        session.start();
        Self {
            session,
            started: Instant::now(),
        }
    }

    fn handle_keyboard(&mut self, ctx: &egui::Context) {
        let pads: Vec<PadId> = self.session.surface().pads.iter().map(|p| p.key).collect();
        for pad in pads {
            let Some(key) = egui::Key::from_name(&pad.0.to_ascii_uppercase().to_string()) else {
                continue;
            };
            if ctx.input(|i| i.key_pressed(key)) {
                self.session.activate(pad);
            }
        }
    }
}

#[cfg(feature = "gui")]
fn dim([r, g, b]: [u8; 3]) -> egui::Color32 {
    egui::Color32::from_rgb(r / 3, g / 3, b / 3)
}

#[cfg(feature = "gui")]
impl eframe::App for EchoPadApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.request_repaint();

        self.session.advance_to(self.started.elapsed());
        self.handle_keyboard(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("ECHOPAD");
            ui.add_space(10.0);

            // Mode toggle and score
            ui.horizontal(|ui| {
                let mode = self.session.mode();
                let label = match mode {
                    Mode::Echo => "🔁 Echo mode",
                    Mode::Challenge => "🎯 Challenge mode",
                };
                let toggle_enabled = self.session.surface().toggle_enabled;
                if ui
                    .add_enabled(toggle_enabled, egui::Button::new(label))
                    .on_hover_text("Switch between echo and challenge")
                    .clicked()
                {
                    self.session.toggle_mode();
                }

                ui.add_space(20.0);

                let board = self.session.surface();
                if board.score_visible {
                    ui.label(format!("Score: {}", board.score_text));
                    ui.label(format!("Best: {}", self.session.best_score()));
                }
            });

            ui.add_space(20.0);

            // Pads
            let pads = self.session.surface().pads.clone();
            let mut pressed = None;
            ui.horizontal(|ui| {
                for pad in &pads {
                    let lit = self.session.surface().lit.contains(&pad.key);
                    let enabled = self
                        .session
                        .registry()
                        .get(pad.key)
                        .map_or(false, |p| p.is_enabled());

                    let [r, g, b] = pad.color;
                    let button = egui::Button::new(
                        egui::RichText::new(pad.key.0.to_ascii_uppercase().to_string()).size(28.0),
                    )
                    .min_size(egui::vec2(130.0, 130.0))
                    .fill(if lit {
                        egui::Color32::from_rgb(r, g, b)
                    } else {
                        dim(pad.color)
                    });

                    if ui.add_enabled(enabled, button).clicked() {
                        pressed = Some(pad.key);
                    }
                }
            });
            if let Some(pad) = pressed {
                self.session.activate(pad);
            }

            // Info
            ui.separator();
            match self.session.mode() {
                Mode::Echo => ui.label("Play a tune, pause, and it is echoed back"),
                Mode::Challenge => ui.label("Repeat the sequence, it grows by one each round"),
            };

            #[cfg(feature = "audio")]
            {
                let board = self.session.surface();
                if board.audio.is_silent() {
                    ui.colored_label(egui::Color32::YELLOW, "⚠ No audio device - pads are silent");
                }
                if board.midi.is_connected() {
                    ui.label(format!("MIDI out: {}", board.midi.describe()));
                }
            }
        });
    }
}
