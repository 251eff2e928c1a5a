use std::{fmt::Display, time::Duration};

use common::command::{
    MODE_BLINK, MODE_CHASE, MODE_FADE_TO, MODE_FILL, MODE_IDLE, MODE_OFF, MODE_RAINBOW, MODE_RUN,
    MODE_WIPE_TO,
};
use smart_leds::RGB8;

pub mod state;

pub use state::{CommandState, Snapshot};

/// The animation the loop is currently asked to play.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// Nothing to do, the loop just ticks
    #[default]
    Idle,
    Rainbow,
    Fill,
    Blink,
    Chase,
    WipeTo,
    FadeTo,
    Run,
    Off,
    /// A mode name nobody recognised. Kept verbatim and treated like Idle.
    Unknown(String),
}

impl Mode {
    pub fn parse(name: &str) -> Self {
        match name {
            MODE_IDLE => Mode::Idle,
            MODE_RAINBOW => Mode::Rainbow,
            MODE_FILL => Mode::Fill,
            MODE_BLINK => Mode::Blink,
            MODE_CHASE => Mode::Chase,
            MODE_WIPE_TO => Mode::WipeTo,
            MODE_FADE_TO => Mode::FadeTo,
            MODE_RUN => Mode::Run,
            MODE_OFF => Mode::Off,
            other => Mode::Unknown(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Mode::Idle => MODE_IDLE,
            Mode::Rainbow => MODE_RAINBOW,
            Mode::Fill => MODE_FILL,
            Mode::Blink => MODE_BLINK,
            Mode::Chase => MODE_CHASE,
            Mode::WipeTo => MODE_WIPE_TO,
            Mode::FadeTo => MODE_FADE_TO,
            Mode::Run => MODE_RUN,
            Mode::Off => MODE_OFF,
            Mode::Unknown(name) => name,
        }
    }

    /// Terminal modes play once and then hand the strip back to Idle
    pub fn is_terminal(&self) -> bool {
        matches!(self, Mode::Fill | Mode::WipeTo | Mode::FadeTo | Mode::Off)
    }

    /// Frame interval used when a command does not carry its own
    pub fn default_interval(&self) -> Option<Duration> {
        let ms = match self {
            Mode::Rainbow => 10,
            Mode::Blink => 250,
            Mode::Chase => 50,
            Mode::WipeTo => 50,
            Mode::FadeTo => 20,
            Mode::Run => 25,
            Mode::Idle | Mode::Fill | Mode::Off | Mode::Unknown(_) => return None,
        };
        Some(Duration::from_millis(ms))
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Idle => write!(f, "idle"),
            Mode::Unknown(name) => write!(f, "unknown({:?})", name),
            mode => write!(f, "{}", mode.name()),
        }
    }
}

/// Everything the loop needs to render the current mode. Replaced as a whole
/// whenever a new command comes in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Command {
    pub mode: Mode,
    pub color: RGB8,
    /// Where a fade starts from: the colour that was active when the fade
    /// was requested
    pub previous_color: RGB8,
    /// Tail length for Run, always within 1..=pixel count
    pub length: usize,
    pub frame_interval: Duration,
}

impl Command {
    /// The command the strip starts up with
    pub fn idle(tick: Duration) -> Self {
        Self {
            mode: Mode::Idle,
            color: RGB8::default(),
            previous_color: RGB8::default(),
            length: 1,
            frame_interval: tick,
        }
    }
}
