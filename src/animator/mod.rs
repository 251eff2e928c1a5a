use std::time::Duration;

use anyhow::Error;
use log::{debug, error, info};
use smart_leds::RGB8;
use tokio::{sync::watch, time::sleep};

use crate::{
    command::{Command, CommandState, Mode, Snapshot},
    render::{self, AnimationPhase, BLACK, CHASE_SPACING, FADE_STEPS},
    strip::{PixelSink, Strip},
};

/// Shortest wait while idle, so a zero interval cannot spin the loop
const MIN_IDLE_TICK: Duration = Duration::from_millis(1);

/// Whether the loop should carry on after a step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// The animation loop. Each tick reads the current command, plays one step
/// of its mode onto the strip and paces it. A new command is picked up at the
/// start of the next tick; a step that is already running (a chase cycle, a
/// whole wipe or fade) finishes first.
pub struct Animator<S> {
    strip: Strip<S>,
    commands: CommandState,
    phase: AnimationPhase,
    shutdown: watch::Receiver<bool>,
}

impl<S: PixelSink> Animator<S> {
    pub fn init(
        sink: S,
        commands: CommandState,
        shutdown: watch::Receiver<bool>,
    ) -> Result<Self, Error> {
        Ok(Self {
            strip: Strip::init(sink)?,
            commands,
            phase: AnimationPhase::default(),
            shutdown,
        })
    }

    pub fn phase(&self) -> AnimationPhase {
        self.phase
    }

    pub fn strip(&self) -> &Strip<S> {
        &self.strip
    }

    /// Run until shutdown is signalled. Whatever was shown last stays on the
    /// strip.
    pub async fn run(mut self) {
        info!("Animation loop started");
        while self.tick().await == Flow::Continue {}
        info!("Animation loop stopped");
    }

    /// Play one step of whatever mode is current
    pub async fn tick(&mut self) -> Flow {
        if self.stopping() {
            return Flow::Stop;
        }

        let Snapshot {
            command,
            generation,
        } = self.commands.snapshot();
        let interval = command.frame_interval;

        let flow = match &command.mode {
            Mode::Rainbow => {
                render::rainbow(self.strip.frame_mut(), self.phase);
                self.push();
                let flow = self.pause(interval).await;
                self.phase.advance();
                flow
            }
            Mode::Fill => {
                render::fill(self.strip.frame_mut(), command.color);
                self.push();
                Flow::Continue
            }
            Mode::Blink => self.blink(&command).await,
            Mode::Chase => self.chase(&command).await,
            Mode::WipeTo => self.wipe(&command).await,
            Mode::FadeTo => self.fade(&command).await,
            Mode::Run => {
                render::run(self.strip.frame_mut(), command.color, command.length, self.phase);
                self.push();
                let flow = self.pause(interval).await;
                self.phase.advance();
                flow
            }
            Mode::Off => {
                render::off(self.strip.frame_mut());
                self.push();
                Flow::Continue
            }
            // Unknown names are deliberately treated as idle
            Mode::Idle | Mode::Unknown(_) => self.pause(interval.max(MIN_IDLE_TICK)).await,
        };

        if flow == Flow::Continue && command.mode.is_terminal() && self.commands.finish(generation)
        {
            debug!("{} finished, going idle", command.mode);
        }

        flow
    }

    async fn blink(&mut self, command: &Command) -> Flow {
        for color in [command.color, BLACK] {
            render::fill(self.strip.frame_mut(), color);
            self.push();
            if self.pause(command.frame_interval).await == Flow::Stop {
                return Flow::Stop;
            }
        }
        Flow::Continue
    }

    async fn chase(&mut self, command: &Command) -> Flow {
        for offset in 0..CHASE_SPACING {
            render::chase_comb(self.strip.frame_mut(), offset, command.color);
            self.push();
            let flow = self.pause(command.frame_interval).await;
            // Taken down without a push, the next comb's frame shows it
            render::chase_comb(self.strip.frame_mut(), offset, BLACK);
            if flow == Flow::Stop {
                return Flow::Stop;
            }
        }
        Flow::Continue
    }

    async fn wipe(&mut self, command: &Command) -> Flow {
        for i in 0..self.strip.len() {
            self.strip.frame_mut()[i] = command.color;
            self.push();
            if self.pause(command.frame_interval).await == Flow::Stop {
                return Flow::Stop;
            }
        }
        Flow::Continue
    }

    async fn fade(&mut self, command: &Command) -> Flow {
        for step in 0..FADE_STEPS {
            let color = render::fade_color(command.previous_color, command.color, step);
            self.show_color(color);
            if self.pause(command.frame_interval).await == Flow::Stop {
                return Flow::Stop;
            }
        }
        // Rounding leaves the last step short, land exactly on the target
        self.show_color(command.color);
        Flow::Continue
    }

    fn show_color(&mut self, color: RGB8) {
        render::fill(self.strip.frame_mut(), color);
        self.push();
    }

    /// Push the current frame. A failed transmission loses that frame only;
    /// the next one gets a fresh try.
    fn push(&mut self) {
        if let Err(e) = self.strip.show() {
            error!("Failed to push frame to strip: {}", e);
        }
    }

    /// Wait out a frame interval, waking early on shutdown
    async fn pause(&mut self, interval: Duration) -> Flow {
        if interval.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::select! {
                _ = sleep(interval) => {}
                _ = self.shutdown.changed() => {}
            }
        }

        if self.stopping() {
            Flow::Stop
        } else {
            Flow::Continue
        }
    }

    /// A dropped shutdown sender counts as a request to stop
    fn stopping(&self) -> bool {
        *self.shutdown.borrow() || self.shutdown.has_changed().is_err()
    }
}
