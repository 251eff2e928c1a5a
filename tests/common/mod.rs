//! Shared test infrastructure for the animation loop tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use anyhow::Error;
use ::common::command::LedModeColor;
use rusty_ledstrip::prelude::*;
use rusty_ledstrip::RGB8;
use tokio::sync::watch;

/// Frames pushed by the loop, readable from the test while the animator
/// owns the sink
pub type Frames = Arc<Mutex<Vec<Vec<RGB8>>>>;

/// Sink that records every frame it is asked to show
pub struct RecordingSink {
    pixels: Vec<RGB8>,
    frames: Frames,
    begun: bool,
    fail: bool,
}

impl RecordingSink {
    pub fn new(pixel_count: usize) -> (Self, Frames) {
        let frames = Frames::default();
        (
            Self {
                pixels: vec![RGB8::default(); pixel_count],
                frames: frames.clone(),
                begun: false,
                fail: false,
            },
            frames,
        )
    }

    /// A sink whose transmissions always fail
    pub fn failing(pixel_count: usize) -> (Self, Frames) {
        let (mut sink, frames) = Self::new(pixel_count);
        sink.fail = true;
        (sink, frames)
    }
}

impl PixelSink for RecordingSink {
    fn begin(&mut self) -> Result<(), Error> {
        self.begun = true;
        Ok(())
    }

    fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    fn set_pixel(&mut self, index: usize, color: RGB8) {
        self.pixels[index] = color;
    }

    fn show(&mut self) -> Result<(), Error> {
        assert!(self.begun, "show before begin");
        if self.fail {
            anyhow::bail!("strip unplugged");
        }
        self.frames.lock().unwrap().push(self.pixels.clone());
        Ok(())
    }
}

pub struct Harness {
    pub animator: Animator<RecordingSink>,
    pub commands: CommandState,
    pub receiver: CommandReceiver,
    pub frames: Frames,
    pub shutdown: watch::Sender<bool>,
}

pub const IDLE_TICK: Duration = Duration::from_millis(10);

pub fn harness(pixel_count: usize) -> Harness {
    let (sink, frames) = RecordingSink::new(pixel_count);
    harness_with(sink, frames)
}

pub fn harness_with(sink: RecordingSink, frames: Frames) -> Harness {
    let pixel_count = sink.pixel_count();
    let commands = CommandState::new(Command::idle(IDLE_TICK));
    let (shutdown, shutdown_rx) = watch::channel(false);
    let animator = Animator::init(sink, commands.clone(), shutdown_rx).unwrap();
    let receiver = CommandReceiver::new(commands.clone(), pixel_count, IDLE_TICK);

    Harness {
        animator,
        commands,
        receiver,
        frames,
        shutdown,
    }
}

impl Harness {
    pub fn send(&self, mode: &str, r: i64, g: i64, b: i64) {
        self.receiver.handle(&LedModeColor::new(mode, r, g, b));
    }

    pub fn frames(&self) -> Vec<Vec<RGB8>> {
        self.frames.lock().unwrap().clone()
    }

    pub fn take_frames(&self) -> Vec<Vec<RGB8>> {
        std::mem::take(&mut *self.frames.lock().unwrap())
    }

    pub fn mode(&self) -> Mode {
        self.commands.snapshot().command.mode
    }
}

pub fn solid(color: RGB8, pixel_count: usize) -> Vec<RGB8> {
    vec![color; pixel_count]
}
